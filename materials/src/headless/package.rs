//! Headless material package format (`GMAT`)
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Magic: "GMAT" (4 bytes)                     │
//! ├──────────────────────────────────────────────┤
//! │  CompiledPackage (bitcode)                   │
//! │  ├── version: u32                            │
//! │  ├── checksum: u64   ← xxh3-64 of payload    │
//! │  └── payload: Vec<u8>                        │
//! │      └── EncodedDescription (bitcode)        │
//! └──────────────────────────────────────────────┘
//! ```

use bitcode::{Decode, Encode};
use xxhash_rust::xxh3::xxh3_64;

use gltfmat_shared::{
    BlendingMode, MaterialDescription, Package, Parameter, ParameterKind, SamplerType, Shading,
    UniformType, VertexAttributes,
};

use crate::error::BuildError;

/// Package magic bytes
pub const PACKAGE_MAGIC: &[u8; 4] = b"GMAT";

/// Current package format version
pub const PACKAGE_VERSION: u32 = 1;

#[derive(Debug, Clone, Encode, Decode)]
pub(crate) struct CompiledPackage {
    pub version: u32,
    pub checksum: u64,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Encode, Decode)]
struct EncodedDescription {
    name: String,
    shader: String,
    double_sided: bool,
    required_attributes: u8,
    parameters: Vec<EncodedParameter>,
    /// 0=Opaque, 1=Masked, 2=Transparent
    blending: u8,
    mask_threshold: Option<f32>,
    /// 0=Lit, 1=Unlit
    shading: u8,
}

#[derive(Debug, Clone, Encode, Decode)]
struct EncodedParameter {
    name: String,
    kind: u8,
}

fn kind_code(kind: ParameterKind) -> u8 {
    match kind {
        ParameterKind::Sampler(SamplerType::Sampler2d) => 0,
        ParameterKind::Sampler(SamplerType::SamplerCubemap) => 1,
        ParameterKind::Uniform(UniformType::Float) => 2,
        ParameterKind::Uniform(UniformType::Float2) => 3,
        ParameterKind::Uniform(UniformType::Float3) => 4,
        ParameterKind::Uniform(UniformType::Float4) => 5,
    }
}

fn kind_from_code(code: u8) -> Option<ParameterKind> {
    Some(match code {
        0 => ParameterKind::Sampler(SamplerType::Sampler2d),
        1 => ParameterKind::Sampler(SamplerType::SamplerCubemap),
        2 => ParameterKind::Uniform(UniformType::Float),
        3 => ParameterKind::Uniform(UniformType::Float2),
        4 => ParameterKind::Uniform(UniformType::Float3),
        5 => ParameterKind::Uniform(UniformType::Float4),
        _ => return None,
    })
}

impl From<&MaterialDescription> for EncodedDescription {
    fn from(desc: &MaterialDescription) -> Self {
        Self {
            name: desc.name.clone(),
            shader: desc.shader.clone(),
            double_sided: desc.double_sided,
            required_attributes: desc.required_attributes.bits(),
            parameters: desc
                .parameters
                .iter()
                .map(|p| EncodedParameter {
                    name: p.name.clone(),
                    kind: kind_code(p.kind),
                })
                .collect(),
            blending: match desc.blending {
                BlendingMode::Opaque => 0,
                BlendingMode::Masked => 1,
                BlendingMode::Transparent => 2,
            },
            mask_threshold: desc.mask_threshold,
            shading: match desc.shading {
                Shading::Lit => 0,
                Shading::Unlit => 1,
            },
        }
    }
}

impl EncodedDescription {
    fn into_description(self) -> Result<MaterialDescription, String> {
        let parameters = self
            .parameters
            .into_iter()
            .map(|p| match kind_from_code(p.kind) {
                Some(kind) => Ok(Parameter { name: p.name, kind }),
                None => Err(format!("unknown parameter kind {} for '{}'", p.kind, p.name)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let blending = match self.blending {
            0 => BlendingMode::Opaque,
            1 => BlendingMode::Masked,
            2 => BlendingMode::Transparent,
            other => return Err(format!("unknown blending mode {other}")),
        };
        let shading = match self.shading {
            0 => Shading::Lit,
            1 => Shading::Unlit,
            other => return Err(format!("unknown shading model {other}")),
        };
        let required_attributes = VertexAttributes::from_bits(self.required_attributes)
            .ok_or_else(|| format!("unknown vertex attributes {:#010b}", self.required_attributes))?;

        Ok(MaterialDescription {
            name: self.name,
            shader: self.shader,
            double_sided: self.double_sided,
            required_attributes,
            parameters,
            blending,
            mask_threshold: self.mask_threshold,
            shading,
        })
    }
}

/// Serialize a validated description into a package
pub fn encode_package(description: &MaterialDescription) -> Package {
    let payload = bitcode::encode(&EncodedDescription::from(description));
    let compiled = CompiledPackage {
        version: PACKAGE_VERSION,
        checksum: xxh3_64(&payload),
        payload,
    };
    wrap(&compiled)
}

pub(crate) fn wrap(compiled: &CompiledPackage) -> Package {
    let mut bytes = PACKAGE_MAGIC.to_vec();
    bytes.extend(bitcode::encode(compiled));
    Package::new(bytes)
}

/// Deserialize a package back into its description
///
/// Checks magic bytes, format version and payload checksum.
pub fn decode_package(package: &Package) -> Result<MaterialDescription, BuildError> {
    let bytes = package.data();
    let refuse = |reason: String| BuildError::factory(bytes.len(), reason);

    if bytes.len() < PACKAGE_MAGIC.len() || &bytes[..PACKAGE_MAGIC.len()] != PACKAGE_MAGIC {
        return Err(refuse("invalid GMAT magic bytes".to_string()));
    }

    let compiled: CompiledPackage = bitcode::decode(&bytes[PACKAGE_MAGIC.len()..])
        .map_err(|e| refuse(format!("failed to decode package: {e}")))?;

    if compiled.version != PACKAGE_VERSION {
        return Err(refuse(format!(
            "unsupported package version {} (expected {})",
            compiled.version, PACKAGE_VERSION
        )));
    }

    let checksum = xxh3_64(&compiled.payload);
    if checksum != compiled.checksum {
        return Err(refuse(format!(
            "checksum mismatch (stored {:016x}, computed {:016x})",
            compiled.checksum, checksum
        )));
    }

    let encoded: EncodedDescription = bitcode::decode(&compiled.payload)
        .map_err(|e| refuse(format!("failed to decode description: {e}")))?;
    encoded.into_description().map_err(refuse)
}
