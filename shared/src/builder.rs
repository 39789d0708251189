//! Material builder description
//!
//! [`MaterialBuilder`] assembles a [`MaterialDescription`]: everything an
//! engine's material compiler needs to produce a package (name, shader body,
//! required vertex attributes, parameter schema, blending and shading). It
//! carries no engine state.

use std::fmt;

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Vertex attributes a material requires from the meshes it is applied to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VertexAttributes: u8 {
        const POSITION = 0b0000_0001;
        const TANGENTS = 0b0000_0010;
        const COLOR = 0b0000_0100;
        /// First texture coordinate set
        const UV0 = 0b0000_1000;
        /// Second texture coordinate set
        const UV1 = 0b0001_0000;
    }
}

impl VertexAttributes {
    /// Attribute flag for UV channel `index`, if the channel exists
    pub fn uv(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::UV0),
            1 => Some(Self::UV1),
            _ => None,
        }
    }
}

/// Texture sampler kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplerType {
    Sampler2d,
    SamplerCubemap,
}

/// Uniform value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniformType {
    Float,
    Float2,
    Float3,
    Float4,
}

/// Kind of a declared material parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    Sampler(SamplerType),
    Uniform(UniformType),
}

/// A declared material parameter.
///
/// Samplers are visible to the shader as `materialParams_<name>`, uniforms as
/// `materialParams.<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
}

/// How the material's output is composited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendingMode {
    #[default]
    Opaque,
    /// Alpha-tested against the builder's mask threshold
    Masked,
    /// Alpha-blended, premultiplied
    Transparent,
}

/// Lighting model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Shading {
    #[default]
    Lit,
    Unlit,
}

/// A material-builder invocation, ready for an engine to compile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialDescription {
    pub name: String,
    /// Body of the `material()` entry point
    pub shader: String,
    pub double_sided: bool,
    #[serde(with = "attribute_bits")]
    pub required_attributes: VertexAttributes,
    /// Declared parameters, in declaration order
    pub parameters: Vec<Parameter>,
    pub blending: BlendingMode,
    /// Alpha-test threshold; only set for [`BlendingMode::Masked`]
    pub mask_threshold: Option<f32>,
    pub shading: Shading,
}

impl MaterialDescription {
    /// Look up a declared parameter by name
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl Default for VertexAttributes {
    fn default() -> Self {
        Self::empty()
    }
}

mod attribute_bits {
    use super::VertexAttributes;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(attrs: &VertexAttributes, s: S) -> Result<S::Ok, S::Error> {
        attrs.bits().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<VertexAttributes, D::Error> {
        u8::deserialize(d).map(VertexAttributes::from_bits_truncate)
    }
}

/// Chained construction of a [`MaterialDescription`].
///
/// ```
/// use gltfmat_shared::{MaterialBuilder, SamplerType, VertexAttributes};
///
/// let description = MaterialBuilder::new()
///     .name("material")
///     .material("void material(inout MaterialInputs material) { prepareMaterial(material); }")
///     .require(VertexAttributes::UV0)
///     .sampler(SamplerType::Sampler2d, "baseColorMap")
///     .finish();
///
/// assert!(description.required_attributes.contains(VertexAttributes::UV0));
/// assert_eq!(description.parameters.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MaterialBuilder {
    desc: MaterialDescription,
}

impl MaterialBuilder {
    /// Start an empty description (opaque, lit, no attributes, no parameters)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.desc.name = name.into();
        self
    }

    /// Set the shader body (the `material()` entry point source)
    pub fn material(mut self, shader: impl Into<String>) -> Self {
        self.desc.shader = shader.into();
        self
    }

    pub fn double_sided(mut self, double_sided: bool) -> Self {
        self.desc.double_sided = double_sided;
        self
    }

    /// Add required vertex attributes (accumulates)
    pub fn require(mut self, attributes: VertexAttributes) -> Self {
        self.desc.required_attributes |= attributes;
        self
    }

    /// Declare a sampler parameter
    pub fn sampler(mut self, sampler: SamplerType, name: impl Into<String>) -> Self {
        self.desc.parameters.push(Parameter {
            name: name.into(),
            kind: ParameterKind::Sampler(sampler),
        });
        self
    }

    /// Declare a uniform parameter
    pub fn uniform(mut self, uniform: UniformType, name: impl Into<String>) -> Self {
        self.desc.parameters.push(Parameter {
            name: name.into(),
            kind: ParameterKind::Uniform(uniform),
        });
        self
    }

    pub fn blending(mut self, blending: BlendingMode) -> Self {
        self.desc.blending = blending;
        self
    }

    pub fn mask_threshold(mut self, threshold: f32) -> Self {
        self.desc.mask_threshold = Some(threshold);
        self
    }

    pub fn shading(mut self, shading: Shading) -> Self {
        self.desc.shading = shading;
        self
    }

    /// Finish building and return the description
    pub fn finish(self) -> MaterialDescription {
        self.desc
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterKind::Sampler(SamplerType::Sampler2d) => "sampler2d",
            ParameterKind::Sampler(SamplerType::SamplerCubemap) => "samplerCubemap",
            ParameterKind::Uniform(UniformType::Float) => "float",
            ParameterKind::Uniform(UniformType::Float2) => "float2",
            ParameterKind::Uniform(UniformType::Float3) => "float3",
            ParameterKind::Uniform(UniformType::Float4) => "float4",
        };
        f.write_str(name)
    }
}
