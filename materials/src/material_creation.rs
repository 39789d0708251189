//! Material creation
//!
//! Turns a key and its synthesized shader into a material-builder invocation,
//! then drives the engine through package compilation and material creation.

use gltfmat_shared::{
    AlphaMode, BlendingMode, MaterialBuilder, MaterialDescription, MaterialKey, SamplerType,
    Shading, UniformType, VertexAttributes,
};

use crate::engine::Engine;
use crate::error::BuildError;
use crate::shader_gen::generate_shader;

/// Material name used when no other is configured
pub const DEFAULT_MATERIAL_NAME: &str = "material";

/// Sampler parameters, in declaration order
pub const SAMPLERS: [&str; 5] = [
    "baseColorMap",
    "metallicRoughnessMap",
    "aoMap",
    "emissiveMap",
    "normalMap",
];

/// Uniform parameters, in declaration order.
///
/// `normalScale` and `aoStrength` are declared for hosts that bind them even
/// though the synthesized shader does not read them.
pub const UNIFORMS: [(&str, UniformType); 6] = [
    ("baseColorFactor", UniformType::Float4),
    ("metallicFactor", UniformType::Float),
    ("roughnessFactor", UniformType::Float),
    ("normalScale", UniformType::Float),
    ("aoStrength", UniformType::Float),
    ("emissiveFactor", UniformType::Float3),
];

/// Describe the builder invocation for a key and its shader
pub fn material_description(key: &MaterialKey, shader: String, name: &str) -> MaterialDescription {
    let mut builder = MaterialBuilder::new()
        .name(name)
        .material(shader)
        .double_sided(key.double_sided)
        .require(VertexAttributes::UV0);

    for sampler in SAMPLERS {
        builder = builder.sampler(SamplerType::Sampler2d, sampler);
    }
    for (uniform, kind) in UNIFORMS {
        builder = builder.uniform(kind, uniform);
    }

    if key.requires_uv1() {
        builder = builder.require(VertexAttributes::UV1);
    }

    builder = match key.alpha_mode {
        AlphaMode::Masked => builder
            .blending(BlendingMode::Masked)
            .mask_threshold(key.alpha_mask_threshold),
        AlphaMode::Transparent => builder.blending(BlendingMode::Transparent),
        AlphaMode::Opaque => builder.blending(BlendingMode::Opaque),
    };

    builder
        .shading(if key.unlit { Shading::Unlit } else { Shading::Lit })
        .finish()
}

/// Synthesize, compile and create the material for a key
pub fn create_material<E: Engine>(
    engine: &E,
    key: &MaterialKey,
    name: &str,
) -> Result<E::Material, BuildError> {
    build_material(engine, key, generate_shader(key), name)
}

/// Compile and create the material for a key from an already synthesized shader
pub(crate) fn build_material<E: Engine>(
    engine: &E,
    key: &MaterialKey,
    shader: String,
    name: &str,
) -> Result<E::Material, BuildError> {
    let description = material_description(key, shader, name);
    let package = engine.build_package(&description)?;
    tracing::trace!(
        "Compiled material package: {} bytes, blending={:?}, shading={:?}",
        package.size(),
        description.blending,
        description.shading
    );
    engine.create_material(&package)
}
