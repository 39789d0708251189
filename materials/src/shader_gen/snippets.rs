//! Shader snippets emitted by the synthesizer.
//!
//! Each block is indented for the body of the `material()` entry point and
//! ends with a newline.

pub(crate) const MATERIAL_BEGIN: &str = "void material(inout MaterialInputs material) {\n";
pub(crate) const MATERIAL_END: &str = "}\n";

// Tangent-space normal: remap [0,1] to [-1,1] and flip Y (glTF is +Y down)
pub(crate) const NORMAL_MAP: &str = "    material.normal = texture(materialParams_normalMap, normalUV).xyz * 2.0 - 1.0;
    material.normal.y = -material.normal.y;
";

pub(crate) const BASE_COLOR: &str = "    prepareMaterial(material);
    material.baseColor = texture(materialParams_baseColorMap, baseColorUV);
    material.baseColor *= materialParams.baseColorFactor;
";

pub(crate) const PREMULTIPLY_ALPHA: &str = "    material.baseColor.rgb *= material.baseColor.a;\n";

// glTF packs roughness in G and metallic in B
pub(crate) const METALLIC_ROUGHNESS: &str = "    vec4 metallicRoughness = texture(materialParams_metallicRoughnessMap, metallicRoughnessUV);
    material.roughness = materialParams.roughnessFactor * metallicRoughness.g;
    material.metallic = materialParams.metallicFactor * metallicRoughness.b;
    material.ambientOcclusion = texture(materialParams_aoMap, aoUV).r;
    material.emissive = texture(materialParams_emissiveMap, emissiveUV);
    material.emissive.rgb *= materialParams.emissiveFactor.rgb;
";
