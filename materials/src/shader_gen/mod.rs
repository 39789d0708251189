//! Shader synthesis for glTF materials
//!
//! Produces the body of the engine's `material()` entry point from a
//! [`MaterialKey`]. The output depends only on the key, so equal keys always
//! yield byte-identical sources.
//!
//! Emission order:
//! 1. entry point header
//! 2. UV fetches for normal, baseColor, metallicRoughness, ao, emissive
//! 3. normal mapping (lit only)
//! 4. `prepareMaterial` and base color
//! 5. alpha premultiplication (transparent only)
//! 6. metallic-roughness, occlusion and emissive (lit only)
//! 7. closing brace
//!
//! Masked materials share the opaque body; the alpha test is applied by the
//! engine outside the user shader. `has_vertex_colors` is not consumed.

mod snippets;

use std::fmt::Write;

use gltfmat_shared::{AlphaMode, MaterialKey};

/// Texture slots in UV fetch order, paired with the UV channel each samples
fn uv_slots(key: &MaterialKey) -> [(&'static str, u8); 5] {
    [
        ("normal", key.normal_uv),
        ("baseColor", key.base_color_uv),
        ("metallicRoughness", key.metallic_roughness_uv),
        ("ao", key.ao_uv),
        ("emissive", key.emissive_uv),
    ]
}

/// Generate the material shader source for a key
pub fn generate_shader(key: &MaterialKey) -> String {
    let mut shader = String::with_capacity(1024);
    shader.push_str(snippets::MATERIAL_BEGIN);

    for (slot, channel) in uv_slots(key) {
        // Writing to a String cannot fail
        let _ = writeln!(shader, "    float2 {slot}UV = getUV{channel}();");
    }

    if !key.unlit {
        shader.push_str(snippets::NORMAL_MAP);
    }

    shader.push_str(snippets::BASE_COLOR);

    if key.alpha_mode == AlphaMode::Transparent {
        shader.push_str(snippets::PREMULTIPLY_ALPHA);
    }

    if !key.unlit {
        shader.push_str(snippets::METALLIC_ROUGHNESS);
    }

    shader.push_str(snippets::MATERIAL_END);
    shader
}
