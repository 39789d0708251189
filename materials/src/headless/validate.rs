//! Material builder validation
//!
//! Static checks a material compiler would run before producing a package.
//! Shader references are found by scanning the source; nothing is parsed.

use std::sync::LazyLock;

use hashbrown::HashSet;
use regex::Regex;

use gltfmat_shared::{BlendingMode, MaterialDescription, ParameterKind, VertexAttributes};

const ENTRY_POINT: &str = "void material(inout MaterialInputs material)";

static UV_FETCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"getUV(\d+)\(\)").expect("UV fetch pattern"));
static SAMPLER_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"materialParams_(\w+)").expect("sampler pattern"));
static UNIFORM_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"materialParams\.(\w+)").expect("uniform pattern"));

/// Check a description, returning the first problem found
pub fn validate(desc: &MaterialDescription) -> Result<(), String> {
    if desc.name.is_empty() {
        return Err("material name is empty".to_string());
    }

    check_shader_structure(&desc.shader)?;
    check_parameters(desc)?;
    check_uv_channels(desc)?;
    check_blending(desc)
}

fn check_shader_structure(shader: &str) -> Result<(), String> {
    if !shader.contains(ENTRY_POINT) {
        return Err("shader has no material() entry point".to_string());
    }

    let mut depth = 0usize;
    for c in shader.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced braces in shader".to_string())?
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced braces in shader".to_string());
    }
    Ok(())
}

fn check_parameters(desc: &MaterialDescription) -> Result<(), String> {
    let mut seen = HashSet::new();
    for param in &desc.parameters {
        if !seen.insert(param.name.as_str()) {
            return Err(format!("parameter '{}' declared twice", param.name));
        }
    }

    let declared = |name: &str, sampler: bool| {
        desc.parameter(name).is_some_and(|p| {
            matches!(
                (p.kind, sampler),
                (ParameterKind::Sampler(_), true) | (ParameterKind::Uniform(_), false)
            )
        })
    };

    for caps in SAMPLER_REF.captures_iter(&desc.shader) {
        let name = &caps[1];
        if !declared(name, true) {
            return Err(format!("shader samples undeclared sampler '{name}'"));
        }
    }
    for caps in UNIFORM_REF.captures_iter(&desc.shader) {
        let name = &caps[1];
        if !declared(name, false) {
            return Err(format!("shader reads undeclared uniform '{name}'"));
        }
    }
    Ok(())
}

fn check_uv_channels(desc: &MaterialDescription) -> Result<(), String> {
    for caps in UV_FETCH.captures_iter(&desc.shader) {
        let channel = &caps[1];
        let attribute = channel
            .parse::<u8>()
            .ok()
            .and_then(VertexAttributes::uv)
            .ok_or_else(|| format!("UV channel {channel} is not supported"))?;
        if !desc.required_attributes.contains(attribute) {
            return Err(format!(
                "shader reads UV{channel} but the material does not require it"
            ));
        }
    }
    Ok(())
}

fn check_blending(desc: &MaterialDescription) -> Result<(), String> {
    match (desc.blending, desc.mask_threshold) {
        (BlendingMode::Masked, None) => Err("masked material has no mask threshold".to_string()),
        (BlendingMode::Masked, Some(t)) if !t.is_finite() || t < 0.0 => {
            Err(format!("invalid mask threshold {t}"))
        }
        (BlendingMode::Opaque | BlendingMode::Transparent, Some(_)) => Err(format!(
            "mask threshold set on {:?} material",
            desc.blending
        )),
        _ => Ok(()),
    }
}
