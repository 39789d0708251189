//! Describe command - print the material-builder invocation for a key

use anyhow::Result;
use clap::Args;
use gltfmat_materials::{DEFAULT_MATERIAL_NAME, MaterialDescription, generate_shader, material_description};
use gltfmat_shared::{BlendingMode, MaterialKey};
use std::fmt::Write;

use crate::key_args::KeyArgs;

/// Arguments for the describe command
#[derive(Args)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Material name passed to the builder
    #[arg(long, default_value = DEFAULT_MATERIAL_NAME)]
    pub name: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Include the shader source in text output
    #[arg(long)]
    pub shader: bool,
}

/// Execute the describe command
pub fn execute(args: DescribeArgs) -> Result<()> {
    let key = args.key.to_key();
    let desc = material_description(&key, generate_shader(&key), &args.name);

    if args.json {
        println!("{}", to_json(&key, &desc)?);
    } else {
        print!("{}", render(&key, &desc, args.shader));
    }
    Ok(())
}

fn to_json(key: &MaterialKey, desc: &MaterialDescription) -> Result<String> {
    let report = serde_json::json!({
        "fingerprint": format!("{:016x}", key.fingerprint()),
        "key": key,
        "description": desc,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

fn render(key: &MaterialKey, desc: &MaterialDescription, with_shader: bool) -> String {
    let mut out = String::new();
    let attributes: Vec<_> = desc.required_attributes.iter_names().map(|(name, _)| name).collect();

    let _ = writeln!(out, "=== Material '{}' ===", desc.name);
    let _ = writeln!(out, "  Fingerprint: {:016x}", key.fingerprint());
    let _ = writeln!(out, "  Key: {key}");
    let _ = writeln!(out, "  Double sided: {}", desc.double_sided);
    let _ = writeln!(out, "  Required attributes: {}", attributes.join(" | "));
    match (desc.blending, desc.mask_threshold) {
        (BlendingMode::Masked, Some(threshold)) => {
            let _ = writeln!(out, "  Blending: Masked (threshold {threshold})");
        }
        (blending, _) => {
            let _ = writeln!(out, "  Blending: {blending:?}");
        }
    }
    let _ = writeln!(out, "  Shading: {:?}", desc.shading);
    let _ = writeln!(out, "  Parameters ({}):", desc.parameters.len());
    for param in &desc.parameters {
        let _ = writeln!(out, "    {:<10} {}", param.kind.to_string(), param.name);
    }
    if with_shader {
        let _ = writeln!(out, "  Shader:");
        for line in desc.shader.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}
