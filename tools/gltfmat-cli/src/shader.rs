//! Shader command - print the synthesized shader for a key

use anyhow::{Context, Result};
use clap::Args;
use gltfmat_materials::generate_shader;
use std::path::PathBuf;

use crate::key_args::KeyArgs;

/// Arguments for the shader command
#[derive(Args)]
pub struct ShaderArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Write the shader to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the shader command
pub fn execute(args: ShaderArgs) -> Result<()> {
    let key = args.key.to_key();
    let shader = generate_shader(&key);
    tracing::debug!("Synthesized shader for {:016x}: {}", key.fingerprint(), key);

    match args.output {
        Some(path) => {
            std::fs::write(&path, &shader)
                .with_context(|| format!("Failed to write shader: {}", path.display()))?;
            println!("Wrote {} ({} bytes)", path.display(), shader.len());
        }
        None => print!("{shader}"),
    }
    Ok(())
}
