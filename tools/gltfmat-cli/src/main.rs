//! gltfmat - inspect and batch-build glTF surface materials
//!
//! # Commands
//!
//! - `gltfmat shader` - Print the shader synthesized for a key
//! - `gltfmat describe` - Print the material-builder invocation for a key
//! - `gltfmat build` - Run a manifest of keys through the materials cache
//!
//! # Usage
//!
//! ```bash
//! # Shader for a transparent, unlit surface
//! gltfmat shader --alpha-mode transparent --unlit
//!
//! # Builder invocation as JSON
//! gltfmat describe --alpha-mode masked --mask-threshold 0.3 --json
//!
//! # Build every material in a manifest
//! gltfmat build materials.toml --config cache.toml
//! ```
//!
//! # Manifest
//!
//! ```toml
//! [[material]]
//! name = "foliage"
//! alpha_mode = "MASK"
//! alpha_mask_threshold = 0.3
//! double_sided = true
//!
//! [[material]]
//! name = "decal"
//! alpha_mode = "BLEND"
//! base_color_uv = 1
//! ```

mod build;
mod describe;
mod key_args;
mod manifest;
mod shader;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// gltfmat - inspect and batch-build glTF surface materials
#[derive(Parser)]
#[command(name = "gltfmat")]
#[command(about = "Inspect and batch-build glTF surface materials")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the shader synthesized for a key
    Shader(shader::ShaderArgs),

    /// Print the material-builder invocation for a key
    Describe(describe::DescribeArgs),

    /// Build every material in a manifest through the materials cache
    Build(build::BuildArgs),
}

fn main() -> Result<()> {
    // Logs go to stderr so shader and JSON output stay pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Shader(args) => shader::execute(args),
        Commands::Describe(args) => describe::execute(args),
        Commands::Build(args) => build::execute(args),
    }
}
