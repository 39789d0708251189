//! Build command - run a manifest through the materials cache
//!
//! Every entry is looked up in one [`MaterialsCache`] backed by the headless
//! engine, so entries with equal keys share a material exactly as they would
//! in a loaded glTF asset.

use anyhow::{Context, Result};
use clap::Args;
use gltfmat_materials::{CacheConfig, HeadlessEngine, MaterialId, MaterialsCache};
use std::path::PathBuf;

use crate::manifest::MaterialManifest;

/// Arguments for the build command
#[derive(Args)]
pub struct BuildArgs {
    /// Material manifest (TOML with [[material]] entries)
    pub manifest: PathBuf,

    /// Cache configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Outcome of building one manifest entry
#[derive(Debug)]
pub struct EntryReport {
    pub label: String,
    pub fingerprint: u64,
    pub material: MaterialId,
    /// Material was already built for an earlier entry
    pub reused: bool,
}

#[derive(Debug)]
pub struct BuildReport {
    pub entries: Vec<EntryReport>,
    pub distinct: usize,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let manifest = MaterialManifest::load(&args.manifest)?;
    let config = match &args.config {
        Some(path) => CacheConfig::load(path)
            .with_context(|| format!("Failed to load cache config: {}", path.display()))?,
        None => CacheConfig::default(),
    };

    println!("=== Building {} ===", args.manifest.display());
    let report = build_manifest(&manifest, config)?;

    for entry in &report.entries {
        println!(
            "  {:<20} {:016x} -> material {}{}",
            entry.label,
            entry.fingerprint,
            entry.material,
            if entry.reused { " (cached)" } else { "" }
        );
    }
    println!(
        "Built {} distinct materials for {} entries",
        report.distinct,
        report.entries.len()
    );
    Ok(())
}

/// Build every entry of a manifest, stopping at the first failure
pub fn build_manifest(manifest: &MaterialManifest, config: CacheConfig) -> Result<BuildReport> {
    let engine = HeadlessEngine::new();
    let mut cache = MaterialsCache::with_config(&engine, config);
    let mut entries = Vec::with_capacity(manifest.materials.len());

    for (index, entry) in manifest.materials.iter().enumerate() {
        let label = entry.label(index);
        let reused = cache.contains(&entry.key);
        let material = cache
            .get_or_create_material(&entry.key)
            .with_context(|| format!("Failed to build material '{label}'"))?;

        entries.push(EntryReport {
            label,
            fingerprint: entry.key.fingerprint(),
            material,
            reused,
        });
    }

    let distinct = cache.materials_count();
    tracing::info!(
        "Built {} distinct materials ({} live in engine)",
        distinct,
        engine.live_count()
    );
    Ok(BuildReport { entries, distinct })
}
