//! Material key command-line flags, shared by `shader` and `describe`.

use clap::{Args, ValueEnum};
use gltfmat_shared::key::DEFAULT_MASK_THRESHOLD;
use gltfmat_shared::{AlphaMode, MaterialKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AlphaModeArg {
    #[default]
    Opaque,
    Masked,
    Transparent,
}

impl From<AlphaModeArg> for AlphaMode {
    fn from(arg: AlphaModeArg) -> Self {
        match arg {
            AlphaModeArg::Opaque => AlphaMode::Opaque,
            AlphaModeArg::Masked => AlphaMode::Masked,
            AlphaModeArg::Transparent => AlphaMode::Transparent,
        }
    }
}

/// Surface configuration flags
#[derive(Debug, Clone, Args)]
pub struct KeyArgs {
    /// Render both faces
    #[arg(long)]
    pub double_sided: bool,

    /// Skip lighting (KHR_materials_unlit)
    #[arg(long)]
    pub unlit: bool,

    /// Mesh provides vertex colors
    #[arg(long)]
    pub vertex_colors: bool,

    #[arg(long, value_enum, default_value_t = AlphaModeArg::Opaque)]
    pub alpha_mode: AlphaModeArg,

    /// Alpha-test threshold (glTF alphaCutoff)
    #[arg(long, default_value_t = DEFAULT_MASK_THRESHOLD)]
    pub mask_threshold: f32,

    /// UV channel sampled by the base color texture
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub base_color_uv: u8,

    /// UV channel sampled by the metallic-roughness texture
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub metallic_roughness_uv: u8,

    /// UV channel sampled by the emissive texture
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub emissive_uv: u8,

    /// UV channel sampled by the occlusion texture
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub ao_uv: u8,

    /// UV channel sampled by the normal map
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub normal_uv: u8,
}

impl KeyArgs {
    pub fn to_key(&self) -> MaterialKey {
        MaterialKey {
            double_sided: self.double_sided,
            unlit: self.unlit,
            has_vertex_colors: self.vertex_colors,
            alpha_mode: self.alpha_mode.into(),
            alpha_mask_threshold: self.mask_threshold,
            base_color_uv: self.base_color_uv,
            metallic_roughness_uv: self.metallic_roughness_uv,
            emissive_uv: self.emissive_uv,
            ao_uv: self.ao_uv,
            normal_uv: self.normal_uv,
        }
    }

    #[cfg(test)]
    pub fn from_key(key: &MaterialKey) -> Self {
        Self {
            double_sided: key.double_sided,
            unlit: key.unlit,
            vertex_colors: key.has_vertex_colors,
            alpha_mode: match key.alpha_mode {
                AlphaMode::Opaque => AlphaModeArg::Opaque,
                AlphaMode::Masked => AlphaModeArg::Masked,
                AlphaMode::Transparent => AlphaModeArg::Transparent,
            },
            mask_threshold: key.alpha_mask_threshold,
            base_color_uv: key.base_color_uv,
            metallic_roughness_uv: key.metallic_roughness_uv,
            emissive_uv: key.emissive_uv,
            ao_uv: key.ao_uv,
            normal_uv: key.normal_uv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        key: KeyArgs,
    }

    fn parse(args: &[&str]) -> Result<MaterialKey, clap::Error> {
        let argv = std::iter::once("gltfmat").chain(args.iter().copied());
        TestCli::try_parse_from(argv).map(|cli| cli.key.to_key())
    }

    #[test]
    fn test_no_flags_is_default_key() {
        assert_eq!(parse(&[]).unwrap(), MaterialKey::default());
    }

    #[test]
    fn test_all_flags() {
        let key = parse(&[
            "--double-sided",
            "--unlit",
            "--vertex-colors",
            "--alpha-mode",
            "masked",
            "--mask-threshold",
            "0.25",
            "--base-color-uv",
            "1",
            "--normal-uv",
            "1",
        ])
        .unwrap();
        assert!(key.double_sided && key.unlit && key.has_vertex_colors);
        assert_eq!(key.alpha_mode, AlphaMode::Masked);
        assert_eq!(key.alpha_mask_threshold, 0.25);
        assert_eq!(key.base_color_uv, 1);
        assert_eq!(key.normal_uv, 1);
        assert_eq!(key.ao_uv, 0);
    }

    #[test]
    fn test_rejects_uv_channel_two() {
        assert!(parse(&["--ao-uv", "2"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_alpha_mode() {
        assert!(parse(&["--alpha-mode", "additive"]).is_err());
    }
}
