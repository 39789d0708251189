//! Material keys
//!
//! A material key is the compact description of a glTF surface configuration.
//! Every primitive presenting an equal key shares one compiled material.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// glTF alpha mode of a surface
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphaMode {
    /// Alpha is ignored
    #[default]
    #[serde(alias = "OPAQUE")]
    Opaque = 0,
    /// Alpha-tested against the key's mask threshold
    #[serde(alias = "MASK", alias = "mask", alias = "MASKED")]
    Masked = 1,
    /// Alpha-blended with premultiplied color
    #[serde(alias = "BLEND", alias = "blend", alias = "TRANSPARENT")]
    Transparent = 2,
}

impl AlphaMode {
    /// Lowercase name, matching the serialized form
    pub fn name(self) -> &'static str {
        match self {
            AlphaMode::Opaque => "opaque",
            AlphaMode::Masked => "masked",
            AlphaMode::Transparent => "transparent",
        }
    }
}

/// Default glTF `alphaCutoff`
pub const DEFAULT_MASK_THRESHOLD: f32 = 0.5;

/// Key identifying a surface configuration.
///
/// Equality is field-wise over all ten fields. `alpha_mask_threshold` is
/// compared by bit pattern, and both it and `has_vertex_colors` take part in
/// identity even when they have no effect on the built material.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialKey {
    pub double_sided: bool,
    pub unlit: bool,
    /// Carried for identity only; shader and builder ignore it.
    pub has_vertex_colors: bool,
    pub alpha_mode: AlphaMode,
    /// Only consumed when `alpha_mode` is [`AlphaMode::Masked`].
    pub alpha_mask_threshold: f32,
    pub base_color_uv: u8,
    pub metallic_roughness_uv: u8,
    pub emissive_uv: u8,
    pub ao_uv: u8,
    pub normal_uv: u8,
}

impl Default for MaterialKey {
    fn default() -> Self {
        Self {
            double_sided: false,
            unlit: false,
            has_vertex_colors: false,
            alpha_mode: AlphaMode::Opaque,
            alpha_mask_threshold: DEFAULT_MASK_THRESHOLD,
            base_color_uv: 0,
            metallic_roughness_uv: 0,
            emissive_uv: 0,
            ao_uv: 0,
            normal_uv: 0,
        }
    }
}

impl MaterialKey {
    /// Length of the encoding returned by [`MaterialKey::to_bytes`]
    pub const ENCODED_LEN: usize = 13;

    /// Canonical byte encoding of all fields, in declaration order.
    ///
    /// Layout: three flag bytes, alpha mode, threshold bits (little endian),
    /// then the five UV indices.
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let t = self.alpha_mask_threshold.to_bits().to_le_bytes();
        [
            self.double_sided as u8,
            self.unlit as u8,
            self.has_vertex_colors as u8,
            self.alpha_mode as u8,
            t[0],
            t[1],
            t[2],
            t[3],
            self.base_color_uv,
            self.metallic_roughness_uv,
            self.emissive_uv,
            self.ao_uv,
            self.normal_uv,
        ]
    }

    /// Stable 64-bit fingerprint of the key, identical across processes
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.to_bytes())
    }

    /// Highest UV channel referenced by any texture slot
    pub fn max_uv_index(&self) -> u8 {
        [
            self.base_color_uv,
            self.metallic_roughness_uv,
            self.emissive_uv,
            self.ao_uv,
            self.normal_uv,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Whether any texture slot samples a channel other than UV0
    pub fn requires_uv1(&self) -> bool {
        self.max_uv_index() > 0
    }

    /// Copy of the key with fields that cannot influence the build reset.
    ///
    /// `has_vertex_colors` is cleared and the mask threshold returns to its
    /// default unless the key is masked. Two keys with equal canonical forms
    /// produce identical shaders and builder invocations.
    pub fn canonical(&self) -> Self {
        Self {
            has_vertex_colors: false,
            alpha_mask_threshold: match self.alpha_mode {
                AlphaMode::Masked => self.alpha_mask_threshold,
                _ => DEFAULT_MASK_THRESHOLD,
            },
            ..*self
        }
    }
}

impl PartialEq for MaterialKey {
    fn eq(&self, other: &Self) -> bool {
        self.double_sided == other.double_sided
            && self.unlit == other.unlit
            && self.has_vertex_colors == other.has_vertex_colors
            && self.alpha_mode == other.alpha_mode
            && self.alpha_mask_threshold.to_bits() == other.alpha_mask_threshold.to_bits()
            && self.base_color_uv == other.base_color_uv
            && self.metallic_roughness_uv == other.metallic_roughness_uv
            && self.emissive_uv == other.emissive_uv
            && self.ao_uv == other.ao_uv
            && self.normal_uv == other.normal_uv
    }
}

impl Eq for MaterialKey {}

impl Hash for MaterialKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(&self.to_bytes());
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            if self.unlit { "unlit" } else { "lit" },
            self.alpha_mode.name()
        )?;
        if self.alpha_mode == AlphaMode::Masked {
            write!(f, "({})", self.alpha_mask_threshold)?;
        }
        if self.double_sided {
            f.write_str(" double-sided")?;
        }
        if self.has_vertex_colors {
            f.write_str(" vertex-colors")?;
        }
        write!(
            f,
            " uv[normal={} base={} mr={} ao={} emissive={}]",
            self.normal_uv, self.base_color_uv, self.metallic_roughness_uv, self.ao_uv, self.emissive_uv
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn test_default_key() {
        let key = MaterialKey::default();
        assert!(!key.double_sided);
        assert!(!key.unlit);
        assert!(!key.has_vertex_colors);
        assert_eq!(key.alpha_mode, AlphaMode::Opaque);
        assert_eq!(key.alpha_mask_threshold, 0.5);
        assert_eq!(key.max_uv_index(), 0);
        assert!(!key.requires_uv1());
    }

    #[test]
    fn test_threshold_participates_in_identity_when_not_masked() {
        let a = MaterialKey::default();
        let b = MaterialKey {
            alpha_mask_threshold: 0.75,
            ..a
        };
        assert_eq!(a.alpha_mode, AlphaMode::Opaque);
        assert_ne!(a, b);
    }

    #[test]
    fn test_vertex_colors_participate_in_identity() {
        let a = MaterialKey::default();
        let b = MaterialKey {
            has_vertex_colors: true,
            ..a
        };
        assert_ne!(a, b);
    }

    #[test]
    fn test_threshold_compared_by_bits() {
        let pos = MaterialKey {
            alpha_mask_threshold: 0.0,
            ..Default::default()
        };
        let neg = MaterialKey {
            alpha_mask_threshold: -0.0,
            ..Default::default()
        };
        assert_ne!(pos, neg);

        let nan = MaterialKey {
            alpha_mask_threshold: f32::NAN,
            ..Default::default()
        };
        assert_eq!(nan, nan);
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let mut set = HashSet::new();
        set.insert(MaterialKey::default());
        set.insert(MaterialKey::default());
        set.insert(MaterialKey {
            normal_uv: 1,
            ..Default::default()
        });
        assert_eq!(set.len(), 2);
        assert!(set.contains(&MaterialKey::default()));
    }

    #[test]
    fn test_encoding_layout() {
        let key = MaterialKey {
            double_sided: true,
            alpha_mode: AlphaMode::Transparent,
            alpha_mask_threshold: 1.0,
            base_color_uv: 1,
            normal_uv: 1,
            ..Default::default()
        };
        let bytes = key.to_bytes();
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[1], 0);
        assert_eq!(bytes[2], 0);
        assert_eq!(bytes[3], 2);
        assert_eq!(&bytes[4..8], &1.0f32.to_bits().to_le_bytes());
        assert_eq!(&bytes[8..], &[1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_fingerprint_follows_identity() {
        let a = MaterialKey::default();
        let b = MaterialKey::default();
        let c = MaterialKey {
            ao_uv: 1,
            ..Default::default()
        };
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_max_uv_index() {
        let key = MaterialKey {
            emissive_uv: 1,
            ..Default::default()
        };
        assert_eq!(key.max_uv_index(), 1);
        assert!(key.requires_uv1());
    }

    #[test]
    fn test_canonical_merges_inert_fields() {
        let a = MaterialKey {
            has_vertex_colors: true,
            alpha_mask_threshold: 0.1,
            ..Default::default()
        };
        assert_eq!(a.canonical(), MaterialKey::default());

        let masked = MaterialKey {
            alpha_mode: AlphaMode::Masked,
            alpha_mask_threshold: 0.1,
            ..Default::default()
        };
        assert_eq!(masked.canonical().alpha_mask_threshold, 0.1);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let key: MaterialKey = toml::from_str(
            r#"
alpha_mode = "masked"
alpha_mask_threshold = 0.25
base_color_uv = 1
"#,
        )
        .unwrap();
        assert_eq!(key.alpha_mode, AlphaMode::Masked);
        assert_eq!(key.alpha_mask_threshold, 0.25);
        assert_eq!(key.base_color_uv, 1);
        assert!(!key.unlit);
    }

    #[test]
    fn test_deserialize_gltf_alpha_mode_spellings() {
        let key: MaterialKey = toml::from_str(r#"alpha_mode = "BLEND""#).unwrap();
        assert_eq!(key.alpha_mode, AlphaMode::Transparent);
        let key: MaterialKey = toml::from_str(r#"alpha_mode = "MASK""#).unwrap();
        assert_eq!(key.alpha_mode, AlphaMode::Masked);
    }

    #[test]
    fn test_display() {
        let key = MaterialKey {
            alpha_mode: AlphaMode::Masked,
            alpha_mask_threshold: 0.25,
            double_sided: true,
            ..Default::default()
        };
        assert_eq!(
            key.to_string(),
            "lit masked(0.25) double-sided uv[normal=0 base=0 mr=0 ao=0 emissive=0]"
        );
    }
}
