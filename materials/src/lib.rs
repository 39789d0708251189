//! Memoizing cache of compiled glTF surface materials.
//!
//! A glTF loader describes each primitive's surface as a [`MaterialKey`]
//! (alpha mode, lighting, which UV set each texture samples, ...). The
//! [`MaterialsCache`] synthesizes a shader for every distinct key, drives the
//! host [`Engine`]'s material builder and factory once per key, and hands the
//! same material back for every later lookup until it is torn down.
//!
//! ```
//! use gltfmat_materials::{HeadlessEngine, MaterialKey, MaterialsCache};
//!
//! let engine = HeadlessEngine::new();
//! let mut cache = MaterialsCache::new(&engine);
//!
//! let a = cache.get_or_create_material(&MaterialKey::default()).unwrap();
//! let b = cache.get_or_create_material(&MaterialKey::default()).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(cache.materials_count(), 1);
//!
//! cache.destroy_materials();
//! assert_eq!(engine.live_count(), 0);
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod headless;
pub mod material_creation;
pub mod shader_gen;

pub use cache::MaterialsCache;
pub use config::CacheConfig;
pub use engine::Engine;
pub use error::{BuildError, ConfigError};
pub use headless::{HeadlessEngine, HeadlessMaterial, MaterialId};
pub use material_creation::{DEFAULT_MATERIAL_NAME, create_material, material_description};
pub use shader_gen::generate_shader;

pub use gltfmat_shared::{AlphaMode, MaterialDescription, MaterialKey, Package};
