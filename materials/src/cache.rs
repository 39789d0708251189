//! Materials cache
//!
//! Maps material keys to compiled materials. Materials are built on the first
//! lookup of a key and shared by every later lookup of an equal key until the
//! cache is torn down.

use hashbrown::HashMap;

use gltfmat_shared::MaterialKey;

use crate::config::CacheConfig;
use crate::engine::Engine;
use crate::error::BuildError;
use crate::material_creation::build_material;
use crate::shader_gen::generate_shader;

/// Cache of compiled materials keyed by surface configuration.
///
/// The cache borrows the engine that creates its materials and owns every
/// material it builds. All of them are destroyed together by
/// [`MaterialsCache::destroy_materials`], or when the cache is dropped.
///
/// Not thread-safe; mutation goes through `&mut self`, so an owner sharing the
/// cache across threads has to lock it.
pub struct MaterialsCache<'e, E: Engine> {
    engine: &'e E,
    config: CacheConfig,
    cache: HashMap<MaterialKey, E::Material>,
    /// Built materials in first-insertion order
    materials: Vec<E::Material>,
}

impl<'e, E: Engine> MaterialsCache<'e, E> {
    /// Create an empty cache with the default configuration
    pub fn new(engine: &'e E) -> Self {
        Self::with_config(engine, CacheConfig::default())
    }

    /// Create an empty cache
    pub fn with_config(engine: &'e E, config: CacheConfig) -> Self {
        Self {
            engine,
            config,
            cache: HashMap::new(),
            materials: Vec::new(),
        }
    }

    fn lookup_key(&self, key: &MaterialKey) -> MaterialKey {
        if self.config.canonicalize_keys {
            key.canonical()
        } else {
            *key
        }
    }

    /// Get or create the material for a key
    ///
    /// Returns the cached material if one was built for an equal key since the
    /// last teardown. Otherwise synthesizes the shader, builds the material
    /// through the engine, records it and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the engine refuses to compile or create the
    /// material. Nothing is recorded in that case.
    pub fn get_or_create_material(&mut self, key: &MaterialKey) -> Result<E::Material, BuildError> {
        let key = self.lookup_key(key);

        // Return existing material if cached
        if let Some(&material) = self.cache.get(&key) {
            return Ok(material);
        }

        debug_assert!(
            self.engine.is_alive(),
            "engine torn down while the materials cache is in use"
        );

        // Otherwise, build a new material
        tracing::debug!("Creating material {:016x}: {}", key.fingerprint(), key);

        let shader = generate_shader(&key);
        if self.config.trace_shaders {
            tracing::trace!("Material {:016x} shader:\n{}", key.fingerprint(), shader);
        }

        let material = build_material(self.engine, &key, shader, &self.config.material_name)
            .inspect_err(|e| {
                tracing::warn!("Failed to build material {:016x}: {}", key.fingerprint(), e)
            })?;

        self.cache.insert(key, material);
        self.materials.push(material);
        Ok(material)
    }

    /// Get the material built for a key, without building one
    pub fn get(&self, key: &MaterialKey) -> Option<E::Material> {
        self.cache.get(&self.lookup_key(key)).copied()
    }

    /// Check if a material has been built for a key
    pub fn contains(&self, key: &MaterialKey) -> bool {
        self.cache.contains_key(&self.lookup_key(key))
    }

    /// Number of distinct materials built since the last teardown
    pub fn materials_count(&self) -> usize {
        self.materials.len()
    }

    /// All built materials, in the order their keys were first seen
    pub fn materials(&self) -> &[E::Material] {
        &self.materials
    }

    /// Destroy every built material through the engine and empty the cache.
    ///
    /// The cache stays usable; later lookups build materials again. Calling
    /// this on an empty cache does nothing.
    pub fn destroy_materials(&mut self) {
        if self.materials.is_empty() {
            return;
        }

        debug_assert!(
            self.engine.is_alive(),
            "engine torn down before its materials were destroyed"
        );

        tracing::debug!("Destroying {} cached materials", self.materials.len());
        for material in self.materials.drain(..) {
            self.engine.destroy_material(material);
        }
        self.cache.clear();
    }

    pub fn engine(&self) -> &'e E {
        self.engine
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl<E: Engine> Drop for MaterialsCache<'_, E> {
    fn drop(&mut self) {
        if !self.materials.is_empty() && !self.engine.is_alive() {
            tracing::error!(
                "Engine torn down before {} cached materials were destroyed",
                self.materials.len()
            );
            return;
        }
        self.destroy_materials();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gltfmat_shared::{AlphaMode, MaterialDescription, Package};
    use std::cell::{Cell, RefCell};

    /// Engine that hands out sequential handles and records destroys
    #[derive(Default)]
    struct CountingEngine {
        next: Cell<u32>,
        destroyed: RefCell<Vec<u32>>,
        reject_unlit: bool,
    }

    impl Engine for CountingEngine {
        type Material = u32;

        fn build_package(&self, description: &MaterialDescription) -> Result<Package, BuildError> {
            if self.reject_unlit && description.shading == gltfmat_shared::Shading::Unlit {
                return Err(BuildError::compile(&description.name, "unlit not supported"));
            }
            Ok(Package::new(description.shader.clone().into_bytes()))
        }

        fn create_material(&self, _package: &Package) -> Result<u32, BuildError> {
            let id = self.next.get();
            self.next.set(id + 1);
            Ok(id)
        }

        fn destroy_material(&self, material: u32) {
            self.destroyed.borrow_mut().push(material);
        }
    }

    #[test]
    fn test_miss_then_hit() {
        let engine = CountingEngine::default();
        let mut cache = MaterialsCache::new(&engine);
        let key = MaterialKey::default();

        let first = cache.get_or_create_material(&key).unwrap();
        assert_eq!(cache.materials_count(), 1);
        let second = cache.get_or_create_material(&key).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.materials_count(), 1);
        assert_eq!(engine.next.get(), 1);
    }

    #[test]
    fn test_get_does_not_build() {
        let engine = CountingEngine::default();
        let mut cache = MaterialsCache::new(&engine);
        let key = MaterialKey::default();

        assert!(!cache.contains(&key));
        assert_eq!(cache.get(&key), None);
        let material = cache.get_or_create_material(&key).unwrap();
        assert!(cache.contains(&key));
        assert_eq!(cache.get(&key), Some(material));
    }

    #[test]
    fn test_failed_build_records_nothing() {
        let engine = CountingEngine {
            reject_unlit: true,
            ..Default::default()
        };
        let mut cache = MaterialsCache::new(&engine);
        let unlit = MaterialKey {
            unlit: true,
            ..Default::default()
        };

        let err = cache.get_or_create_material(&unlit).unwrap_err();
        assert!(matches!(err, BuildError::Compile { .. }));
        assert_eq!(cache.materials_count(), 0);
        assert!(!cache.contains(&unlit));

        // Other keys still build
        cache.get_or_create_material(&MaterialKey::default()).unwrap();
        assert_eq!(cache.materials_count(), 1);
    }

    #[test]
    fn test_destroy_materials_is_idempotent() {
        let engine = CountingEngine::default();
        let mut cache = MaterialsCache::new(&engine);
        cache.get_or_create_material(&MaterialKey::default()).unwrap();
        cache
            .get_or_create_material(&MaterialKey {
                unlit: true,
                ..Default::default()
            })
            .unwrap();

        cache.destroy_materials();
        cache.destroy_materials();
        assert_eq!(cache.materials_count(), 0);
        assert!(cache.materials().is_empty());
        assert_eq!(*engine.destroyed.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_rebuild_after_destroy() {
        let engine = CountingEngine::default();
        let mut cache = MaterialsCache::new(&engine);
        let key = MaterialKey::default();
        let before = cache.get_or_create_material(&key).unwrap();
        cache.destroy_materials();
        let after = cache.get_or_create_material(&key).unwrap();
        assert_ne!(before, after);
        assert_eq!(cache.materials_count(), 1);
    }

    #[test]
    fn test_drop_destroys_materials() {
        let engine = CountingEngine::default();
        {
            let mut cache = MaterialsCache::new(&engine);
            cache.get_or_create_material(&MaterialKey::default()).unwrap();
            cache
                .get_or_create_material(&MaterialKey {
                    normal_uv: 1,
                    ..Default::default()
                })
                .unwrap();
        }
        assert_eq!(*engine.destroyed.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_drop_after_explicit_destroy_does_not_double_free() {
        let engine = CountingEngine::default();
        {
            let mut cache = MaterialsCache::new(&engine);
            cache.get_or_create_material(&MaterialKey::default()).unwrap();
            cache.destroy_materials();
        }
        assert_eq!(*engine.destroyed.borrow(), vec![0]);
    }

    #[test]
    fn test_canonicalized_lookup_merges_inert_fields() {
        let engine = CountingEngine::default();
        let config = CacheConfig {
            canonicalize_keys: true,
            ..Default::default()
        };
        let mut cache = MaterialsCache::with_config(&engine, config);

        let plain = MaterialKey::default();
        let colored = MaterialKey {
            has_vertex_colors: true,
            alpha_mask_threshold: 0.9,
            ..Default::default()
        };
        let a = cache.get_or_create_material(&plain).unwrap();
        let b = cache.get_or_create_material(&colored).unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.materials_count(), 1);

        // Masked thresholds stay significant
        let masked = |t| MaterialKey {
            alpha_mode: AlphaMode::Masked,
            alpha_mask_threshold: t,
            ..Default::default()
        };
        let c = cache.get_or_create_material(&masked(0.25)).unwrap();
        let d = cache.get_or_create_material(&masked(0.75)).unwrap();
        assert_ne!(c, d);
    }

    #[test]
    fn test_material_name_from_config() {
        struct NameCheck;
        impl Engine for NameCheck {
            type Material = ();
            fn build_package(&self, d: &MaterialDescription) -> Result<Package, BuildError> {
                assert_eq!(d.name, "gltf_pbr");
                Ok(Package::new(Vec::new()))
            }
            fn create_material(&self, _: &Package) -> Result<(), BuildError> {
                Ok(())
            }
            fn destroy_material(&self, _: ()) {}
        }

        let config = CacheConfig {
            material_name: "gltf_pbr".to_string(),
            ..Default::default()
        };
        let mut cache = MaterialsCache::with_config(&NameCheck, config);
        cache.get_or_create_material(&MaterialKey::default()).unwrap();
    }
}
