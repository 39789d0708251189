//! Headless engine
//!
//! An [`Engine`] with no GPU behind it. Packages are validated and serialized
//! like a real material compiler would, and created materials are kept in a
//! registry so tests and tools can inspect what was built and what leaked.

mod package;
mod validate;

use std::cell::{Cell, RefCell};
use std::fmt;

use hashbrown::HashMap;

use gltfmat_shared::{MaterialDescription, Package};

use crate::engine::Engine;
use crate::error::BuildError;

pub use package::{PACKAGE_MAGIC, PACKAGE_VERSION, decode_package, encode_package};
pub use validate::validate;

/// Handle to a material created by [`HeadlessEngine`]
///
/// Ids are allocated sequentially and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live material in the registry
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMaterial {
    pub description: MaterialDescription,
    /// Size of the package the material was created from
    pub package_size: usize,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u32,
    live: HashMap<MaterialId, HeadlessMaterial>,
    created: usize,
    destroyed: usize,
    invalid_destroys: usize,
}

/// GPU-less engine with a validating builder and a material registry.
///
/// Single-threaded, like the cache that drives it.
#[derive(Debug)]
pub struct HeadlessEngine {
    registry: RefCell<Registry>,
    alive: Cell<bool>,
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self {
            registry: RefCell::new(Registry::default()),
            alive: Cell::new(true),
        }
    }

    /// Mark the engine torn down. The factory refuses packages afterwards.
    pub fn shutdown(&self) {
        tracing::debug!(
            "Headless engine shutting down with {} live materials",
            self.registry.borrow().live.len()
        );
        self.alive.set(false);
    }

    /// Look up a live material
    pub fn material(&self, id: MaterialId) -> Option<HeadlessMaterial> {
        self.registry.borrow().live.get(&id).cloned()
    }

    /// Ids of all live materials, in creation order
    pub fn live_materials(&self) -> Vec<MaterialId> {
        let mut ids: Vec<_> = self.registry.borrow().live.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn live_count(&self) -> usize {
        self.registry.borrow().live.len()
    }

    pub fn created_count(&self) -> usize {
        self.registry.borrow().created
    }

    pub fn destroyed_count(&self) -> usize {
        self.registry.borrow().destroyed
    }

    /// Destroys of unknown or already destroyed ids
    pub fn invalid_destroys(&self) -> usize {
        self.registry.borrow().invalid_destroys
    }
}

impl Engine for HeadlessEngine {
    type Material = MaterialId;

    fn build_package(&self, description: &MaterialDescription) -> Result<Package, BuildError> {
        validate(description).map_err(|reason| BuildError::compile(&description.name, reason))?;
        Ok(encode_package(description))
    }

    fn create_material(&self, package: &Package) -> Result<MaterialId, BuildError> {
        if !self.alive.get() {
            return Err(BuildError::factory(package.size(), "engine has been shut down"));
        }

        let description = decode_package(package)?;

        let mut registry = self.registry.borrow_mut();
        let id = MaterialId(registry.next_id);
        registry.next_id += 1;
        registry.created += 1;
        registry.live.insert(
            id,
            HeadlessMaterial {
                description,
                package_size: package.size(),
            },
        );

        tracing::trace!("Created headless material {}", id);
        Ok(id)
    }

    fn destroy_material(&self, material: MaterialId) {
        let mut registry = self.registry.borrow_mut();
        if registry.live.remove(&material).is_some() {
            registry.destroyed += 1;
        } else {
            registry.invalid_destroys += 1;
            tracing::error!("Destroying unknown material {}", material);
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material_creation::{DEFAULT_MATERIAL_NAME, create_material};
    use gltfmat_shared::{MaterialBuilder, MaterialKey, Shading};

    #[test]
    fn test_create_registers_material() {
        let engine = HeadlessEngine::new();
        let key = MaterialKey {
            unlit: true,
            ..Default::default()
        };
        let id = create_material(&engine, &key, DEFAULT_MATERIAL_NAME).unwrap();

        let material = engine.material(id).unwrap();
        assert_eq!(material.description.name, "material");
        assert_eq!(material.description.shading, Shading::Unlit);
        assert!(material.package_size > PACKAGE_MAGIC.len());
        assert_eq!(engine.created_count(), 1);
        assert_eq!(engine.live_materials(), vec![id]);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let engine = HeadlessEngine::new();
        let key = MaterialKey::default();
        let a = create_material(&engine, &key, DEFAULT_MATERIAL_NAME).unwrap();
        engine.destroy_material(a);
        let b = create_material(&engine, &key, DEFAULT_MATERIAL_NAME).unwrap();
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(engine.live_materials(), vec![b]);
    }

    #[test]
    fn test_double_destroy_is_counted() {
        let engine = HeadlessEngine::new();
        let id = create_material(&engine, &MaterialKey::default(), DEFAULT_MATERIAL_NAME).unwrap();
        engine.destroy_material(id);
        engine.destroy_material(id);
        assert_eq!(engine.destroyed_count(), 1);
        assert_eq!(engine.invalid_destroys(), 1);
        assert_eq!(engine.live_count(), 0);
    }

    #[test]
    fn test_builder_rejection_is_compile_error() {
        let engine = HeadlessEngine::new();
        let desc = MaterialBuilder::new().name("broken").material("").finish();
        let err = engine.build_package(&desc).unwrap_err();
        assert!(matches!(err, BuildError::Compile { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_factory_refuses_foreign_package() {
        let engine = HeadlessEngine::new();
        let err = engine
            .create_material(&Package::new(vec![0; 16]))
            .unwrap_err();
        assert!(matches!(err, BuildError::Factory { size: 16, .. }));
        assert_eq!(engine.created_count(), 0);
    }

    #[test]
    fn test_shutdown_refuses_new_materials() {
        let engine = HeadlessEngine::new();
        assert!(engine.is_alive());
        engine.shutdown();
        assert!(!engine.is_alive());

        let err = create_material(&engine, &MaterialKey::default(), DEFAULT_MATERIAL_NAME)
            .unwrap_err();
        assert!(err.to_string().contains("shut down"));
    }

    #[test]
    fn test_material_id_display() {
        let engine = HeadlessEngine::new();
        let id = create_material(&engine, &MaterialKey::default(), DEFAULT_MATERIAL_NAME).unwrap();
        assert_eq!(id.to_string(), "#0");
        assert_eq!(id.index(), 0);
    }
}
