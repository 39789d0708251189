//! Engine contract
//!
//! The cache never talks to a GPU directly. The host rendering engine
//! implements [`Engine`]: it compiles material descriptions into packages,
//! turns packages into material handles and destroys those handles again.

use std::fmt::Debug;
use std::hash::Hash;

use gltfmat_shared::{MaterialDescription, Package};

use crate::error::BuildError;

/// Host rendering engine, as seen by the materials cache.
///
/// Methods take `&self`; engines keep their own interior state the way GPU
/// device handles do. The cache is generic over the engine, so calls are
/// statically dispatched.
pub trait Engine {
    /// Handle to a compiled material. Two handles compare equal only if they
    /// name the same material.
    type Material: Copy + Eq + Hash + Debug;

    /// Compile a material description into a package (the material builder).
    fn build_package(&self, description: &MaterialDescription) -> Result<Package, BuildError>;

    /// Create a material from a compiled package (the material factory).
    fn create_material(&self, package: &Package) -> Result<Self::Material, BuildError>;

    /// Destroy a material previously returned by [`Engine::create_material`].
    fn destroy_material(&self, material: Self::Material);

    /// Whether the engine can still create and destroy materials.
    fn is_alive(&self) -> bool {
        true
    }
}
