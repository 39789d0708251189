//! Shared types for the glTF materials cache.
//!
//! - [`MaterialKey`] identifies a glTF surface configuration.
//! - [`MaterialBuilder`] describes the material-builder invocation an engine
//!   compiles into a [`Package`].

pub mod builder;
pub mod key;
pub mod package;

pub use builder::{
    BlendingMode, MaterialBuilder, MaterialDescription, Parameter, ParameterKind, SamplerType, Shading, UniformType,
    VertexAttributes,
};
pub use key::{AlphaMode, MaterialKey};
pub use package::Package;
