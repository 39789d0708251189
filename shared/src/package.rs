//! Compiled material packages
//!
//! A package is the opaque byte buffer a material builder produces and an
//! engine's material factory consumes. Its layout belongs to the engine.

/// Opaque compiled material package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    data: Vec<u8>,
}

impl Package {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl From<Vec<u8>> for Package {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
