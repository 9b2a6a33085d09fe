//! Identifier types shared across crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a layer in the layer registry. Index 0 is the default layer.
pub type LayerId = u32;

/// Stable handle of a placed object in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to a child item (column, constraint, ...) inside a container object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildRef {
    pub container: ObjectId,
    pub index: usize,
}

impl ChildRef {
    pub fn new(container: ObjectId, index: usize) -> Self {
        Self { container, index }
    }
}

/// Pointer buttons the scene reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}
