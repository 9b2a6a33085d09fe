//! Error handling for SchemaCanvas
//!
//! The scene engine is defensive: most operations on invalid input are
//! no-ops. The errors below cover lookups a caller may want to tell apart
//! (unknown object, wrong object kind) plus a unified error for I/O and
//! configuration layers.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::types::{ChildRef, LayerId, ObjectId};

/// Scene error type
///
/// Raised by scene operations that address a specific object or layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No object with this id is placed on the scene
    #[error("Unknown object {0}")]
    UnknownObject(ObjectId),

    /// The container has no child at this index
    #[error("Object {} has no child {}", .0.container, .0.index)]
    UnknownChild(ChildRef),

    /// The operation does not apply to this kind of object
    #[error("Object {object} is a {kind}, expected {expected}")]
    InvalidKind {
        /// The object addressed.
        object: ObjectId,
        /// The object's actual kind.
        kind: String,
        /// The kind the operation requires.
        expected: String,
    },

    /// Layer index out of range
    #[error("Invalid layer index {index} (layer count {count})")]
    InvalidLayer {
        /// The index requested.
        index: LayerId,
        /// The number of layers currently registered.
        count: usize,
    },

    /// Geometry that cannot be placed (NaN or infinite coordinates)
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry {
        /// Description of the problem.
        reason: String,
    },
}

/// Main error type for SchemaCanvas
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a scene error
    pub fn is_scene_error(&self) -> bool {
        matches!(self, Error::Scene(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
