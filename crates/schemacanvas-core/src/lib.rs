//! # SchemaCanvas Core
//!
//! Core types shared by every SchemaCanvas crate.
//! Provides the geometry primitives used for canvas coordinates,
//! the error hierarchy, engine-wide constants and the scene event bus.

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod types;

pub use error::{Error, Result, SceneError};

pub use event_bus::{
    EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter, SceneEvent,
    SubscriptionId,
};

pub use geometry::{Point, Rect, Size};

pub use types::{ChildRef, LayerId, MouseButton, ObjectId};
