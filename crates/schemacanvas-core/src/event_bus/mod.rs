//! # Event Bus Module
//!
//! Notification channel between a diagram scene and its host application.
//!
//! ## Overview
//!
//! Every scene owns one bus:
//! - The scene publishes typed events without knowing its observers
//! - Observers filter by category and receive events by value
//! - Async observers can poll a broadcast receiver instead
//!
//! Handlers only receive copies of event data, so they cannot reach back
//! into the scene while it is in the middle of a mutation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemacanvas_core::event_bus::{EventBus, EventCategory, EventFilter, SceneEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Movement]),
//!     |event| {
//!         if let SceneEvent::ObjectsMoved { settled } = event {
//!             println!("objects moved, settled: {settled}");
//!         }
//!     },
//! );
//!
//! bus.publish(SceneEvent::ObjectsMoved { settled: true }).ok();
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
