//! # SchemaCanvas
//!
//! Interactive canvas engine for database schema diagrams.
//!
//! ## Architecture
//!
//! SchemaCanvas is organized as a workspace with multiple crates:
//!
//! 1. **schemacanvas-core** - Geometry, ids, errors, constants and the scene event bus
//! 2. **schemacanvas-settings** - Canvas configuration, validation and persistence
//! 3. **schemacanvas-scene** - The diagram scene: layers, selection, moves, auto-scroll, printing
//! 4. **schemacanvas** - Facade crate and the configuration check binary
//!
//! ## Features
//!
//! - **Layers**: Named layers with an active set and per-layer outlines
//! - **Selection**: Click, Control toggle, rubber band and child item selection
//! - **Moves**: Pointer drags and arrow-key nudges with grid snapping
//! - **Auto-scroll**: Edge scrolling while dragging near a viewport border
//! - **Printing**: Page tiling that skips empty leading pages

pub use schemacanvas_core as core;
pub use schemacanvas_scene as scene;
pub use schemacanvas_settings as settings;

pub use schemacanvas_core::{
    ChildRef, Error, EventBus, EventFilter, LayerId, MouseButton, ObjectId, Point, Rect, Result,
    SceneError, SceneEvent, Size,
};

pub use schemacanvas_scene::{
    ArrowKey, DiagramScene, HostView, Modifiers, PrintLayout, SpatialObject, TimerKind,
};

pub use schemacanvas_settings::{CanvasConfig, SettingsPersistence};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
