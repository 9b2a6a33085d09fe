//! Engine-wide default values.
//!
//! These are defaults only; the live values are carried by each scene's
//! configuration so that several open diagrams stay independent.

/// Index of the default layer. It can be renamed but never removed.
pub const DEFAULT_LAYER: u32 = 0;

/// Name given to the default layer of a new scene.
pub const DEFAULT_LAYER_NAME: &str = "Default layer";

/// Grid cell size in canvas units. Also the minimum accepted value.
pub const DEFAULT_GRID_SIZE: u32 = 20;
pub const MIN_GRID_SIZE: u32 = 20;

/// Distance (pixels) scrolled per auto-scroll tick.
pub const SCENE_MOVE_STEP: f64 = 20.0;

/// Distance (pixels) from a viewport edge that triggers auto-scroll.
pub const SCENE_MOVE_THRESHOLD: f64 = 30.0;

/// Auto-scroll tick interval in milliseconds.
pub const SCENE_MOVE_TIMEOUT_MS: u64 = 50;

/// Corner-hover confirmation and keystroke settle delays.
pub const CORNER_HOVER_TIMEOUT_MS: u64 = SCENE_MOVE_TIMEOUT_MS * 10;
pub const OBJECT_MOVE_TIMEOUT_MS: u64 = SCENE_MOVE_TIMEOUT_MS * 10;

/// Padding between an object and each layer outline drawn around it.
pub const LAYER_PADDING: f64 = 10.0;

/// Height reserved for a layer name label.
pub const LAYER_LABEL_HEIGHT: f64 = 16.0;

/// Print scale bounds.
pub const MIN_SCALE_FACTOR: f64 = 0.1;
pub const MAX_SCALE_FACTOR: f64 = 5.0;

/// Padding and title band of a schema's enclosing rectangle.
pub const SCHEMA_PADDING: f64 = 10.0;
pub const SCHEMA_TITLE_HEIGHT: f64 = 20.0;

/// Extra thickness given to relationship line boxes so horizontal or
/// vertical lines still have an area.
pub const RELATIONSHIP_LINE_PADDING: f64 = 1.0;

/// Typographic points per millimetre.
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;
