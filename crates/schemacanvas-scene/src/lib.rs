//! # SchemaCanvas Scene
//!
//! The interactive canvas behind a schema diagram. A [`DiagramScene`] owns
//! every placed object (tables, views, schemas, textboxes and the
//! relationships between them) and keeps the derived state consistent as
//! the user works:
//!
//! - **Layers**: named layers, the active set and per-layer outlines
//! - **Selection**: top-level objects plus children inside containers
//! - **Moves**: pointer drags and arrow-key nudges, finalized once per gesture
//! - **Auto-scroll**: edge scrolling while dragging near a viewport border
//! - **Printing**: page tiling of the used canvas area
//!
//! ## Architecture
//!
//! ```text
//! DiagramScene
//!   ├── ObjectStore        (objects, hit testing)
//!   ├── LayerRegistry      (names, active set, decorations)
//!   ├── SelectionTracker   (selected objects and children)
//!   ├── InteractionState   (idle / range selecting / moving)
//!   ├── Scheduler          (scroll, hover and settle timers)
//!   └── EventBus           (notifications to observers)
//! ```
//!
//! Rendering is left to the host. Hosts feed input through the `mouse_*`
//! and `key_*` methods, attach viewports through [`HostView`] and call
//! [`DiagramScene::process_timers`] when [`DiagramScene::next_deadline`]
//! passes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemacanvas_core::{Point, Size};
//! use schemacanvas_scene::{DiagramScene, SpatialObject};
//!
//! let mut scene = DiagramScene::default();
//! let table = scene.add_object(SpatialObject::table(Point::new(40.0, 40.0), Size::new(120.0, 80.0)))?;
//! scene.select_object(table, true)?;
//! ```

pub mod auto_scroll;
pub mod bounds;
pub mod grid;
pub mod interaction;
pub mod layers;
pub mod object;
pub mod pagination;
pub mod scene;
pub mod scheduler;
pub mod selection;
pub mod store;
pub mod view;

pub use auto_scroll::AutoScrollController;
pub use bounds::{BoundingRectCalculator, DecorationMetrics};
pub use grid::GridSnapper;
pub use interaction::{
    ArrowKey, EdgeScrollState, InteractionState, Modifiers, MoveSession, MoveSource,
    RelationshipLine,
};
pub use layers::{LayerDecoration, LayerRegistry, RenameOutcome, TextAlignment};
pub use object::{
    ChildItem, LabelKind, ObjectKind, ObjectPayload, RelationshipData, SchemaData, SpatialObject,
};
pub use pagination::{PrintLayout, PrintPaginator};
pub use scene::DiagramScene;
pub use scheduler::{Clock, ManualClock, Scheduler, SystemClock, TimerKind};
pub use selection::{SelectionChange, SelectionTracker};
pub use store::ObjectStore;
pub use view::{HostView, ViewHandle};
