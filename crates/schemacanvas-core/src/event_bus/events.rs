//! Event type definitions for the event bus.
//!
//! Events carry identifiers and flags only, never references into the
//! scene, so they are cheap to clone and safe to hand to any observer.

use serde::{Deserialize, Serialize};

use crate::types::{ChildRef, MouseButton, ObjectId};

/// Notifications a diagram scene sends to its host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// An object's selection flag changed. `object` is `None` when the
    /// whole selection was cleared.
    ObjectSelected {
        /// The object whose selection changed.
        object: Option<ObjectId>,
        /// New selection state.
        selected: bool,
    },
    /// Selected objects moved. `settled` is false when a move gesture
    /// starts (undo checkpoint) and true once it is finalized.
    ObjectsMoved {
        /// Whether the move gesture has finished.
        settled: bool,
    },
    /// A rubber-band selection selected at least one object.
    ObjectsSelectedInRange,
    /// The list of layers changed (added, renamed, removed).
    LayersChanged,
    /// The set of active layers changed.
    ActiveLayersChanged,
    /// Objects were re-homed because their layer was removed.
    ObjectsMovedLayer,
    /// The child selection inside a container changed.
    ChildrenSelectionChanged,
    /// A context menu was requested, optionally over a child item.
    PopupMenuRequested {
        /// Child item under the pointer, if any.
        child: Option<ChildRef>,
    },
    /// An object was double clicked. `None` when nothing (or more than
    /// one object) was selected.
    ObjectDoubleClicked {
        /// The object double clicked.
        object: Option<ObjectId>,
    },
    /// The canvas was pressed while nothing was selected.
    ScenePressed {
        /// Button that was pressed.
        button: MouseButton,
    },
    /// An object's geometry or domain data was modified by the scene.
    ObjectModified {
        /// The modified object.
        object: ObjectId,
    },
}

impl SceneEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            SceneEvent::ObjectSelected { .. }
            | SceneEvent::ObjectsSelectedInRange
            | SceneEvent::ChildrenSelectionChanged => EventCategory::Selection,
            SceneEvent::ObjectsMoved { .. } | SceneEvent::ObjectModified { .. } => {
                EventCategory::Movement
            }
            SceneEvent::LayersChanged
            | SceneEvent::ActiveLayersChanged
            | SceneEvent::ObjectsMovedLayer => EventCategory::Layers,
            SceneEvent::PopupMenuRequested { .. }
            | SceneEvent::ObjectDoubleClicked { .. }
            | SceneEvent::ScenePressed { .. } => EventCategory::Interaction,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            SceneEvent::ObjectSelected {
                object: Some(id),
                selected,
            } => format!("Object {} selected: {}", id, selected),
            SceneEvent::ObjectSelected { object: None, .. } => "Selection cleared".to_string(),
            SceneEvent::ObjectsMoved { settled } => format!("Objects moved (settled: {})", settled),
            SceneEvent::ObjectsSelectedInRange => "Objects selected in range".to_string(),
            SceneEvent::LayersChanged => "Layers changed".to_string(),
            SceneEvent::ActiveLayersChanged => "Active layers changed".to_string(),
            SceneEvent::ObjectsMovedLayer => "Objects moved to default layer".to_string(),
            SceneEvent::ChildrenSelectionChanged => "Children selection changed".to_string(),
            SceneEvent::PopupMenuRequested { child } => match child {
                Some(c) => format!("Popup menu requested over {}[{}]", c.container, c.index),
                None => "Popup menu requested".to_string(),
            },
            SceneEvent::ObjectDoubleClicked { object } => match object {
                Some(id) => format!("Object {} double clicked", id),
                None => "Canvas double clicked".to_string(),
            },
            SceneEvent::ScenePressed { button } => format!("Scene pressed ({:?})", button),
            SceneEvent::ObjectModified { object } => format!("Object {} modified", object),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Selection changes.
    Selection,
    /// Object moves and geometry changes.
    Movement,
    /// Layer registry changes.
    Layers,
    /// Pointer interaction requests (menus, double clicks, presses).
    Interaction,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Movement => write!(f, "Movement"),
            EventCategory::Layers => write!(f, "Layers"),
            EventCategory::Interaction => write!(f, "Interaction"),
        }
    }
}
