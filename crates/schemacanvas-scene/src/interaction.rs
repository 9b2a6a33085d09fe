//! Interaction state machine types.
//!
//! ```text
//! Idle --press (range trigger, empty selection)--> RangeSelecting --release--> Idle
//! Idle --first drag delta / arrow key with a selection--> Moving --release / settle--> Idle
//! ```

use schemacanvas_core::{ObjectId, Point, Rect};

/// Keyboard modifiers held during an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
    };
    pub const CONTROL: Modifiers = Modifiers {
        shift: false,
        control: true,
    };
    pub const CONTROL_SHIFT: Modifiers = Modifiers {
        shift: true,
        control: true,
    };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Arrow keys that nudge the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

impl ArrowKey {
    /// One-unit step in canvas coordinates.
    pub fn unit_delta(self) -> (f64, f64) {
        match self {
            ArrowKey::Up => (0.0, -1.0),
            ArrowKey::Down => (0.0, 1.0),
            ArrowKey::Left => (-1.0, 0.0),
            ArrowKey::Right => (1.0, 0.0),
        }
    }

    /// Step multiplier: x10 with Control, x100 with Control+Shift.
    pub fn step_factor(modifiers: Modifiers) -> f64 {
        if modifiers == Modifiers::CONTROL {
            10.0
        } else if modifiers == Modifiers::CONTROL_SHIFT {
            100.0
        } else {
            1.0
        }
    }
}

/// What drives a move gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Pointer,
    Keyboard,
}

/// One continuous or discrete move gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveSession {
    /// Press point for drags, selection center for keystrokes.
    pub anchor: Point,
    pub source: MoveSource,
    /// Positions of the dragged objects when the gesture started.
    pub origins: Vec<(ObjectId, Point)>,
}

impl MoveSession {
    pub fn pointer(anchor: Point, origins: Vec<(ObjectId, Point)>) -> Self {
        Self {
            anchor,
            source: MoveSource::Pointer,
            origins,
        }
    }

    pub fn keyboard(anchor: Point) -> Self {
        Self {
            anchor,
            source: MoveSource::Keyboard,
            origins: Vec::new(),
        }
    }
}

/// Current gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Rubber-band selection from `anchor` to the live pointer position.
    RangeSelecting { anchor: Point, current: Point },
    Moving(MoveSession),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, InteractionState::Moving(_))
    }

    pub fn is_range_selecting(&self) -> bool {
        matches!(self, InteractionState::RangeSelecting { .. })
    }

    /// Anchor of the active gesture, NaN when idle.
    pub fn anchor(&self) -> Point {
        match self {
            InteractionState::Idle => Point::NAN,
            InteractionState::RangeSelecting { anchor, .. } => *anchor,
            InteractionState::Moving(session) => session.anchor,
        }
    }

    /// Normalized rubber-band rectangle while range selecting.
    pub fn rubber_band(&self) -> Option<Rect> {
        match self {
            InteractionState::RangeSelecting { anchor, current } => {
                Some(Rect::from_corners(*anchor, *current))
            }
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&MoveSession> {
        match self {
            InteractionState::Moving(session) => Some(session),
            _ => None,
        }
    }
}

/// Edge auto-scroll progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeScrollState {
    #[default]
    Off,
    /// The pointer rests near an edge; scrolling starts once the hover
    /// delay elapses.
    HoverPending,
    Scrolling,
}

/// Preview line shown while the user draws a relationship.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationshipLine {
    pub start: Point,
    pub end: Point,
}
