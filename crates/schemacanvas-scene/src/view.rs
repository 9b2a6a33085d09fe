//! Host viewport abstraction.
//!
//! The scene never draws. Hosts register one [`HostView`] per viewport
//! showing the diagram; the scene reads geometry from it for edge
//! auto-scroll and keyboard follow-scrolling, and writes back scroll
//! positions.

use schemacanvas_core::{Point, Rect, Size};
use std::fmt;

/// A viewport onto the scene, implemented by the host.
pub trait HostView: Send + fmt::Debug {
    /// Whether this view has focus.
    fn is_active(&self) -> bool;

    /// Viewport size in pixels, scrollbars included.
    fn size(&self) -> Size;

    /// Width of the vertical scrollbar and height of the horizontal one.
    fn scrollbar_extent(&self) -> Size;

    /// Pointer position in viewport coordinates, if known.
    fn cursor_position(&self) -> Option<Point>;

    /// Part of the scene currently shown, in canvas coordinates.
    fn visible_rect(&self) -> Rect;

    fn scroll_position(&self) -> Point;

    fn set_scroll_position(&mut self, position: Point);

    fn scroll_by(&mut self, dx: f64, dy: f64) {
        let pos = self.scroll_position();
        self.set_scroll_position(pos.translated(dx, dy));
    }
}

/// Handle returned when a view is attached to a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub(crate) usize);

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "View({})", self.0)
    }
}
