//! Grid snapping.

use schemacanvas_core::constants::MIN_GRID_SIZE;
use schemacanvas_core::{Point, Rect};

/// Maps points to the nearest grid intersection.
///
/// Snapped coordinates are never negative: the canvas starts at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSnapper {
    size: u32,
}

impl GridSnapper {
    /// Creates a snapper, raising `size` to the minimum grid size if needed.
    pub fn new(size: u32) -> Self {
        Self {
            size: size.max(MIN_GRID_SIZE),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn snap_point(&self, p: Point) -> Point {
        Point::new(self.snap_coord(p.x), self.snap_coord(p.y))
    }

    /// Snaps the top-left corner, keeping the size.
    pub fn snap_rect(&self, rect: Rect) -> Rect {
        rect.moved_to(self.snap_point(rect.top_left()))
    }

    fn snap_coord(&self, v: f64) -> f64 {
        if !v.is_finite() {
            return 0.0;
        }
        let size = f64::from(self.size);
        ((v / size).round() * size).max(0.0)
    }
}

impl Default for GridSnapper {
    fn default() -> Self {
        Self::new(schemacanvas_core::constants::DEFAULT_GRID_SIZE)
    }
}
