//! Aggregate bounding boxes over placed objects.

use crate::object::SpatialObject;
use schemacanvas_core::Rect;

/// Layer-decoration parameters that widen object footprints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationMetrics {
    /// Padding between an object and each outline around it.
    pub padding: f64,
    /// Height of a layer name label.
    pub label_height: f64,
    /// Whether layer outlines are drawn.
    pub rects_visible: bool,
    /// Whether layer names are drawn on the outlines.
    pub names_visible: bool,
}

impl DecorationMetrics {
    /// Space taken above an object by one outline.
    pub fn top_margin(&self) -> f64 {
        if self.names_visible {
            self.label_height
        } else {
            self.padding
        }
    }
}

/// Computes the smallest rectangle enclosing the effective footprints of a
/// set of objects.
#[derive(Debug, Clone, Copy)]
pub struct BoundingRectCalculator {
    metrics: DecorationMetrics,
}

impl BoundingRectCalculator {
    pub fn new(metrics: DecorationMetrics) -> Self {
        Self { metrics }
    }

    /// Footprint of one object.
    ///
    /// With `include_decoration` (and outlines shown), non-schema,
    /// non-relationship objects grow by one padding per layer they belong
    /// to so that every nested outline fits.
    pub fn footprint(&self, object: &SpatialObject, include_decoration: bool) -> Rect {
        let kind = object.kind();
        if kind.is_relationship() {
            return object.scene_rect();
        }

        let rect = object.scene_rect();
        if include_decoration && self.metrics.rects_visible && !kind.is_schema() {
            let n = object.layer_count() as f64;
            let pad = self.metrics.padding * n;
            rect.adjusted(-pad, -self.metrics.top_margin() * n, pad, pad)
        } else {
            rect
        }
    }

    /// Bounding rectangle of the visible objects in `objects`.
    ///
    /// Returns a zero rectangle at the origin when nothing is visible;
    /// callers must not assume a non-degenerate result.
    pub fn compute<'a, I>(&self, objects: I, include_decoration: bool) -> Rect
    where
        I: IntoIterator<Item = &'a SpatialObject>,
    {
        let corners = objects
            .into_iter()
            .filter(|o| o.is_visible())
            .map(|o| self.footprint(o, include_decoration))
            .flat_map(|r| [r.top_left(), r.bottom_right()]);

        Rect::bounding(corners).unwrap_or_default()
    }
}
