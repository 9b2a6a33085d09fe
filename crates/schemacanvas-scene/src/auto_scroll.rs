//! Edge auto-scroll while dragging.
//!
//! Keeping the pointer near a viewport edge during a drag arms a hover
//! timer. When it fires, a repeating tick scrolls the active view by a
//! fixed step until the pointer leaves the edge band.

use crate::interaction::EdgeScrollState;
use crate::scheduler::{Scheduler, TimerKind};
use crate::view::HostView;
use schemacanvas_core::{Point, Rect};
use schemacanvas_settings::InteractionSettings;

#[derive(Debug, Clone)]
pub struct AutoScrollController {
    state: EdgeScrollState,
    step: f64,
    threshold: f64,
    dx: f64,
    dy: f64,
}

impl AutoScrollController {
    pub fn new(step: f64, threshold: f64) -> Self {
        Self {
            state: EdgeScrollState::Off,
            step,
            threshold,
            dx: 0.0,
            dy: 0.0,
        }
    }

    pub fn from_settings(settings: &InteractionSettings) -> Self {
        Self::new(settings.scroll_step, settings.scroll_threshold)
    }

    pub fn state(&self) -> EdgeScrollState {
        self.state
    }

    pub fn is_scrolling(&self) -> bool {
        self.state == EdgeScrollState::Scrolling
    }

    /// Last computed scroll direction.
    pub fn delta(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    pub fn set_step(&mut self, step: f64, threshold: f64) {
        self.step = step;
        self.threshold = threshold;
    }

    /// Whether the pointer lies in an edge band of `view`.
    ///
    /// Updates the scroll direction as a side effect. A pointer outside the
    /// view leaves the previous direction untouched and reports false.
    pub fn at_corner(&mut self, view: &dyn HostView) -> bool {
        let Some(pos) = view.cursor_position() else {
            return false;
        };
        let size = view.size();
        if !Rect::from_origin_size(Point::default(), size).contains(&pos) {
            return false;
        }

        let bars = view.scrollbar_extent();
        self.dx = if pos.x <= self.threshold {
            -self.step
        } else if pos.x >= size.width - bars.width - self.threshold {
            self.step
        } else {
            0.0
        };
        self.dy = if pos.y <= self.threshold {
            -self.step
        } else if pos.y >= size.height - bars.height - self.threshold {
            self.step
        } else {
            0.0
        };

        self.dx != 0.0 || self.dy != 0.0
    }

    /// Pointer drag notification.
    pub fn on_drag(&mut self, view: Option<&dyn HostView>, scheduler: &mut Scheduler) {
        let at_corner = view.is_some_and(|v| self.at_corner(v));
        if !at_corner {
            self.enable(false, scheduler);
            return;
        }

        if self.is_scrolling() {
            scheduler.start(TimerKind::AutoScrollTick);
        } else {
            scheduler.start(TimerKind::CornerHover);
            self.state = EdgeScrollState::HoverPending;
        }
    }

    /// Starts or stops the repeating scroll tick.
    pub fn enable(&mut self, enable: bool, scheduler: &mut Scheduler) {
        if enable {
            scheduler.start(TimerKind::AutoScrollTick);
        } else {
            scheduler.stop(TimerKind::CornerHover);
            scheduler.stop(TimerKind::AutoScrollTick);
            self.state = EdgeScrollState::Off;
        }
    }

    /// One scroll tick. Returns true if the view was scrolled.
    pub fn tick(&mut self, view: Option<&mut dyn HostView>, scheduler: &mut Scheduler) -> bool {
        if self.dx == 0.0 && self.dy == 0.0 {
            return false;
        }

        if let Some(view) = view {
            if view.is_active() && self.at_corner(&*view) {
                view.scroll_by(self.dx, self.dy);
                self.state = EdgeScrollState::Scrolling;
                return true;
            }
        }

        self.state = EdgeScrollState::Off;
        scheduler.stop(TimerKind::AutoScrollTick);
        false
    }
}

impl Default for AutoScrollController {
    fn default() -> Self {
        Self::from_settings(&InteractionSettings::default())
    }
}
