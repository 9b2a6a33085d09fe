//! Deadline-based timers driven by the host.
//!
//! The scene never spawns threads or tasks. The host calls
//! [`DiagramScene::process_timers`](crate::DiagramScene::process_timers)
//! from its event loop (or after advancing a [`ManualClock`] in tests) and
//! every timer whose deadline has passed fires once.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Timers owned by one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Scrolls the active view while the pointer stays near an edge.
    AutoScrollTick,
    /// Confirms that the pointer rests near an edge before scrolling starts.
    CornerHover,
    /// Finalizes a keyboard move once arrow keys have been released.
    MoveSettle,
}

impl TimerKind {
    const ALL: [TimerKind; 3] = [
        TimerKind::AutoScrollTick,
        TimerKind::CornerHover,
        TimerKind::MoveSettle,
    ];

    fn slot(self) -> usize {
        match self {
            TimerKind::AutoScrollTick => 0,
            TimerKind::CornerHover => 1,
            TimerKind::MoveSettle => 2,
        }
    }
}

/// Time source for the scheduler.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    interval: Duration,
    deadline: Option<Instant>,
}

/// Repeating single-shot-style timers with explicit deadlines.
///
/// Starting an active timer restarts it. A fired timer rearms itself one
/// interval later until stopped.
#[derive(Debug)]
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    slots: [Slot; 3],
}

impl Scheduler {
    pub fn new(
        clock: Arc<dyn Clock>,
        scroll_interval: Duration,
        hover_delay: Duration,
        settle_delay: Duration,
    ) -> Self {
        let slot = |interval| Slot {
            interval,
            deadline: None,
        };
        Self {
            clock,
            slots: [slot(scroll_interval), slot(hover_delay), slot(settle_delay)],
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Starts or restarts a timer.
    ///
    /// Starting the auto-scroll tick stops a pending corner hover.
    pub fn start(&mut self, kind: TimerKind) {
        let now = self.clock.now();
        let slot = &mut self.slots[kind.slot()];
        slot.deadline = Some(now + slot.interval);

        if kind == TimerKind::AutoScrollTick {
            self.stop(TimerKind::CornerHover);
        }
    }

    pub fn stop(&mut self, kind: TimerKind) {
        self.slots[kind.slot()].deadline = None;
    }

    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.slots[kind.slot()].deadline.is_some()
    }

    pub fn interval(&self, kind: TimerKind) -> Duration {
        self.slots[kind.slot()].interval
    }

    /// Changes a timer's interval. An active timer keeps its deadline.
    pub fn set_interval(&mut self, kind: TimerKind, interval: Duration) {
        self.slots[kind.slot()].interval = interval;
    }

    /// Timers whose deadline has passed, each rearmed one interval later.
    pub fn due(&mut self) -> Vec<TimerKind> {
        let now = self.clock.now();
        let mut fired = Vec::new();
        for kind in TimerKind::ALL {
            let slot = &mut self.slots[kind.slot()];
            if slot.deadline.is_some_and(|d| d <= now) {
                slot.deadline = Some(now + slot.interval);
                fired.push(kind);
            }
        }
        fired
    }

    /// Earliest pending deadline, for hosts that sleep between polls.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.iter().filter_map(|s| s.deadline).min()
    }
}
