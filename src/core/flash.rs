use std::time::Duration;

use tracing::trace;

use crate::core::{random::RandomSource, timer::OneShot};

/// Probabilistic full-screen flash. The draw cadence lives with the owner;
/// this holds the flag and its reset timer.
#[derive(Debug)]
pub struct FlashScheduler {
    active: bool,
    threshold: f64,
    hold: Duration,
    reset: OneShot,
}

impl FlashScheduler {
    pub fn new(threshold: f64, hold: Duration) -> Self {
        Self {
            active: false,
            threshold,
            hold,
            reset: OneShot::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reset_due_in(&self) -> Option<Duration> {
        self.reset.due_in()
    }

    /// One draw per cadence tick. Returns true if this draw triggered a flash.
    pub fn on_interval(&mut self, source: &mut dyn RandomSource) -> bool {
        let roll = source.unit();
        if roll > self.threshold {
            trace!(roll, "flash triggered");
            self.active = true;
            self.reset.arm(self.hold);
            true
        } else {
            false
        }
    }

    pub fn elapse(&mut self, dt: Duration) {
        self.reset.elapse(dt);
    }

    /// Clears the flag if the reset timer has expired.
    pub fn take_reset(&mut self) -> bool {
        if self.reset.take_due() {
            self.active = false;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.reset.cancel();
        self.active = false;
    }
}
