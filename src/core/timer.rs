use std::time::Duration;

/// Repeating timer on a virtual clock. First fire is one full period after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    due_in: Duration,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        debug_assert!(!period.is_zero(), "zero-period interval would never advance");
        Self {
            period,
            due_in: period,
        }
    }

    pub fn due_in(&self) -> Duration {
        self.due_in
    }

    pub fn elapse(&mut self, dt: Duration) {
        self.due_in = self.due_in.saturating_sub(dt);
    }

    /// Fires if due, re-arming for the next period.
    pub fn take_due(&mut self) -> bool {
        if self.due_in.is_zero() {
            self.due_in = self.period;
            true
        } else {
            false
        }
    }
}

/// Single-fire timer. Re-arming replaces any pending deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OneShot {
    due_in: Option<Duration>,
}

impl OneShot {
    pub fn arm(&mut self, delay: Duration) {
        self.due_in = Some(delay);
    }

    pub fn cancel(&mut self) {
        self.due_in = None;
    }

    pub fn due_in(&self) -> Option<Duration> {
        self.due_in
    }

    pub fn elapse(&mut self, dt: Duration) {
        if let Some(due) = self.due_in.as_mut() {
            *due = due.saturating_sub(dt);
        }
    }

    pub fn take_due(&mut self) -> bool {
        if self.due_in == Some(Duration::ZERO) {
            self.due_in = None;
            true
        } else {
            false
        }
    }
}
