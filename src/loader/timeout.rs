//! Load deadline guard
//!
//! Armed when a load begins, disarmed only by a successful completion signal.
//! Once fired it latches: the strategy consults `fired()` to suppress any
//! completion signal that arrives after the deadline already passed.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct TimeoutGuard {
    deadline: Option<Instant>,
    fired: bool,
}

impl TimeoutGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the guard `timeout` from now. Re-arming after the latch fired is
    /// ignored; the attempt is already terminal.
    pub fn arm(&mut self, timeout: Duration) {
        if !self.fired {
            self.deadline = Some(Instant::now() + timeout);
        }
    }

    /// Cancel the deadline. Called on successful completion only.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Check the deadline; returns true exactly once, on the first poll after
    /// it passed.
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                self.fired = true;
                true
            }
            _ => false,
        }
    }

    /// Whether the deadline ever fired for this attempt.
    #[must_use]
    pub fn fired(&self) -> bool {
        self.fired
    }

    #[must_use]
    pub fn armed(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_guard_never_fires() {
        let mut guard = TimeoutGuard::new();
        assert!(!guard.poll());
        assert!(!guard.fired());
    }

    #[test]
    fn fires_exactly_once_after_deadline() {
        let mut guard = TimeoutGuard::new();
        guard.arm(Duration::ZERO);
        assert!(guard.poll());
        assert!(guard.fired());
        assert!(!guard.poll());
        assert!(guard.fired());
    }

    #[test]
    fn disarm_before_deadline_suppresses_firing() {
        let mut guard = TimeoutGuard::new();
        guard.arm(Duration::from_secs(3600));
        guard.disarm();
        assert!(!guard.poll());
        assert!(!guard.fired());
    }

    #[test]
    fn latch_ignores_rearm_after_firing() {
        let mut guard = TimeoutGuard::new();
        guard.arm(Duration::ZERO);
        assert!(guard.poll());

        guard.arm(Duration::ZERO);
        assert!(!guard.armed());
        assert!(!guard.poll());
    }
}
