//! Tick-counted timers. Nothing here reads a wall clock.

/// A single pending deadline. Scheduling while one is pending replaces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<u64>,
}

impl Deadline {
    pub fn new() -> Self {
        Self { at: None }
    }

    /// (Re)schedule to fire `after` ticks from `now`.
    pub fn schedule(&mut self, now: u64, after: u64) {
        self.at = Some(now.saturating_add(after));
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.at.is_some()
    }

    pub fn due_at(&self) -> Option<u64> {
        self.at
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn fire(&mut self, now: u64) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }
}

/// Lets at most one event through per `interval` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    interval: u64,
    next_allowed: Option<u64>,
}

impl Throttle {
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            next_allowed: None,
        }
    }

    /// True if an event at `now` may pass; arms the throttle when it does.
    pub fn ready(&mut self, now: u64) -> bool {
        if self.next_allowed.is_some_and(|next| now < next) {
            return false;
        }
        self.next_allowed = Some(now.saturating_add(self.interval.max(1)));
        true
    }

    pub fn reset(&mut self) {
        self.next_allowed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_fires_once() {
        let mut d = Deadline::new();
        d.schedule(10, 5);
        assert!(!d.fire(14));
        assert!(d.fire(15));
        assert!(!d.fire(16));
        assert!(!d.is_pending());
    }

    #[test]
    fn rescheduling_replaces_pending_deadline() {
        let mut d = Deadline::new();
        d.schedule(0, 5);
        d.schedule(3, 5);
        assert_eq!(d.due_at(), Some(8));
        assert!(!d.fire(5));
        assert!(d.fire(8));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut d = Deadline::new();
        d.cancel();
        d.schedule(0, 1);
        d.cancel();
        d.cancel();
        assert!(!d.fire(100));
    }

    #[test]
    fn throttle_spaces_events() {
        let mut t = Throttle::new(10);
        assert!(t.ready(0));
        assert!(!t.ready(5));
        assert!(t.ready(10));
        assert!(!t.ready(19));
        t.reset();
        assert!(t.ready(19));
    }
}
