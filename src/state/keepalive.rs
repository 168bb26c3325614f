//! Idle tracking for caller-driven keepalive.

use std::time::{Duration, Instant};

/// What a keepalive tick asks of the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeepAliveAction {
    /// Traffic is recent enough.
    Idle,
    /// Send a `PING`; the link has been quiet past the threshold.
    SendPing,
    /// A previous `PING` went unanswered. Close the link.
    TimedOut,
}

/// Tracks time since the last inbound line.
#[derive(Clone, Debug)]
pub struct KeepAlive {
    idle_threshold: Duration,
    last_activity: Instant,
    ping_outstanding: bool,
}

impl KeepAlive {
    pub fn new(idle_threshold: Duration, now: Instant) -> Self {
        Self {
            idle_threshold,
            last_activity: now,
            ping_outstanding: false,
        }
    }

    /// Record an inbound line.
    pub fn touch(&mut self, now: Instant) {
        self.last_activity = now;
        self.ping_outstanding = false;
    }

    pub fn ping_outstanding(&self) -> bool {
        self.ping_outstanding
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    /// One keepalive tick.
    pub fn check(&mut self, now: Instant) -> KeepAliveAction {
        if self.ping_outstanding {
            KeepAliveAction::TimedOut
        } else if self.idle_for(now) >= self.idle_threshold {
            self.ping_outstanding = true;
            KeepAliveAction::SendPing
        } else {
            KeepAliveAction::Idle
        }
    }
}
