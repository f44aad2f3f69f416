//! Client-side login throttling.
//!
//! The backend rate-limits on its own; this tracker exists so the client
//! stops hammering it (and gives the user a countdown) after repeated
//! failures. Time is passed in by the caller so the logic stays clockless
//! and testable.

use std::time::{Duration, Instant};

/// Consecutive failures before the first lock engages.
const LOCK_AFTER_FAILS: u32 = 5;
/// Consecutive failures at which the lock extends.
const EXTEND_AFTER_FAILS: u32 = 7;
/// First lock duration.
const LOCK_SHORT: Duration = Duration::from_secs(30);
/// Extended lock, also applied on a backend rate-limit response.
const LOCK_LONG: Duration = Duration::from_secs(60);

/// Tracks consecutive login failures and the resulting cooldown.
#[derive(Debug, Default)]
pub struct LoginLockout {
    fails: u32,
    locked_until: Option<Instant>,
}

impl LoginLockout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of consecutive failures so far.
    pub fn fails(&self) -> u32 {
        self.fails
    }

    /// Whether submission is currently disabled.
    pub fn is_locked(&self, now: Instant) -> bool {
        matches!(self.locked_until, Some(until) if now < until)
    }

    /// Remaining cooldown, zero when unlocked.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.locked_until {
            Some(until) if now < until => until - now,
            _ => Duration::ZERO,
        }
    }

    /// Record a failed attempt. `rate_limited` marks a backend 429 /
    /// `RATE_LIMIT` response, which locks immediately for the long duration.
    pub fn record_failure(&mut self, now: Instant, rate_limited: bool) {
        self.fails += 1;

        if rate_limited {
            self.locked_until = Some(now + LOCK_LONG);
            return;
        }

        if self.fails >= LOCK_AFTER_FAILS {
            let lock = if self.fails >= EXTEND_AFTER_FAILS {
                LOCK_LONG
            } else {
                LOCK_SHORT
            };
            self.locked_until = Some(now + lock);
        }
    }

    /// Record a successful login, clearing the counter and any lock.
    pub fn record_success(&mut self) {
        self.fails = 0;
        self.locked_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locks_after_five_failures_for_thirty_seconds() {
        let mut lockout = LoginLockout::new();
        let t0 = Instant::now();

        for _ in 0..4 {
            lockout.record_failure(t0, false);
            assert!(!lockout.is_locked(t0));
        }

        lockout.record_failure(t0, false);
        assert!(lockout.is_locked(t0));
        assert_eq!(lockout.remaining(t0), Duration::from_secs(30));
        assert!(!lockout.is_locked(t0 + Duration::from_secs(31)));
    }

    #[test]
    fn seventh_failure_extends_to_a_minute() {
        let mut lockout = LoginLockout::new();
        let t0 = Instant::now();

        for _ in 0..7 {
            lockout.record_failure(t0, false);
        }

        assert_eq!(lockout.fails(), 7);
        assert_eq!(lockout.remaining(t0), Duration::from_secs(60));
    }

    #[test]
    fn backend_rate_limit_locks_immediately() {
        let mut lockout = LoginLockout::new();
        let t0 = Instant::now();

        lockout.record_failure(t0, true);
        assert!(lockout.is_locked(t0));
        assert_eq!(lockout.remaining(t0), Duration::from_secs(60));
    }

    #[test]
    fn success_resets_everything() {
        let mut lockout = LoginLockout::new();
        let t0 = Instant::now();

        for _ in 0..6 {
            lockout.record_failure(t0, false);
        }
        assert!(lockout.is_locked(t0));

        lockout.record_success();
        assert!(!lockout.is_locked(t0));
        assert_eq!(lockout.fails(), 0);
    }
}
