#![forbid(unsafe_code)]

//! Auto-advance timer bookkeeping.
//!
//! The coordinator mints a [`TimerToken`] each time it arms the timer and
//! hands it to the host scheduler. Only the armed token is honored when the
//! host reports a fire, which keeps at most one logical timer alive.

use core::fmt;
use core::time::Duration;

/// Identity of one scheduled auto-advance fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Wrap a raw token value (host round-trips use this).
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw token value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Timer-driven advance state.
#[derive(Debug, Clone)]
pub struct AutoAdvance {
    enabled: bool,
    delay: Duration,
    armed: Option<TimerToken>,
    manual_override: bool,
    next_token: u64,
}

impl AutoAdvance {
    /// Create the state. Nothing is armed yet.
    #[must_use]
    pub const fn new(enabled: bool, delay: Duration) -> Self {
        Self {
            enabled,
            delay,
            armed: None,
            manual_override: false,
            next_token: 1,
        }
    }

    /// Auto-advance was requested at construction.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Interval between advances.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether re-arming is still allowed.
    #[must_use]
    pub const fn should_rearm(&self) -> bool {
        self.enabled && !self.manual_override
    }

    /// A manual gesture or click has occurred.
    #[must_use]
    pub const fn manual_override(&self) -> bool {
        self.manual_override
    }

    /// Permanently suppress re-arming.
    pub fn set_manual_override(&mut self) {
        self.manual_override = true;
    }

    /// Currently armed token, if any.
    #[must_use]
    pub const fn armed(&self) -> Option<TimerToken> {
        self.armed
    }

    /// Mint and arm a fresh token.
    ///
    /// Returns the token to schedule and any previously armed token that the
    /// caller must cancel.
    pub fn arm(&mut self) -> (TimerToken, Option<TimerToken>) {
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        (token, self.armed.replace(token))
    }

    /// Disarm, returning the token that was armed.
    pub fn take_armed(&mut self) -> Option<TimerToken> {
        self.armed.take()
    }

    /// Consume `token` if it is the armed one.
    pub fn claim(&mut self, token: TimerToken) -> bool {
        if self.armed == Some(token) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_replaces_previous_token() {
        let mut a = AutoAdvance::new(true, Duration::from_secs(5));
        let (first, prev) = a.arm();
        assert_eq!(prev, None);
        let (second, prev) = a.arm();
        assert_eq!(prev, Some(first));
        assert_ne!(first, second);
        assert_eq!(a.armed(), Some(second));
    }

    #[test]
    fn claim_only_accepts_armed_token() {
        let mut a = AutoAdvance::new(true, Duration::from_secs(5));
        let (first, _) = a.arm();
        let (second, _) = a.arm();
        assert!(!a.claim(first));
        assert!(a.claim(second));
        assert!(!a.claim(second));
        assert_eq!(a.armed(), None);
    }

    #[test]
    fn manual_override_blocks_rearm() {
        let mut a = AutoAdvance::new(true, Duration::from_secs(5));
        assert!(a.should_rearm());
        a.set_manual_override();
        assert!(!a.should_rearm());
    }

    #[test]
    fn disabled_never_rearms() {
        let a = AutoAdvance::new(false, Duration::from_secs(5));
        assert!(!a.should_rearm());
    }
}
