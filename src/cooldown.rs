//! Per-user submission rate limit: one submission per fixed window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Fixed cooldown window between submissions.
pub const COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// Maps a user to the instant of their last successful submission. A user with
/// no record has never submitted and is always allowed. No eviction; records
/// live for the process lifetime.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_submission: HashMap<i64, Instant>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when the user may submit now, or `Some(remaining)` with
    /// the wait left in the window. Side-effect-free.
    pub fn check(&self, user_id: i64) -> Option<Duration> {
        self.check_at(user_id, Instant::now())
    }

    /// Stamps the user's last submission. Called exactly once per accepted
    /// submission, never on attempts refused by `check`.
    pub fn record(&mut self, user_id: i64) {
        self.record_at(user_id, Instant::now());
    }

    /// `check` against an explicit clock reading.
    pub fn check_at(&self, user_id: i64, now: Instant) -> Option<Duration> {
        let last = self.last_submission.get(&user_id)?;
        let passed = now.saturating_duration_since(*last);
        if passed < COOLDOWN {
            Some(COOLDOWN - passed)
        } else {
            None
        }
    }

    /// `record` against an explicit clock reading.
    pub fn record_at(&mut self, user_id: i64, now: Instant) {
        self.last_submission.insert(user_id, now);
    }
}

/// Renders a remaining wait as `MM:SS`, truncated to whole seconds.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
