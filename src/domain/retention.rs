use chrono::{DateTime, TimeDelta, Utc};

use super::Record;

/// How long records are kept before they become eligible for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionWindow {
    days: u32,
}

impl RetentionWindow {
    pub const DEFAULT_DAYS: u32 = 30;

    pub fn from_days(days: u32) -> Self {
        Self { days }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn as_time_delta(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.days) * 24)
    }

    /// True iff the age at `now` strictly exceeds the window.
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - created_at > self.as_time_delta()
    }

    pub fn evaluate(&self, record: &Record, now: DateTime<Utc>) -> Verdict {
        match record.created_at() {
            Ok(created_at) if self.is_expired(created_at, now) => Verdict::Expired,
            Ok(_) => Verdict::Retained,
            Err(e) => Verdict::Unparseable(e),
        }
    }
}

impl Default for RetentionWindow {
    fn default() -> Self {
        Self::from_days(Self::DEFAULT_DAYS)
    }
}

/// Outcome of checking one record against a retention window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Expired,
    Retained,
    /// `createdAt` is not RFC 3339. Such records are kept.
    Unparseable(chrono::ParseError),
}

pub fn should_delete(record: &Record, window: RetentionWindow, now: DateTime<Utc>) -> bool {
    matches!(window.evaluate(record, now), Verdict::Expired)
}
