//! Half-open time intervals.
//!
//! All programme timing is compared as `[start, end)`: an interval that ends
//! at 10:00 does not touch one that starts at 10:00.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A `[start, end)` span of instants.
///
/// `end > start` is not enforced; callers that build intervals from server
/// data get whatever the server stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `[a0,a1)` and `[b0,b1)` overlap iff `b0 < a1 && a0 < b1`.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        other.start < self.end && self.start < other.end
    }

    /// Returns whether `other` lies entirely inside this interval.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
