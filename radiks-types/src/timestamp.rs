//! Millisecond wall-clock timestamps for record mutation tracking.
//!
//! Persisted documents carry `updatedAt` as an integer number of
//! milliseconds since the Unix epoch. The signed message embeds the same
//! integer, so `Display` must print exactly that number.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

fn wall_clock_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp at the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self(wall_clock_millis())
    }

    /// Creates a timestamp from raw milliseconds.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Creates a timestamp from raw milliseconds, rejecting pre-epoch values.
    pub fn try_from_millis(millis: i64) -> Result<Self, Error> {
        if millis < 0 {
            return Err(Error::InvalidTimestamp(format!(
                "{millis} is before the Unix epoch"
            )));
        }
        Ok(Self(millis))
    }

    /// Returns the raw millisecond value.
    #[must_use]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Returns the next timestamp for a mutation that follows this one.
    ///
    /// The result is the current wall time, or `self + 1` when the clock has
    /// not moved past `self`, so successive saves never reuse a timestamp.
    #[must_use]
    pub fn advance(&self) -> Self {
        Self(wall_clock_millis().max(self.0.saturating_add(1)))
    }

    /// Advances from an optional previous timestamp.
    #[must_use]
    pub fn next_after(previous: Option<Timestamp>) -> Self {
        match previous {
            Some(prev) => prev.advance(),
            None => Self::now(),
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
