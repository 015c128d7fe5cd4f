// SPDX-License-Identifier: MPL-2.0
//! Position sync interval domain type.

use crate::config::{DEFAULT_SYNC_INTERVAL_MS, MAX_SYNC_INTERVAL_MS, MIN_SYNC_INTERVAL_MS};
use std::time::Duration;

/// Period of the position sync loop in milliseconds.
///
/// # Example
///
/// ```
/// use iced_player::video_player::SyncInterval;
///
/// let interval = SyncInterval::new(10);
/// assert_eq!(interval.value(), 50); // Clamped to min
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyncInterval(u64);

impl SyncInterval {
    /// Creates a new sync interval, clamping to valid range.
    #[must_use]
    pub fn new(millis: u64) -> Self {
        Self(millis.clamp(MIN_SYNC_INTERVAL_MS, MAX_SYNC_INTERVAL_MS))
    }

    /// Returns the interval in milliseconds.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for SyncInterval {
    fn default() -> Self {
        Self(DEFAULT_SYNC_INTERVAL_MS)
    }
}
