// SPDX-License-Identifier: MPL-2.0
//! Overlay timeout domain type for the controls overlay.
//!
//! This module provides a type-safe wrapper for the controls auto-hide
//! timeout in milliseconds.

use crate::config::{
    DEFAULT_OVERLAY_TIMEOUT_MS, MAX_OVERLAY_TIMEOUT_MS, MIN_OVERLAY_TIMEOUT_MS,
};
use std::time::Duration;

/// Inactivity delay before the controls overlay hides.
///
/// Always within `MIN_OVERLAY_TIMEOUT_MS..=MAX_OVERLAY_TIMEOUT_MS`.
///
/// # Example
///
/// ```
/// use iced_player::ui::state::OverlayTimeout;
///
/// let timeout = OverlayTimeout::new(2_000);
/// assert_eq!(timeout.value(), 2_000);
///
/// // Values outside range are clamped
/// let too_short = OverlayTimeout::new(10);
/// assert_eq!(too_short.value(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTimeout(u64);

impl OverlayTimeout {
    /// Creates a new overlay timeout, clamping to valid range.
    #[must_use]
    pub fn new(millis: u64) -> Self {
        Self(millis.clamp(MIN_OVERLAY_TIMEOUT_MS, MAX_OVERLAY_TIMEOUT_MS))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for OverlayTimeout {
    fn default() -> Self {
        Self(DEFAULT_OVERLAY_TIMEOUT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_to_valid_range() {
        assert_eq!(OverlayTimeout::new(0).value(), MIN_OVERLAY_TIMEOUT_MS);
        assert_eq!(OverlayTimeout::new(u64::MAX).value(), MAX_OVERLAY_TIMEOUT_MS);
    }

    #[test]
    fn default_is_one_second() {
        assert_eq!(OverlayTimeout::default().as_duration(), Duration::from_secs(1));
    }
}
