// SPDX-License-Identifier: MPL-2.0
//! Rewind/fast-forward step domain type.

use crate::config::{DEFAULT_SEEK_STEP_SECS, MAX_SEEK_STEP_SECS, MIN_SEEK_STEP_SECS};

/// Seek step in seconds used by the Left/Right shortcuts and the
/// rewind/fast-forward buttons.
///
/// Always within `MIN_SEEK_STEP_SECS..=MAX_SEEK_STEP_SECS`.
///
/// # Example
///
/// ```
/// use iced_player::video_player::SeekStep;
///
/// assert_eq!(SeekStep::default().value(), 10.0);
/// assert_eq!(SeekStep::new(500.0).value(), 60.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekStep(f64);

impl SeekStep {
    /// Creates a new seek step, clamping to valid range.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(MIN_SEEK_STEP_SECS, MAX_SEEK_STEP_SECS))
    }

    /// Returns the value in seconds.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Offset for a backward step.
    #[must_use]
    pub fn backward(self) -> f64 {
        -self.0
    }

    /// Offset for a forward step.
    #[must_use]
    pub fn forward(self) -> f64 {
        self.0
    }
}

impl Default for SeekStep {
    fn default() -> Self {
        Self(DEFAULT_SEEK_STEP_SECS)
    }
}
