// SPDX-License-Identifier: MPL-2.0
//! Auto-hide state machine for the controls overlay.
//!
//! The overlay appears on pointer activity over the media surface and hides
//! again after a period of inactivity. While the pointer rests on the overlay
//! itself the countdown is suspended.

use super::overlay_timeout::OverlayTimeout;
use std::time::Instant;

/// Visibility of the controls overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    /// Visible until `deadline` unless more activity arrives.
    VisibleActive { deadline: Instant },
    /// Pointer is over the overlay; no countdown runs.
    VisibleHovered,
}

#[derive(Debug, Clone, Default)]
pub struct ControlsVisibility {
    state: VisibilityState,
    timeout: OverlayTimeout,
}

impl ControlsVisibility {
    pub fn new(timeout: OverlayTimeout) -> Self {
        Self {
            state: VisibilityState::Hidden,
            timeout,
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn timeout(&self) -> OverlayTimeout {
        self.timeout
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.state, VisibilityState::Hidden)
    }

    /// Whether a countdown is pending, i.e. the check timer must run.
    pub fn is_counting_down(&self) -> bool {
        matches!(self.state, VisibilityState::VisibleActive { .. })
    }

    /// Pointer activity over the media surface.
    pub fn pointer_moved(&mut self, now: Instant) {
        match self.state {
            VisibilityState::Hidden | VisibilityState::VisibleActive { .. } => self.restart(now),
            VisibilityState::VisibleHovered => {}
        }
    }

    pub fn overlay_entered(&mut self) {
        self.state = VisibilityState::VisibleHovered;
    }

    pub fn overlay_left(&mut self, now: Instant) {
        if self.state == VisibilityState::VisibleHovered {
            self.restart(now);
        }
    }

    /// Shows the overlay with a fresh countdown, whatever the current state.
    ///
    /// Used when a new source is opened.
    pub fn force_active(&mut self, now: Instant) {
        self.restart(now);
    }

    /// Hides the overlay if the countdown has elapsed at `now`.
    ///
    /// Returns true when the overlay was hidden by this call.
    pub fn check(&mut self, now: Instant) -> bool {
        match self.state {
            VisibilityState::VisibleActive { deadline } if now >= deadline => {
                self.state = VisibilityState::Hidden;
                true
            }
            _ => false,
        }
    }

    fn restart(&mut self, now: Instant) {
        self.state = VisibilityState::VisibleActive {
            deadline: now + self.timeout.as_duration(),
        };
    }
}
