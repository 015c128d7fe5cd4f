// SPDX-License-Identifier: MPL-2.0
//! Seek slider ownership arbitration.
//!
//! The slider value has two writers: the user dragging or clicking it, and the
//! position sync loop projecting the engine position onto it. [`SeekState`]
//! records which writer currently owns the value so that neither path can
//! trigger the other.

use super::engine::MediaEngine;
use super::time_format::secs_to_duration;
use std::time::Duration;

/// Current owner of the seek slider value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekState {
    #[default]
    Idle,
    /// The user holds the slider. Engine to slider writes are suspended.
    UserSeeking,
    /// The sync loop is assigning the slider. Change notifications are ignored.
    ProgrammaticUpdate,
}

/// Slider model in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeekSlider {
    value: f64,
    maximum: f64,
}

impl SeekSlider {
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    fn set_maximum(&mut self, maximum: f64) {
        self.maximum = if maximum.is_finite() {
            maximum.max(0.0)
        } else {
            0.0
        };
        self.value = self.value.min(self.maximum);
    }

    /// Assigns the value, clamped to `[0, maximum]`.
    ///
    /// Returns the stored value if it changed.
    fn set_value(&mut self, value: f64) -> Option<f64> {
        let value = if value.is_finite() {
            value.clamp(0.0, self.maximum)
        } else {
            0.0
        };
        if (value - self.value).abs() > f64::EPSILON {
            self.value = value;
            Some(value)
        } else {
            None
        }
    }
}

/// Arbitrates the slider between user input and the sync loop.
#[derive(Debug, Clone, Default)]
pub struct SeekController {
    state: SeekState,
    slider: SeekSlider,
}

impl SeekController {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SeekState {
        self.state
    }

    #[must_use]
    pub fn slider(&self) -> &SeekSlider {
        &self.slider
    }

    #[must_use]
    pub fn is_user_seeking(&self) -> bool {
        self.state == SeekState::UserSeeking
    }

    /// The user pressed the slider.
    pub fn press_start(&mut self) {
        self.state = SeekState::UserSeeking;
    }

    /// The user moved the slider while holding it.
    ///
    /// Returns the position forwarded to the engine, if any.
    pub fn value_changed<E: MediaEngine>(&mut self, value: f64, engine: &mut E) -> Option<Duration> {
        if self.slider.set_value(value).is_none() {
            return None;
        }
        self.on_value_changed(engine)
    }

    /// The user released the slider at `value`.
    ///
    /// Commits the final position. The commit is dropped when the natural
    /// duration is still unknown.
    pub fn press_end<E: MediaEngine>(&mut self, value: f64, engine: &mut E) -> Option<Duration> {
        self.state = SeekState::Idle;
        self.slider.set_value(value);
        commit(engine, self.slider.value)
    }

    /// Projects the engine position onto the slider.
    ///
    /// The assignment raises the same change notification a user edit would,
    /// and the notification is discarded while in [`SeekState::ProgrammaticUpdate`].
    /// Does nothing while the user holds the slider.
    pub fn write_programmatic<E: MediaEngine>(
        &mut self,
        maximum: Duration,
        position: Duration,
        engine: &mut E,
    ) {
        if self.is_user_seeking() {
            return;
        }

        self.state = SeekState::ProgrammaticUpdate;
        self.slider.set_maximum(maximum.as_secs_f64());
        if self.slider.set_value(position.as_secs_f64()).is_some() {
            self.on_value_changed(engine);
        }
        self.state = SeekState::Idle;
    }

    /// Forgets the previous source: zero slider, no owner.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn on_value_changed<E: MediaEngine>(&mut self, engine: &mut E) -> Option<Duration> {
        match self.state {
            SeekState::UserSeeking => commit(engine, self.slider.value),
            SeekState::ProgrammaticUpdate | SeekState::Idle => None,
        }
    }
}

fn commit<E: MediaEngine>(engine: &mut E, secs: f64) -> Option<Duration> {
    let Some(duration) = engine.natural_duration() else {
        tracing::debug!(secs, "seek dropped, duration unknown");
        return None;
    };
    let target = secs_to_duration(secs).min(duration);
    engine.set_position(target);
    Some(target)
}
