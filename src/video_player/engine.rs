// SPDX-License-Identifier: MPL-2.0
//! Media engine port and the bundled clock-driven adapter.
//!
//! The playback core never decodes anything itself. It drives a
//! [`MediaEngine`] through transport commands and observes its position.
//!
//! # Design Notes
//!
//! - Methods are not `async` - the Iced framework handles threading via `Task`
//! - `natural_duration()` is `None` until the engine has resolved it, which
//!   happens asynchronously after [`MediaEngine::load`]
//! - Positions are always clamped to the natural duration once it is known

use super::clock::{PlaybackClock, SharedClock};
use super::volume::Volume;
use crate::error::SourceError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// File extensions accepted by the engines and the open dialog.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "wmv", "mov", "webm", "m4v"];

/// Port for the media decode/render engine.
pub trait MediaEngine {
    /// Loads a new source. Position resets to zero and the natural duration
    /// becomes unknown until the engine resolves it.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the engine rejects the source.
    fn load(&mut self, source: &Path) -> Result<(), SourceError>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Halts playback and rewinds to the start.
    fn stop(&mut self);

    fn position(&self) -> Duration;

    fn set_position(&mut self, position: Duration);

    fn natural_duration(&self) -> Option<Duration>;

    /// Records the natural duration once the source has been opened.
    fn resolve_duration(&mut self, duration: Duration);

    fn volume(&self) -> Volume;

    fn set_volume(&mut self, volume: Volume);

    /// Whether a pause request would be honored right now.
    fn can_pause(&self) -> bool;
}

/// Returns true if the path carries one of [`VIDEO_EXTENSIONS`].
pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Engine transport whose position advances with wall-clock time.
///
/// This owns the transport state and the playhead; it renders nothing. The
/// FFmpeg pipeline follows its [`SharedClock`], and it also drives the UI
/// core directly in headless runs. The natural duration is fed in by
/// [`MediaEngine::resolve_duration`] once the container has been opened.
#[derive(Debug)]
pub struct ClockEngine {
    source: Option<PathBuf>,
    clock: SharedClock,
    volume: Volume,
}

impl Default for ClockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockEngine {
    pub fn new() -> Self {
        Self {
            source: None,
            clock: PlaybackClock::shared(),
            volume: Volume::default(),
        }
    }

    /// Currently loaded source, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Handle on the playhead for threads that must follow it.
    pub fn clock(&self) -> SharedClock {
        Arc::clone(&self.clock)
    }

    /// Returns true while the clock is advancing.
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Position as observed at `now`.
    pub fn position_at(&self, now: Instant) -> Duration {
        self.clock.position_at(now)
    }
}

impl MediaEngine for ClockEngine {
    fn load(&mut self, source: &Path) -> Result<(), SourceError> {
        if !source.is_file() {
            return Err(SourceError::NotFound(source.display().to_string()));
        }
        if !has_video_extension(source) {
            return Err(SourceError::UnsupportedFormat);
        }

        self.source = Some(source.to_path_buf());
        self.clock.reset();
        Ok(())
    }

    fn play(&mut self) {
        if self.source.is_some() {
            self.clock.start();
        }
    }

    fn pause(&mut self) {
        self.clock.halt();
    }

    fn stop(&mut self) {
        self.clock.halt();
        self.clock.seek(Duration::ZERO);
    }

    fn position(&self) -> Duration {
        self.clock.position()
    }

    fn set_position(&mut self, position: Duration) {
        self.clock.seek(position);
    }

    fn natural_duration(&self) -> Option<Duration> {
        self.clock.natural_duration()
    }

    fn resolve_duration(&mut self, duration: Duration) {
        self.clock.set_natural_duration(Some(duration));
    }

    fn volume(&self) -> Volume {
        self.volume
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    fn can_pause(&self) -> bool {
        self.source.is_some()
    }
}
