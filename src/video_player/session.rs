// SPDX-License-Identifier: MPL-2.0
//! Playback session: transport state machine over a [`MediaEngine`].
//!
//! Buttons and keyboard shortcuts both land here, so every transport rule is
//! written once. The session also owns the seek controller and the position
//! sync loop, and tags each loaded source with a generation number so that
//! timers and decoder events issued for a previous source can be recognized and
//! discarded.

use super::engine::MediaEngine;
use super::seek::{SeekController, SeekSlider, SeekState};
use super::sync::{PositionSync, TickOutcome, TimeLabels};
use super::volume::Volume;
use crate::error::SourceError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Transport state of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Nothing playing yet. A source may already be loaded.
    #[default]
    Idle,
    Playing,
    Paused,
    Stopped,
    /// Position reached the natural duration.
    Ended,
}

/// Snapshot of the media currently handled by the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaSession {
    pub source: Option<PathBuf>,
    pub natural_duration: Option<Duration>,
    pub position: Duration,
    pub volume: Volume,
    pub play_state: PlayState,
}

impl MediaSession {
    fn empty(volume: Volume) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }
}

/// Owns the engine and every state derived from it.
#[derive(Debug)]
pub struct PlaybackSession<E> {
    engine: E,
    media: MediaSession,
    seek: SeekController,
    sync: PositionSync,
    generation: u64,
    sync_active: bool,
}

impl<E: MediaEngine + Default> Default for PlaybackSession<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}

impl<E: MediaEngine> PlaybackSession<E> {
    pub fn new(engine: E) -> Self {
        let volume = engine.volume();
        Self {
            engine,
            media: MediaSession::empty(volume),
            seek: SeekController::new(),
            sync: PositionSync::new(),
            generation: 0,
            sync_active: false,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn media(&self) -> &MediaSession {
        &self.media
    }

    pub fn play_state(&self) -> PlayState {
        self.media.play_state
    }

    pub fn has_source(&self) -> bool {
        self.media.source.is_some()
    }

    pub fn source(&self) -> Option<&Path> {
        self.media.source.as_deref()
    }

    pub fn slider(&self) -> &SeekSlider {
        self.seek.slider()
    }

    pub fn seek_state(&self) -> SeekState {
        self.seek.state()
    }

    pub fn labels(&self) -> &TimeLabels {
        self.sync.labels()
    }

    pub fn volume(&self) -> Volume {
        self.media.volume
    }

    /// Generation of the currently loaded source.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the sync loop should be ticking.
    pub fn is_sync_active(&self) -> bool {
        self.sync_active
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Loads `path` without starting playback.
    ///
    /// On success the session is reset to position zero with an unknown
    /// duration and a fresh generation, which is returned. On failure the
    /// session is left empty and idle.
    ///
    /// # Errors
    ///
    /// Forwards the engine's [`SourceError`].
    pub fn load(&mut self, path: &Path) -> Result<u64, SourceError> {
        self.generation = self.generation.wrapping_add(1);
        self.sync_active = false;
        self.seek.reset();
        self.sync.reset();

        if let Err(e) = self.engine.load(path) {
            tracing::warn!(path = %path.display(), error = %e, "source rejected");
            self.clear();
            return Err(e);
        }

        self.engine.set_volume(self.media.volume);
        self.media = MediaSession {
            source: Some(path.to_path_buf()),
            ..MediaSession::empty(self.media.volume)
        };
        tracing::info!(path = %path.display(), generation = self.generation, "source loaded");
        Ok(self.generation)
    }

    /// Loads `path` and starts playback.
    ///
    /// # Errors
    ///
    /// Forwards the engine's [`SourceError`]; the session stays idle.
    pub fn open(&mut self, path: &Path) -> Result<u64, SourceError> {
        let generation = self.load(path)?;
        self.play();
        Ok(generation)
    }

    /// Abandons the source of `generation` after a late failure (e.g. the
    /// decoder rejected the container). Ignored if a newer source has been loaded since.
    pub fn fail_source(&mut self, generation: u64) {
        if !self.is_current(generation) {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.clear();
    }

    fn clear(&mut self) {
        if self.media.source.is_some() {
            self.engine.stop();
        }
        self.sync_active = false;
        self.seek.reset();
        self.sync.reset();
        self.media = MediaSession::empty(self.media.volume);
    }

    /// Applies the natural duration resolved for `generation`.
    ///
    /// Returns false if the result belongs to a previous source.
    pub fn resolve_duration(&mut self, generation: u64, duration: Option<Duration>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        match duration {
            Some(duration) => {
                self.engine.resolve_duration(duration);
                self.project();
            }
            None => tracing::info!("source does not advertise a duration"),
        }
        true
    }

    /// The engine ran out of frames for `generation`.
    ///
    /// Covers sources whose duration is unknown or overstated; the tick only
    /// detects the end against a known duration.
    pub fn end_of_stream(&mut self, generation: u64) {
        if !self.is_current(generation) || self.media.play_state != PlayState::Playing {
            return;
        }
        self.engine.pause();
        self.media.position = self.engine.position();
        self.transition(PlayState::Ended);
        self.project();
    }

    pub fn play(&mut self) {
        if self.media.source.is_none() || self.media.play_state == PlayState::Playing {
            return;
        }

        if self.media.play_state == PlayState::Ended || self.is_at_end() {
            self.engine.set_position(Duration::ZERO);
            self.media.position = Duration::ZERO;
        }

        self.engine.play();
        self.transition(PlayState::Playing);
        self.sync_active = true;
    }

    pub fn pause(&mut self) {
        if self.media.play_state != PlayState::Playing || !self.engine.can_pause() {
            return;
        }
        self.engine.pause();
        self.media.position = self.engine.position();
        self.transition(PlayState::Paused);
    }

    /// Halts playback. The slider keeps its last value.
    pub fn stop(&mut self) {
        if self.media.source.is_none() {
            return;
        }
        self.engine.stop();
        self.media.position = self.engine.position();
        self.sync_active = false;
        self.transition(PlayState::Stopped);
    }

    /// Single entry point for the play/pause button and the Space key.
    pub fn toggle_play_pause(&mut self) {
        match self.media.play_state {
            PlayState::Playing => self.pause(),
            PlayState::Idle | PlayState::Paused | PlayState::Stopped | PlayState::Ended => {
                self.play();
            }
        }
    }

    /// Moves the playhead by `delta_secs`, clamped to the media bounds.
    ///
    /// Returns the new position, or `None` while the duration is unknown.
    pub fn seek_relative(&mut self, delta_secs: f64) -> Option<Duration> {
        if !delta_secs.is_finite() {
            return None;
        }
        let Some(duration) = self.engine.natural_duration() else {
            tracing::debug!(delta_secs, "relative seek dropped, duration unknown");
            return None;
        };

        let current = self.engine.position().as_secs_f64();
        let target_secs = (current + delta_secs).clamp(0.0, duration.as_secs_f64());
        let target = Duration::from_secs_f64(target_secs).min(duration);

        self.engine.set_position(target);
        self.after_seek(target, duration);
        Some(target)
    }

    pub fn seek_press_start(&mut self) {
        if self.media.source.is_some() {
            self.seek.press_start();
        }
    }

    pub fn seek_value_changed(&mut self, value: f64) {
        if let Some(target) = self.seek.value_changed(value, &mut self.engine) {
            self.media.position = target;
        }
    }

    pub fn seek_press_end(&mut self, value: f64) {
        if let Some(target) = self.seek.press_end(value, &mut self.engine) {
            if let Some(duration) = self.engine.natural_duration() {
                self.after_seek(target, duration);
            }
        }
    }

    /// Ends an open drag at the slider's current value. No-op outside a drag.
    pub fn seek_release(&mut self) {
        if !self.seek.is_user_seeking() {
            return;
        }
        let value = self.seek.slider().value();
        self.seek_press_end(value);
    }

    /// Commits a slider change made without holding it (arrow keys, wheel).
    ///
    /// The slider stays [`SeekState::Idle`], so the sync loop keeps
    /// projecting afterwards. Ignored during a drag.
    pub fn seek_commit(&mut self, value: f64) {
        if self.media.source.is_none() || self.seek.is_user_seeking() {
            return;
        }
        self.seek_press_end(value);
    }

    pub fn set_volume(&mut self, volume: Volume) {
        self.engine.set_volume(volume);
        self.media.volume = volume;
    }

    /// Sync loop tick for `generation`.
    ///
    /// Returns `None` for ticks belonging to a previous source or arriving
    /// after the loop was halted.
    pub fn tick(&mut self, generation: u64) -> Option<TickOutcome> {
        if !self.is_current(generation) || !self.sync_active {
            return None;
        }
        Some(self.project())
    }

    fn project(&mut self) -> TickOutcome {
        let outcome = self.sync.tick(&mut self.engine, &mut self.seek);
        self.media.natural_duration = self.engine.natural_duration();

        if let TickOutcome::Projected { position, duration } = outcome {
            self.media.position = position;
            if self.media.play_state == PlayState::Playing && position >= duration {
                self.engine.pause();
                self.transition(PlayState::Ended);
            }
        }
        outcome
    }

    fn after_seek(&mut self, target: Duration, duration: Duration) {
        self.media.position = target;
        if self.media.play_state == PlayState::Ended && target < duration {
            self.transition(PlayState::Paused);
        }
        self.project();
    }

    fn is_at_end(&self) -> bool {
        self.engine
            .natural_duration()
            .is_some_and(|duration| self.engine.position() >= duration)
    }

    fn transition(&mut self, next: PlayState) {
        if self.media.play_state != next {
            tracing::debug!(from = ?self.media.play_state, to = ?next, "play state");
            self.media.play_state = next;
        }
    }
}
