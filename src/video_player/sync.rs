// SPDX-License-Identifier: MPL-2.0
//! Position sync loop.
//!
//! Each tick takes one snapshot of the engine position and projects it onto
//! the seek slider and the elapsed/remaining labels, in that order. The loop
//! only reads from the engine.

use super::engine::MediaEngine;
use super::seek::SeekController;
use super::time_format::{format_remaining, format_time};
use std::time::Duration;

/// Elapsed and remaining labels shown next to the seek slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLabels {
    pub elapsed: String,
    pub remaining: String,
}

impl Default for TimeLabels {
    fn default() -> Self {
        Self::project(Duration::ZERO, Duration::ZERO)
    }
}

impl TimeLabels {
    /// Builds labels for `position` within `duration`.
    ///
    /// Remaining time floors at zero when the position has drifted past the
    /// end.
    pub fn project(position: Duration, duration: Duration) -> Self {
        Self {
            elapsed: format_time(position),
            remaining: format_remaining(duration.saturating_sub(position)),
        }
    }
}

/// Result of a single sync tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine has not resolved the natural duration yet.
    DurationUnknown,
    /// The user holds the slider.
    Suspended,
    Projected { position: Duration, duration: Duration },
}

#[derive(Debug, Clone, Default)]
pub struct PositionSync {
    labels: TimeLabels,
}

impl PositionSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> &TimeLabels {
        &self.labels
    }

    pub fn reset(&mut self) {
        self.labels = TimeLabels::default();
    }

    /// Runs one projection pass.
    pub fn tick<E: MediaEngine>(&mut self, engine: &mut E, seek: &mut SeekController) -> TickOutcome {
        let Some(duration) = engine.natural_duration() else {
            return TickOutcome::DurationUnknown;
        };
        if seek.is_user_seeking() {
            return TickOutcome::Suspended;
        }

        let position = engine.position();
        seek.write_programmatic(duration, position, engine);
        self.labels = TimeLabels::project(position, duration);

        TickOutcome::Projected { position, duration }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::video_player::volume::Volume;
    use std::cell::Cell;
    use std::path::Path;

    #[derive(Default)]
    struct ScriptedEngine {
        duration: Option<Duration>,
        position: Duration,
        position_reads: Cell<usize>,
        position_writes: usize,
    }

    impl MediaEngine for ScriptedEngine {
        fn load(&mut self, _source: &Path) -> Result<(), SourceError> {
            Ok(())
        }
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn stop(&mut self) {}
        fn position(&self) -> Duration {
            self.position_reads.set(self.position_reads.get() + 1);
            self.position
        }
        fn set_position(&mut self, position: Duration) {
            self.position = position;
            self.position_writes += 1;
        }
        fn natural_duration(&self) -> Option<Duration> {
            self.duration
        }
        fn resolve_duration(&mut self, duration: Duration) {
            self.duration = Some(duration);
        }
        fn volume(&self) -> Volume {
            Volume::default()
        }
        fn set_volume(&mut self, _volume: Volume) {}
        fn can_pause(&self) -> bool {
            true
        }
    }

    #[test]
    fn tick_is_noop_until_duration_known() {
        let mut engine = ScriptedEngine::default();
        let mut seek = SeekController::new();
        let mut sync = PositionSync::new();

        assert_eq!(sync.tick(&mut engine, &mut seek), TickOutcome::DurationUnknown);
        assert_eq!(engine.position_reads.get(), 0);
        assert_eq!(sync.labels(), &TimeLabels::default());
    }

    #[test]
    fn tick_projects_single_snapshot() {
        let mut engine = ScriptedEngine {
            duration: Some(Duration::from_secs(600)),
            position: Duration::from_secs(65),
            ..ScriptedEngine::default()
        };
        let mut seek = SeekController::new();
        let mut sync = PositionSync::new();

        let outcome = sync.tick(&mut engine, &mut seek);

        assert_eq!(
            outcome,
            TickOutcome::Projected {
                position: Duration::from_secs(65),
                duration: Duration::from_secs(600)
            }
        );
        assert_eq!(engine.position_reads.get(), 1);
        assert_eq!(engine.position_writes, 0);
        assert_eq!(seek.slider().value(), 65.0);
        assert_eq!(sync.labels().elapsed, "01:05");
        assert_eq!(sync.labels().remaining, "-08:55");
    }

    #[test]
    fn tick_leaves_slider_alone_while_user_seeking() {
        let mut engine = ScriptedEngine {
            duration: Some(Duration::from_secs(100)),
            position: Duration::from_secs(10),
            ..ScriptedEngine::default()
        };
        let mut seek = SeekController::new();
        let mut sync = PositionSync::new();
        sync.tick(&mut engine, &mut seek);

        seek.press_start();
        engine.position = Duration::from_secs(40);
        let before = *seek.slider();

        assert_eq!(sync.tick(&mut engine, &mut seek), TickOutcome::Suspended);
        assert_eq!(*seek.slider(), before);
        assert_eq!(sync.labels().elapsed, "00:10");
    }

    #[test]
    fn remaining_floors_at_zero_on_drift() {
        let labels = TimeLabels::project(Duration::from_secs(130), Duration::from_secs(120));
        assert_eq!(labels.remaining, "-00:00");
        assert_eq!(labels.elapsed, "02:10");
    }
}
