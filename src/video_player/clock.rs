// SPDX-License-Identifier: MPL-2.0
//! Shared playback clock.
//!
//! The transport, the video decoder thread and the audio callback all read
//! the playhead from the same [`PlaybackClock`]. It is lock-free so the audio
//! callback never blocks on the UI thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// Reference instant for storing `Instant`s as atomic microseconds.
static REFERENCE_INSTANT: OnceLock<Instant> = OnceLock::new();

/// Sentinel for an unknown natural duration.
const UNKNOWN_DURATION: u64 = u64::MAX;

#[allow(clippy::cast_possible_truncation)] // u128 micros fit u64 for any realistic uptime
fn instant_to_us(instant: Instant) -> u64 {
    let reference = REFERENCE_INSTANT.get_or_init(Instant::now);
    instant.saturating_duration_since(*reference).as_micros() as u64
}

#[allow(clippy::cast_possible_truncation)]
fn duration_to_us(duration: Duration) -> u64 {
    duration.as_micros().min(u128::from(UNKNOWN_DURATION - 1)) as u64
}

/// Playhead that advances with wall-clock time while running.
///
/// The position is `from + (now - anchor)` while running and `from` while
/// halted, clamped to the natural duration once it is known.
#[derive(Debug)]
pub struct PlaybackClock {
    running: AtomicBool,
    /// Anchor instant, as microseconds since [`REFERENCE_INSTANT`].
    anchor_us: AtomicU64,
    /// Position at the anchor, in microseconds.
    from_us: AtomicU64,
    duration_us: AtomicU64,
}

/// Clock handle shared between the transport and the decode threads.
pub type SharedClock = Arc<PlaybackClock>;

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            anchor_us: AtomicU64::new(0),
            from_us: AtomicU64::new(0),
            duration_us: AtomicU64::new(UNKNOWN_DURATION),
        }
    }

    #[must_use]
    pub fn shared() -> SharedClock {
        Arc::new(Self::new())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn natural_duration(&self) -> Option<Duration> {
        match self.duration_us.load(Ordering::SeqCst) {
            UNKNOWN_DURATION => None,
            us => Some(Duration::from_micros(us)),
        }
    }

    pub fn set_natural_duration(&self, duration: Option<Duration>) {
        let us = duration.map_or(UNKNOWN_DURATION, duration_to_us);
        self.duration_us.store(us, Ordering::SeqCst);
    }

    /// Position as observed at `now`.
    pub fn position_at(&self, now: Instant) -> Duration {
        let from = self.from_us.load(Ordering::SeqCst);
        let raw = if self.is_running() {
            let elapsed = instant_to_us(now).saturating_sub(self.anchor_us.load(Ordering::SeqCst));
            from.saturating_add(elapsed)
        } else {
            from
        };
        self.clamp(Duration::from_micros(raw))
    }

    pub fn position(&self) -> Duration {
        self.position_at(Instant::now())
    }

    /// Starts advancing from the current position. No-op while running.
    pub fn start(&self) {
        if self.is_running() {
            return;
        }
        self.anchor_us
            .store(instant_to_us(Instant::now()), Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
    }

    /// Freezes the playhead at its current position.
    pub fn halt(&self) {
        let position = self.position();
        self.running.store(false, Ordering::SeqCst);
        self.from_us.store(duration_to_us(position), Ordering::SeqCst);
    }

    /// Moves the playhead, keeping the running state.
    pub fn seek(&self, position: Duration) {
        let position = self.clamp(position);
        self.from_us.store(duration_to_us(position), Ordering::SeqCst);
        self.anchor_us
            .store(instant_to_us(Instant::now()), Ordering::SeqCst);
    }

    /// Halts at zero with an unknown duration.
    pub fn reset(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.from_us.store(0, Ordering::SeqCst);
        self.duration_us.store(UNKNOWN_DURATION, Ordering::SeqCst);
    }

    fn clamp(&self, position: Duration) -> Duration {
        match self.natural_duration() {
            Some(duration) => position.min(duration),
            None => position,
        }
    }
}
