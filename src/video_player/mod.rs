// SPDX-License-Identifier: MPL-2.0
//! Playback core for Iced Player.
//!
//! This module keeps the seek slider, the time labels and the transport state
//! consistent with a [`MediaEngine`] whose position advances on its own.
//! [`FfmpegEngine`] decodes with FFmpeg and plays audio through cpal.
//! Nothing here depends on Iced; the `app` module translates widget events,
//! timer ticks and decoder events into calls on [`PlaybackSession`].

mod audio;
pub mod clock;
pub mod decoder;
pub mod engine;
pub mod pipeline;
pub mod seek;
pub mod seek_step;
pub mod session;
pub mod sync;
pub mod sync_interval;
pub mod time_format;
pub mod volume;

pub use clock::{PlaybackClock, SharedClock};
pub use decoder::{init_ffmpeg, DecoderCommand, VideoFrame};
pub use engine::{has_video_extension, ClockEngine, MediaEngine, VIDEO_EXTENSIONS};
pub use pipeline::{EventFeed, FfmpegEngine, PipelineEvent};
pub use seek::{SeekController, SeekSlider, SeekState};
pub use seek_step::SeekStep;
pub use session::{MediaSession, PlayState, PlaybackSession};
pub use sync::{PositionSync, TickOutcome, TimeLabels};
pub use sync_interval::SyncInterval;
pub use time_format::format_time;
pub use volume::Volume;
