// SPDX-License-Identifier: MPL-2.0
//! Video decoding thread.
//!
//! Opens the container with FFmpeg, reports the natural duration, and emits
//! RGBA frames paced against the shared playback clock. While the clock is
//! halted only the frame at a seek target is decoded, so a paused seek still
//! refreshes the picture.

use super::clock::SharedClock;
use super::pipeline::PipelineEvent;
use crate::error::SourceError;
use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::scaling;
use std::path::Path;
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError};

static FFMPEG_INIT: Once = Once::new();

/// Idle poll interval of the decode loops.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Frames this far behind the playhead are dropped instead of shown.
const LATE_FRAME_TOLERANCE: Duration = Duration::from_millis(100);

/// Frames this close before a seek target count as reaching it.
const SEEK_TOLERANCE: Duration = Duration::from_millis(20);

/// Initializes FFmpeg once per process and silences its warning chatter.
///
/// # Errors
///
/// Returns [`SourceError::Other`] when the library fails to initialize.
pub fn init_ffmpeg() -> Result<(), SourceError> {
    let mut init_result = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(SourceError::Other(format!(
                "FFmpeg initialization failed: {e}"
            )));
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Commands accepted by the decode threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderCommand {
    /// Reposition the demuxer; the next shown frame is the one at the target.
    Seek(Duration),
    /// Exit the decode loop.
    Stop,
}

/// A decoded picture in RGBA8.
#[derive(Clone)]
pub struct VideoFrame {
    pub rgba: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    pub pts: Duration,
}

impl VideoFrame {
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.rgba.len()
    }
}

impl std::fmt::Debug for VideoFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pts", &self.pts)
            .field("bytes", &self.size_bytes())
            .finish()
    }
}

/// Natural duration advertised by a container.
///
/// The stream duration is preferred; the container duration, expressed in
/// `AV_TIME_BASE` units, is the fallback. Live captures and some fragmented
/// files advertise neither.
pub(crate) fn natural_duration_of(
    stream_duration: i64,
    time_base: ffmpeg_next::Rational,
    container_duration: i64,
) -> Option<Duration> {
    #[allow(clippy::cast_precision_loss)]
    let secs = if stream_duration > 0 && time_base.denominator() != 0 {
        stream_duration as f64 * f64::from(time_base.numerator())
            / f64::from(time_base.denominator())
    } else if container_duration > 0 {
        container_duration as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
    } else {
        return None;
    };

    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

/// Converts a presentation timestamp to a playhead position.
pub(crate) fn pts_to_duration(pts: Option<i64>, time_base_secs: f64) -> Option<Duration> {
    #[allow(clippy::cast_precision_loss)]
    let secs = pts? as f64 * time_base_secs;
    Duration::try_from_secs_f64(secs.max(0.0)).ok()
}

/// Seeks the demuxer to `target`, keyframe-aligned at or before it.
pub(crate) fn seek_input(ictx: &mut ffmpeg_next::format::context::Input, target: Duration) {
    let timestamp = i64::try_from(target.as_micros()).unwrap_or(i64::MAX);
    if let Err(e) = ictx.seek(timestamp, ..timestamp) {
        tracing::debug!(error = %e, ?target, "demuxer seek failed");
    }
}

fn stream_error(e: ffmpeg_next::Error) -> SourceError {
    SourceError::from_message(&e.to_string())
}

/// Open video stream with its decoder and RGBA scaler.
struct VideoSource {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::codec::decoder::Video,
    scaler: scaling::Context,
    stream_index: usize,
    time_base_secs: f64,
    last_pts: Duration,
}

impl VideoSource {
    fn open(path: &Path) -> Result<(Self, Option<Duration>), SourceError> {
        init_ffmpeg()?;

        let ictx = ffmpeg_next::format::input(&path).map_err(stream_error)?;
        let input = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or(SourceError::NoVideoStream)?;
        let stream_index = input.index();
        let time_base = input.time_base();
        let duration = natural_duration_of(input.duration(), time_base, ictx.duration());

        let decoder = ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
            .map_err(stream_error)?
            .decoder()
            .video()
            .map_err(stream_error)?;

        let scaler = scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGBA,
            decoder.width(),
            decoder.height(),
            scaling::Flags::BILINEAR,
        )
        .map_err(stream_error)?;

        let time_base_secs = if time_base.denominator() == 0 {
            0.0
        } else {
            f64::from(time_base.numerator()) / f64::from(time_base.denominator())
        };

        Ok((
            Self {
                ictx,
                decoder,
                scaler,
                stream_index,
                time_base_secs,
                last_pts: Duration::ZERO,
            },
            duration,
        ))
    }

    fn seek(&mut self, target: Duration) {
        seek_input(&mut self.ictx, target);
        self.decoder.flush();
    }

    /// Decodes the next picture. `None` once the stream is drained.
    fn next_frame(&mut self) -> Option<VideoFrame> {
        let mut decoded = ffmpeg_next::frame::Video::empty();
        loop {
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                if let Some(frame) = self.convert(&decoded) {
                    return Some(frame);
                }
                continue;
            }

            let mut fed = false;
            for (stream, packet) in self.ictx.packets() {
                if stream.index() != self.stream_index {
                    continue;
                }
                if let Err(e) = self.decoder.send_packet(&packet) {
                    tracing::debug!(error = %e, "video packet rejected");
                    continue;
                }
                fed = true;
                break;
            }

            if !fed {
                // Drain the frames the decoder still buffers.
                let _ = self.decoder.send_eof();
                if self.decoder.receive_frame(&mut decoded).is_ok() {
                    if let Some(frame) = self.convert(&decoded) {
                        return Some(frame);
                    }
                }
                return None;
            }
        }
    }

    fn convert(&mut self, decoded: &ffmpeg_next::frame::Video) -> Option<VideoFrame> {
        let mut rgba_frame = ffmpeg_next::frame::Video::empty();
        if let Err(e) = self.scaler.run(decoded, &mut rgba_frame) {
            tracing::debug!(error = %e, "frame scaling failed");
            return None;
        }

        let pts = pts_to_duration(decoded.timestamp(), self.time_base_secs)
            .unwrap_or(self.last_pts);
        self.last_pts = pts;

        Some(VideoFrame {
            rgba: Arc::new(extract_rgba_data(&rgba_frame)),
            width: rgba_frame.width(),
            height: rgba_frame.height(),
            pts,
        })
    }
}

/// Copies RGBA rows out of a scaled frame, dropping the stride padding.
fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let data = frame.data(0);
    let stride = frame.stride(0);
    let row_len = width * 4;

    let mut rgba_bytes = Vec::with_capacity(row_len * height);
    for y in 0..height {
        let row_start = y * stride;
        if let Some(row) = data.get(row_start..row_start + row_len) {
            rgba_bytes.extend_from_slice(row);
        }
    }

    rgba_bytes
}

/// Decode loop bookkeeping that survives between iterations.
#[derive(Debug, Default)]
struct Presentation {
    /// Decoded frame waiting for the playhead to reach it.
    pending: Option<VideoFrame>,
    /// Frames before this position are decoded but never shown.
    skip_until: Option<Duration>,
    /// Show the next frame even while the clock is halted.
    show_next: bool,
    /// End of stream has been reported since the last seek.
    ended: bool,
}

impl Presentation {
    fn seeked(&mut self, target: Duration) {
        *self = Self {
            skip_until: Some(target),
            show_next: true,
            ..Self::default()
        };
    }

    fn wants_frame(&self, clock: &SharedClock) -> bool {
        self.pending.is_none() && !self.ended && (self.show_next || clock.is_running())
    }

    /// Returns false while the frame is still before the seek target.
    fn reached_target(&mut self, frame: &VideoFrame) -> bool {
        match self.skip_until {
            Some(target) if frame.pts + SEEK_TOLERANCE < target => false,
            _ => {
                self.skip_until = None;
                true
            }
        }
    }
}

/// What to do with the pending frame right now.
#[derive(Debug, PartialEq, Eq)]
enum FrameAction {
    Show,
    Drop,
    Wait(Duration),
}

fn frame_action(frame_pts: Duration, position: Duration, running: bool, show_next: bool) -> FrameAction {
    if show_next {
        FrameAction::Show
    } else if !running {
        FrameAction::Wait(POLL_INTERVAL)
    } else if frame_pts > position {
        FrameAction::Wait((frame_pts - position).min(POLL_INTERVAL))
    } else if position - frame_pts > LATE_FRAME_TOLERANCE {
        FrameAction::Drop
    } else {
        FrameAction::Show
    }
}

/// Runs the video decode loop until stopped or the event receiver goes away.
///
/// Reports [`PipelineEvent::Opened`] first, or [`PipelineEvent::Failed`] when
/// the source cannot be decoded.
pub(crate) fn run_video_decoder(
    path: &Path,
    clock: &SharedClock,
    mut commands: mpsc::UnboundedReceiver<DecoderCommand>,
    events: &mpsc::Sender<PipelineEvent>,
) {
    let (mut source, duration) = match VideoSource::open(path) {
        Ok(opened) => opened,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "video decoding failed");
            let _ = events.blocking_send(PipelineEvent::Failed(error));
            return;
        }
    };

    tracing::debug!(path = %path.display(), ?duration, "video stream opened");
    if events
        .blocking_send(PipelineEvent::Opened { duration })
        .is_err()
    {
        return;
    }

    let mut presentation = Presentation {
        show_next: true,
        ..Presentation::default()
    };

    loop {
        // Only the last queued seek matters.
        let mut seek_to = None;
        loop {
            match commands.try_recv() {
                Ok(DecoderCommand::Seek(target)) => seek_to = Some(target),
                Ok(DecoderCommand::Stop) | Err(TryRecvError::Disconnected) => return,
                Err(TryRecvError::Empty) => break,
            }
        }
        if let Some(target) = seek_to {
            source.seek(target);
            presentation.seeked(target);
        }

        if let Some(frame) = presentation.pending.take() {
            match frame_action(
                frame.pts,
                clock.position(),
                clock.is_running(),
                presentation.show_next,
            ) {
                FrameAction::Show => {
                    presentation.show_next = false;
                    if events.blocking_send(PipelineEvent::Frame(frame)).is_err() {
                        return;
                    }
                }
                FrameAction::Drop => {
                    tracing::trace!(pts = ?frame.pts, "late frame dropped");
                }
                FrameAction::Wait(delay) => {
                    presentation.pending = Some(frame);
                    std::thread::sleep(delay);
                }
            }
            continue;
        }

        if !presentation.wants_frame(clock) {
            std::thread::sleep(POLL_INTERVAL);
            continue;
        }

        match source.next_frame() {
            Some(frame) => {
                if presentation.reached_target(&frame) {
                    presentation.pending = Some(frame);
                }
            }
            None => {
                presentation.ended = true;
                presentation.show_next = false;
                if events.blocking_send(PipelineEvent::EndOfStream).is_err() {
                    return;
                }
            }
        }
    }
}
