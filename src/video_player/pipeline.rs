// SPDX-License-Identifier: MPL-2.0
//! FFmpeg-backed media engine.
//!
//! [`FfmpegEngine`] keeps the transport in a [`ClockEngine`] and, for each
//! loaded source, runs one video and one audio decode thread that follow its
//! clock. Decoder output reaches the UI through an [`EventFeed`]; the natural
//! duration arrives there as [`PipelineEvent::Opened`].

use super::audio::{run_audio_decoder, AudioLevel};
use super::clock::SharedClock;
use super::decoder::{run_video_decoder, DecoderCommand, VideoFrame};
use super::engine::{ClockEngine, MediaEngine};
use super::volume::Volume;
use crate::error::SourceError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Decoded frames queued ahead of the UI. Small, so a busy UI throttles
/// decoding instead of buffering video.
const EVENT_CHANNEL_CAPACITY: usize = 2;

/// Output of the decode threads for the current source.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// The container opened; carries its advertised duration.
    Opened { duration: Option<Duration> },
    Frame(VideoFrame),
    /// The video stream ran out of frames.
    EndOfStream,
    /// The source could not be decoded.
    Failed(SourceError),
}

/// Hands the event receiver of the latest source to the UI subscription.
#[derive(Debug, Clone, Default)]
pub struct EventFeed(Arc<Mutex<Option<mpsc::Receiver<PipelineEvent>>>>);

impl EventFeed {
    fn install(&self, events: mpsc::Receiver<PipelineEvent>) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(events);
        }
    }

    /// Takes the receiver for the current source. `None` once taken.
    #[must_use]
    pub fn take(&self) -> Option<mpsc::Receiver<PipelineEvent>> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// Decode threads of one source. Dropping it stops them.
#[derive(Debug)]
struct Pipeline {
    video: mpsc::UnboundedSender<DecoderCommand>,
    audio: mpsc::UnboundedSender<DecoderCommand>,
    level: Arc<AudioLevel>,
}

impl Pipeline {
    fn spawn(
        path: &Path,
        clock: &SharedClock,
        volume: Volume,
    ) -> Result<(Self, mpsc::Receiver<PipelineEvent>), SourceError> {
        let (video_tx, video_rx) = mpsc::unbounded_channel();
        let (audio_tx, audio_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let level = Arc::new(AudioLevel::new(volume));

        let video_path = path.to_path_buf();
        let video_clock = Arc::clone(clock);
        std::thread::Builder::new()
            .name("video-decoder".to_string())
            .spawn(move || run_video_decoder(&video_path, &video_clock, video_rx, &event_tx))
            .map_err(|e| SourceError::Other(format!("Failed to start video decoder: {e}")))?;

        let audio_path: PathBuf = path.to_path_buf();
        let audio_clock = Arc::clone(clock);
        let audio_level = Arc::clone(&level);
        if let Err(e) = std::thread::Builder::new()
            .name("audio-decoder".to_string())
            .spawn(move || run_audio_decoder(&audio_path, audio_clock, audio_rx, audio_level))
        {
            tracing::warn!(error = %e, "failed to start audio decoder, playing muted");
        }

        Ok((
            Self {
                video: video_tx,
                audio: audio_tx,
                level,
            },
            event_rx,
        ))
    }

    fn seek(&self, target: Duration) {
        // A closed channel means the thread already exited.
        let _ = self.video.send(DecoderCommand::Seek(target));
        let _ = self.audio.send(DecoderCommand::Seek(target));
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        let _ = self.video.send(DecoderCommand::Stop);
        let _ = self.audio.send(DecoderCommand::Stop);
    }
}

/// Engine that decodes and plays sources with FFmpeg and cpal.
#[derive(Debug, Default)]
pub struct FfmpegEngine {
    transport: ClockEngine,
    pipeline: Option<Pipeline>,
    feed: EventFeed,
}

impl FfmpegEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the UI drains decoder output from.
    #[must_use]
    pub fn event_feed(&self) -> EventFeed {
        self.feed.clone()
    }

    /// Currently loaded source, if any.
    pub fn source(&self) -> Option<&Path> {
        self.transport.source()
    }

    /// Returns true while the playhead is advancing.
    pub fn is_running(&self) -> bool {
        self.transport.is_running()
    }
}

impl MediaEngine for FfmpegEngine {
    fn load(&mut self, source: &Path) -> Result<(), SourceError> {
        self.pipeline = None;
        self.transport.load(source)?;

        let (pipeline, events) =
            Pipeline::spawn(source, &self.transport.clock(), self.transport.volume())?;
        self.feed.install(events);
        self.pipeline = Some(pipeline);
        Ok(())
    }

    fn play(&mut self) {
        self.transport.play();
    }

    fn pause(&mut self) {
        self.transport.pause();
    }

    fn stop(&mut self) {
        self.transport.stop();
        if let Some(pipeline) = &self.pipeline {
            pipeline.seek(Duration::ZERO);
        }
    }

    fn position(&self) -> Duration {
        self.transport.position()
    }

    fn set_position(&mut self, position: Duration) {
        self.transport.set_position(position);
        if let Some(pipeline) = &self.pipeline {
            pipeline.seek(self.transport.position());
        }
    }

    fn natural_duration(&self) -> Option<Duration> {
        self.transport.natural_duration()
    }

    fn resolve_duration(&mut self, duration: Duration) {
        self.transport.resolve_duration(duration);
    }

    fn volume(&self) -> Volume {
        self.transport.volume()
    }

    fn set_volume(&mut self, volume: Volume) {
        self.transport.set_volume(volume);
        if let Some(pipeline) = &self.pipeline {
            pipeline.level.set(volume);
        }
    }

    fn can_pause(&self) -> bool {
        self.transport.can_pause()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn garbage_video(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("garbage.mp4");
        std::fs::write(&path, [0u8; 64]).expect("failed to write fixture");
        path
    }

    #[test]
    fn missing_file_is_rejected_without_threads() {
        let mut engine = FfmpegEngine::new();
        let result = engine.load(Path::new("/nonexistent/clip.mp4"));

        assert!(matches!(result, Err(SourceError::NotFound(_))));
        assert!(engine.event_feed().take().is_none());
        assert!(engine.source().is_none());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"text").expect("failed to write fixture");

        let mut engine = FfmpegEngine::new();
        assert_eq!(engine.load(&path), Err(SourceError::UnsupportedFormat));
    }

    #[test]
    fn undecodable_source_reports_failure_on_the_feed() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = garbage_video(&dir);

        let mut engine = FfmpegEngine::new();
        engine.load(&path).expect("extension and existence are valid");

        let mut events = engine.event_feed().take().expect("feed installed");
        assert!(matches!(
            events.blocking_recv(),
            Some(PipelineEvent::Failed(_))
        ));
        assert!(engine.event_feed().take().is_none());
    }

    #[test]
    fn reload_installs_a_fresh_feed() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = garbage_video(&dir);

        let mut engine = FfmpegEngine::new();
        engine.load(&path).expect("first load");
        let _first = engine.event_feed().take().expect("first feed");
        engine.load(&path).expect("second load");

        assert!(engine.event_feed().take().is_some());
    }

    #[test]
    fn transport_follows_the_clock() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = garbage_video(&dir);

        let mut engine = FfmpegEngine::new();
        engine.load(&path).expect("load");
        engine.resolve_duration(Duration::from_secs(10));

        engine.play();
        assert!(engine.is_running());
        engine.pause();
        assert!(!engine.is_running());

        engine.set_position(Duration::from_secs(30));
        assert_eq!(engine.position(), Duration::from_secs(10));

        engine.stop();
        assert_eq!(engine.position(), Duration::ZERO);
    }

    #[test]
    fn volume_reaches_the_audio_level() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = garbage_video(&dir);

        let mut engine = FfmpegEngine::new();
        engine.load(&path).expect("load");
        engine.set_volume(Volume::new(0.5));

        assert_eq!(engine.volume(), Volume::new(0.5));
        let level = &engine.pipeline.as_ref().expect("pipeline running").level;
        assert_relative_eq!(level.gain(), 0.25);
    }
}
