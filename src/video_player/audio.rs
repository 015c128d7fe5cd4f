// SPDX-License-Identifier: MPL-2.0
//! Audio decoding thread and cpal output.
//!
//! The thread decodes the best audio stream, resamples it to the output
//! device format, and keeps a short queue of samples ahead of the device
//! callback. The callback plays silence while the playback clock is halted,
//! so pause and resume never need a round trip through this thread.

use super::clock::SharedClock;
use super::decoder::{init_ffmpeg, pts_to_duration, seek_input, DecoderCommand, POLL_INTERVAL};
use super::volume::Volume;
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError};

/// How far decoding runs ahead of the device callback.
const AUDIO_LOOKAHEAD: Duration = Duration::from_millis(200);

type SampleQueue = Arc<Mutex<VecDeque<f32>>>;

/// Volume shared with the device callback.
#[derive(Debug)]
pub(crate) struct AudioLevel {
    /// `f32` bits of the slider volume.
    volume_bits: AtomicU32,
}

impl AudioLevel {
    pub(crate) fn new(volume: Volume) -> Self {
        Self {
            volume_bits: AtomicU32::new(volume.value().to_bits()),
        }
    }

    pub(crate) fn set(&self, volume: Volume) {
        self.volume_bits
            .store(volume.value().to_bits(), Ordering::Relaxed);
    }

    /// Amplitude factor applied to samples.
    ///
    /// The slider is perceptual: amplitude follows its square, so half the
    /// slider sounds like half as loud.
    pub(crate) fn gain(&self) -> f32 {
        let volume = f32::from_bits(self.volume_bits.load(Ordering::Relaxed));
        volume * volume
    }
}

/// Scales a sample and keeps it inside the range every output format accepts.
fn amplify(sample: f32, gain: f32) -> f32 {
    // Exactly 1.0 overflows i16 conversion.
    (sample * gain).clamp(-1.0, 0.999_999_9)
}

/// Interleaved f32 samples of a packed resampled frame.
fn extract_samples(frame: &ffmpeg_next::frame::Audio, channels: u16) -> Vec<f32> {
    let sample_count = frame.samples() * usize::from(channels);
    frame
        .data(0)
        .chunks_exact(4)
        .take(sample_count)
        .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect()
}

fn io_error(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Io(format!("{context}: {e}"))
}

fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    queue: SampleQueue,
    clock: SharedClock,
    level: Arc<AudioLevel>,
) -> Result<cpal::Stream> {
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let silence = T::from_sample(0.0f32);
                if !clock.is_running() {
                    data.fill(silence);
                    return;
                }
                let Ok(mut queue) = queue.lock() else {
                    data.fill(silence);
                    return;
                };

                let gain = level.gain();
                for sample in data.iter_mut() {
                    *sample = queue
                        .pop_front()
                        .map_or(silence, |s| T::from_sample(amplify(s, gain)));
                }
            },
            |err| tracing::warn!(%err, "audio output error"),
            None,
        )
        .map_err(|e| io_error("Failed to build audio stream", e))
}

/// Runs the audio decode loop until stopped.
///
/// Sources without audio, and hosts without an output device, play muted;
/// both are logged and never reported to the UI.
pub(crate) fn run_audio_decoder(
    path: &Path,
    clock: SharedClock,
    commands: mpsc::UnboundedReceiver<DecoderCommand>,
    level: Arc<AudioLevel>,
) {
    if let Err(error) = decode_audio(path, clock, commands, level) {
        tracing::warn!(path = %path.display(), %error, "audio playback unavailable");
    }
}

fn decode_audio(
    path: &Path,
    clock: SharedClock,
    mut commands: mpsc::UnboundedReceiver<DecoderCommand>,
    level: Arc<AudioLevel>,
) -> Result<()> {
    init_ffmpeg()?;

    let mut ictx =
        ffmpeg_next::format::input(&path).map_err(|e| io_error("Failed to open audio", e))?;
    let Some(input) = ictx.streams().best(ffmpeg_next::media::Type::Audio) else {
        tracing::debug!(path = %path.display(), "source has no audio stream");
        return Ok(());
    };
    let stream_index = input.index();
    let time_base = input.time_base();
    let time_base_secs = if time_base.denominator() == 0 {
        0.0
    } else {
        f64::from(time_base.numerator()) / f64::from(time_base.denominator())
    };
    let mut decoder = ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
        .map_err(|e| io_error("Failed to create audio codec context", e))?
        .decoder()
        .audio()
        .map_err(|e| io_error("Failed to create audio decoder", e))?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Io("No audio output device found".to_string()))?;
    let supported_config = device
        .default_output_config()
        .map_err(|e| io_error("Failed to get audio config", e))?;
    let sample_rate = supported_config.sample_rate();
    let sample_format = supported_config.sample_format();

    // Anything beyond stereo is downmixed.
    let channels: u16 = if supported_config.channels() == 1 { 1 } else { 2 };
    let channel_layout = if channels == 1 {
        ffmpeg_next::ChannelLayout::MONO
    } else {
        ffmpeg_next::ChannelLayout::STEREO
    };
    let mut config: cpal::StreamConfig = supported_config.into();
    config.channels = channels;

    let mut resampler = ffmpeg_next::software::resampling::Context::get(
        decoder.format(),
        decoder.channel_layout(),
        decoder.rate(),
        ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Packed),
        channel_layout,
        sample_rate,
    )
    .map_err(|e| io_error("Failed to create audio resampler", e))?;

    let queue: SampleQueue = Arc::new(Mutex::new(VecDeque::new()));
    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &config, Arc::clone(&queue), Arc::clone(&clock), level)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &config, Arc::clone(&queue), Arc::clone(&clock), level)?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &config, Arc::clone(&queue), Arc::clone(&clock), level)?
        }
        _ => return Err(Error::Io("Unsupported audio sample format".to_string())),
    };
    stream
        .play()
        .map_err(|e| io_error("Failed to start audio stream", e))?;

    let samples_per_sec = f64::from(sample_rate) * f64::from(channels);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lookahead_samples = (samples_per_sec * AUDIO_LOOKAHEAD.as_secs_f64()) as usize;

    let mut skip_until: Option<Duration> = None;
    let mut ended = false;
    let mut decoded = ffmpeg_next::frame::Audio::empty();

    loop {
        let mut seek_to = None;
        loop {
            match commands.try_recv() {
                Ok(DecoderCommand::Seek(target)) => seek_to = Some(target),
                Ok(DecoderCommand::Stop) | Err(TryRecvError::Disconnected) => return Ok(()),
                Err(TryRecvError::Empty) => break,
            }
        }
        if let Some(target) = seek_to {
            seek_input(&mut ictx, target);
            decoder.flush();
            if let Ok(mut queue) = queue.lock() {
                queue.clear();
            }
            skip_until = Some(target);
            ended = false;
        }

        let buffered = queue.lock().map_or(0, |queue| queue.len());
        if ended || !clock.is_running() || buffered >= lookahead_samples {
            std::thread::sleep(POLL_INTERVAL);
            continue;
        }

        let mut frame_decoded = false;
        for (stream, packet) in ictx.packets() {
            if stream.index() != stream_index {
                continue;
            }
            if let Err(e) = decoder.send_packet(&packet) {
                tracing::debug!(error = %e, "audio packet rejected");
                continue;
            }
            if decoder.receive_frame(&mut decoded).is_ok() {
                frame_decoded = true;
                break;
            }
        }
        if !frame_decoded {
            ended = true;
            continue;
        }

        let mut resampled = ffmpeg_next::frame::Audio::empty();
        if let Err(e) = resampler.run(&decoded, &mut resampled) {
            tracing::debug!(error = %e, "audio resampling failed");
            continue;
        }
        let samples = extract_samples(&resampled, channels);

        if let Some(target) = skip_until {
            let start = pts_to_duration(decoded.timestamp(), time_base_secs).unwrap_or(target);
            #[allow(clippy::cast_precision_loss)]
            let length = Duration::try_from_secs_f64(samples.len() as f64 / samples_per_sec)
                .unwrap_or_default();
            if start + length < target {
                continue;
            }
            skip_until = None;
        }

        if let Ok(mut queue) = queue.lock() {
            queue.extend(samples);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gain_follows_the_square_of_the_volume() {
        let level = AudioLevel::new(Volume::new(0.5));
        assert_relative_eq!(level.gain(), 0.25);

        level.set(Volume::new(1.0));
        assert_relative_eq!(level.gain(), 1.0);
    }

    #[test]
    fn amplified_samples_stay_in_range() {
        assert_relative_eq!(amplify(0.5, 0.25), 0.125);
        assert!(amplify(0.9, 2.25) < 1.0);
        assert_relative_eq!(amplify(-0.9, 2.25), -1.0);
    }

    #[test]
    fn missing_file_is_reported() {
        let (_commands_tx, commands_rx) = mpsc::unbounded_channel();
        let result = decode_audio(
            Path::new("/nonexistent/clip.mp4"),
            crate::video_player::clock::PlaybackClock::shared(),
            commands_rx,
            Arc::new(AudioLevel::new(Volume::default())),
        );
        assert!(result.is_err());
    }
}
