// SPDX-License-Identifier: MPL-2.0
//! Message handlers for `App::update`.
//!
//! Every transport action, whether it comes from a control button or a
//! keyboard shortcut, goes through [`handle_action`].

use super::Message;
use crate::config;
use crate::ui::notifications::{self, Notification};
use crate::ui::shortcuts::Action;
use crate::ui::state::{ChromeCommand, ChromeController, ControlsVisibility, WindowLayout};
use crate::ui::video_controls;
use crate::video_player::{
    FfmpegEngine, PipelineEvent, PlaybackSession, SeekState, SeekStep, VideoFrame, Volume,
    VIDEO_EXTENSIONS,
};
use iced::widget::image;
use iced::{window, Size, Task};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Mutable view over the application state handed to the handlers.
pub struct UpdateContext<'a> {
    pub session: &'a mut PlaybackSession<FfmpegEngine>,
    /// Latest decoded picture of the current source.
    pub frame: &'a mut Option<image::Handle>,
    /// Primary mouse button is held somewhere in the window.
    pub primary_pressed: bool,
    pub visibility: &'a mut ControlsVisibility,
    pub chrome: &'a mut ChromeController,
    pub window_id: &'a mut Option<window::Id>,
    pub window_size: &'a mut Option<Size>,
    pub seek_step: SeekStep,
    pub notifications: &'a mut notifications::Manager,
    pub last_open_directory: &'a mut Option<PathBuf>,
}

/// Single dispatch point for buttons and keyboard shortcuts.
pub fn handle_action(ctx: &mut UpdateContext<'_>, action: Action) -> Task<Message> {
    match action {
        Action::TogglePlayPause => ctx.session.toggle_play_pause(),
        Action::Stop => ctx.session.stop(),
        Action::Rewind => {
            ctx.session.seek_relative(ctx.seek_step.backward());
        }
        Action::FastForward => {
            ctx.session.seek_relative(ctx.seek_step.forward());
        }
        Action::VolumeUp => {
            let volume = ctx.session.volume().increase();
            ctx.session.set_volume(volume);
        }
        Action::VolumeDown => {
            let volume = ctx.session.volume().decrease();
            ctx.session.set_volume(volume);
        }
        Action::ToggleFullscreen => return toggle_fullscreen(ctx),
        Action::ExitFullscreen => return exit_fullscreen(ctx),
        Action::Open => return open_file_dialog(ctx.last_open_directory.clone()),
    }
    Task::none()
}

pub fn handle_controls_message(
    ctx: &mut UpdateContext<'_>,
    message: video_controls::Message,
) -> Task<Message> {
    match message {
        video_controls::Message::Action(action) => return handle_action(ctx, action),
        video_controls::Message::SeekChanged(value) => {
            // Arrow keys and the wheel change the slider without a release
            // event, so only a held button opens a drag.
            if ctx.primary_pressed {
                if ctx.session.seek_state() != SeekState::UserSeeking {
                    ctx.session.seek_press_start();
                }
                ctx.session.seek_value_changed(value);
            } else {
                ctx.session.seek_commit(value);
            }
        }
        video_controls::Message::SeekReleased => ctx.session.seek_release(),
        video_controls::Message::VolumeChanged(value) => {
            ctx.session.set_volume(Volume::new(value));
        }
    }
    Task::none()
}

/// Opens `path` and starts playback, or surfaces the rejection as a notice.
pub fn open_path(ctx: &mut UpdateContext<'_>, path: PathBuf) -> Task<Message> {
    match ctx.session.open(&path) {
        Ok(generation) => {
            ctx.visibility.force_active(Instant::now());
            ctx.notifications.clear_source_errors();
            *ctx.last_open_directory = path.parent().map(Path::to_path_buf);
            *ctx.frame = None;
            tracing::info!(path = %path.display(), generation, "opened source");
            Task::none()
        }
        Err(error) => {
            ctx.notifications.push(Notification::source_error(&error));
            Task::none()
        }
    }
}

/// Applies decoder output. Events of a replaced source are dropped.
pub fn handle_engine_event(
    ctx: &mut UpdateContext<'_>,
    generation: u64,
    event: PipelineEvent,
) -> Task<Message> {
    if !ctx.session.is_current(generation) {
        tracing::trace!(generation, "discarding stale decoder event");
        return Task::none();
    }

    match event {
        PipelineEvent::Opened { duration } => {
            ctx.session.resolve_duration(generation, duration);
        }
        PipelineEvent::Frame(frame) => *ctx.frame = Some(frame_handle(frame)),
        PipelineEvent::EndOfStream => ctx.session.end_of_stream(generation),
        PipelineEvent::Failed(error) => {
            tracing::warn!(%error, "source could not be decoded");
            ctx.session.fail_source(generation);
            *ctx.frame = None;
            ctx.notifications.push(Notification::source_error(&error));
        }
    }
    Task::none()
}

fn frame_handle(frame: VideoFrame) -> image::Handle {
    let pixels = Arc::try_unwrap(frame.rgba).unwrap_or_else(|shared| shared.as_ref().clone());
    image::Handle::from_rgba(frame.width, frame.height, pixels)
}

/// Tracks the primary button; releasing it ends an open slider drag.
pub fn handle_primary_button(ctx: &mut UpdateContext<'_>, pressed: bool) {
    if !pressed && ctx.session.seek_state() == SeekState::UserSeeking {
        ctx.session.seek_release();
    }
}

pub fn handle_window_resized(ctx: &mut UpdateContext<'_>, id: window::Id, size: Size) {
    *ctx.window_id = Some(id);
    if !ctx.chrome.is_fullscreen() {
        *ctx.window_size = Some(size);
    }
}

fn toggle_fullscreen(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let Some(id) = *ctx.window_id else {
        return Task::none();
    };
    let layout = ctx.window_size.map(|size| WindowLayout {
        width: size.width,
        height: size.height,
    });
    apply_chrome(id, ctx.chrome.toggle(layout))
}

fn exit_fullscreen(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let Some(id) = *ctx.window_id else {
        return Task::none();
    };
    ctx.chrome
        .exit()
        .map_or_else(Task::none, |command| apply_chrome(id, command))
}

fn apply_chrome(id: window::Id, command: ChromeCommand) -> Task<Message> {
    match command {
        ChromeCommand::EnterFullscreen => window::set_mode(id, window::Mode::Fullscreen),
        ChromeCommand::ExitFullscreen { restore } => {
            let windowed = window::set_mode(id, window::Mode::Windowed);
            match restore {
                Some(layout) => {
                    windowed.chain(window::resize(id, Size::new(layout.width, layout.height)))
                }
                None => windowed,
            }
        }
    }
}

/// Shows the native file picker, filtered to supported video files.
pub fn open_file_dialog(last_directory: Option<PathBuf>) -> Task<Message> {
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new().add_filter("Video", VIDEO_EXTENSIONS);

            if let Some(dir) = last_directory {
                if dir.exists() {
                    dialog = dialog.set_directory(&dir);
                }
            }

            dialog.pick_file().await.map(|h| h.path().to_path_buf())
        },
        Message::OpenFileDialogResult,
    )
}

/// Saves the current volume and exits.
///
/// An unreadable settings file is kept as is rather than replaced by defaults.
pub fn handle_close_requested(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    if let Err(error) = config::persist_volume(ctx.session.volume().value()) {
        tracing::warn!(%error, "could not persist volume");
    }
    iced::exit()
}
