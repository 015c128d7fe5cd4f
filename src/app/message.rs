// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::ui::notifications;
use crate::ui::shortcuts::Action;
use crate::ui::video_controls;
use crate::video_player::PipelineEvent;
use iced::window;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    Controls(video_controls::Message),
    Notification(notifications::NotificationMessage),
    /// A keyboard shortcut or button resolved to an action.
    Action(Action),
    /// Position sync loop tick for the given source generation.
    SyncTick(u64),
    /// Overlay countdown and toast expiry check.
    Tick(Instant),
    /// Pointer activity over the media surface.
    PointerMoved,
    /// The primary mouse button went down or up anywhere in the window.
    PrimaryButton { pressed: bool },
    OverlayEntered,
    OverlayExited,
    /// Result from the open file dialog.
    OpenFileDialogResult(Option<PathBuf>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// Decoder output for the given source generation.
    Engine { generation: u64, event: PipelineEvent },
    /// The main window opened or changed size.
    WindowResized { id: window::Id, size: iced::Size },
    /// Window close was requested (user clicked X or pressed Alt+F4).
    WindowCloseRequested(window::Id),
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional video path to open on startup.
    pub file_path: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_PLAYER_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
}
