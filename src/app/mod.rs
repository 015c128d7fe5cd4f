// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration.
//!
//! The `App` struct wires the playback session, the controls overlay, window
//! chrome, localization and notices together, and translates messages into
//! calls on them.

mod message;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::config;
use crate::i18n::fluent::I18n;
use crate::ui::notifications::{self, Notification};
use crate::ui::state::{ChromeController, ControlsVisibility, OverlayTimeout};
use crate::video_player::{
    FfmpegEngine, PlaybackSession, SeekState, SeekStep, SyncInterval, Volume,
};
use iced::widget::image;
use iced::{window, Element, Size, Subscription, Task, Theme};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    session: PlaybackSession<FfmpegEngine>,
    /// Latest decoded picture of the current source.
    frame: Option<image::Handle>,
    /// Primary mouse button is held; a slider change then belongs to a drag.
    primary_pressed: bool,
    visibility: ControlsVisibility,
    chrome: ChromeController,
    window_id: Option<window::Id>,
    /// Last windowed size, restored when leaving fullscreen.
    window_size: Option<Size>,
    seek_step: SeekStep,
    sync_interval: SyncInterval,
    last_open_directory: Option<PathBuf>,
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("source", &self.session.source())
            .field("play_state", &self.session.play_state())
            .field("fullscreen", &self.chrome.is_fullscreen())
            .finish()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 540;
pub const WINDOW_DEFAULT_WIDTH: u32 = 960;
pub const MIN_WINDOW_HEIGHT: u32 = 360;
pub const MIN_WINDOW_WIDTH: u32 = 640;

/// Builds the window settings.
///
/// Close requests are handled by the app so the volume can be saved first.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(Size::new(MIN_WINDOW_WIDTH as f32, MIN_WINDOW_HEIGHT as f32)),
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires a Fn boot closure; flags are consumed on first call
    let boot_state = RefCell::new(Some(flags));
    let boot = move || App::new(boot_state.borrow_mut().take().unwrap_or_default());

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl Default for App {
    fn default() -> Self {
        Self {
            i18n: I18n::default(),
            session: PlaybackSession::default(),
            frame: None,
            primary_pressed: false,
            visibility: ControlsVisibility::default(),
            chrome: ChromeController::new(),
            window_id: None,
            window_size: None,
            seek_step: SeekStep::default(),
            sync_interval: SyncInterval::default(),
            last_open_directory: None,
            notifications: notifications::Manager::new(),
        }
    }
}

impl App {
    /// Initializes application state from the config file and CLI flags, and
    /// opens the file given on the command line, if any.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        config::paths::init_cli_override(flags.config_dir.clone());
        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), &config);

        let mut app = App {
            i18n,
            seek_step: config
                .playback
                .seek_step_secs
                .map(SeekStep::new)
                .unwrap_or_default(),
            sync_interval: config
                .playback
                .sync_interval_ms
                .map(SyncInterval::new)
                .unwrap_or_default(),
            visibility: ControlsVisibility::new(
                config
                    .overlay
                    .timeout_ms
                    .map(OverlayTimeout::new)
                    .unwrap_or_default(),
            ),
            ..Self::default()
        };

        if let Some(volume) = config.playback.volume {
            app.session.set_volume(Volume::new(volume));
        }

        if let Some(key) = config_warning {
            app.notifications.push(Notification::warning(key));
        }

        tracing::info!(locale = %app.i18n.current_locale(), "starting");

        let task = match flags.file_path {
            Some(path) => app.update(Message::FileDropped(PathBuf::from(path))),
            None => Task::none(),
        };

        (app, task)
    }

    fn title(&self) -> String {
        match self.session.source().and_then(|p| p.file_name()) {
            Some(name) => {
                let name = name.to_string_lossy();
                self.i18n
                    .tr_with_args("window-title-with-file", &[("file", name.as_ref())])
            }
            None => self.i18n.tr("window-title"),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        let event_sub = subscription::create_event_subscription();
        let sync_sub = subscription::create_sync_subscription(
            self.session.is_sync_active(),
            self.session.generation(),
            self.sync_interval,
        );
        let tick_sub = subscription::create_tick_subscription(
            self.visibility.is_counting_down(),
            self.notifications.has_notifications(),
        );
        let playback_sub = subscription::create_playback_subscription(
            self.session.has_source(),
            self.session.generation(),
            self.session.engine().event_feed(),
        );

        Subscription::batch([event_sub, sync_sub, tick_sub, playback_sub])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let mut ctx = update::UpdateContext {
            session: &mut self.session,
            frame: &mut self.frame,
            primary_pressed: self.primary_pressed,
            visibility: &mut self.visibility,
            chrome: &mut self.chrome,
            window_id: &mut self.window_id,
            window_size: &mut self.window_size,
            seek_step: self.seek_step,
            notifications: &mut self.notifications,
            last_open_directory: &mut self.last_open_directory,
        };

        match message {
            Message::Controls(controls_message) => {
                update::handle_controls_message(&mut ctx, controls_message)
            }
            Message::Action(action) => update::handle_action(&mut ctx, action),
            Message::Notification(notification_message) => {
                self.notifications.handle_message(&notification_message);
                Task::none()
            }
            Message::SyncTick(generation) => {
                self.session.tick(generation);
                Task::none()
            }
            Message::Tick(now) => {
                // The slider leaves the tree with the overlay and never
                // reports the release of a drag in progress.
                if self.visibility.check(now)
                    && self.session.seek_state() == SeekState::UserSeeking
                {
                    self.session.seek_release();
                }
                self.notifications.tick(now);
                Task::none()
            }
            Message::PrimaryButton { pressed } => {
                update::handle_primary_button(&mut ctx, pressed);
                self.primary_pressed = pressed;
                Task::none()
            }
            Message::PointerMoved => {
                self.visibility.pointer_moved(Instant::now());
                Task::none()
            }
            Message::OverlayEntered => {
                self.visibility.overlay_entered();
                Task::none()
            }
            Message::OverlayExited => {
                self.visibility.overlay_left(Instant::now());
                Task::none()
            }
            Message::OpenFileDialogResult(Some(path)) | Message::FileDropped(path) => {
                update::open_path(&mut ctx, path)
            }
            Message::OpenFileDialogResult(None) => Task::none(),
            Message::Engine { generation, event } => {
                update::handle_engine_event(&mut ctx, generation, event)
            }
            Message::WindowResized { id, size } => {
                update::handle_window_resized(&mut ctx, id, size);
                Task::none()
            }
            Message::WindowCloseRequested(_id) => update::handle_close_requested(&mut ctx),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            session: &self.session,
            frame: self.frame.as_ref(),
            visibility: &self.visibility,
            fullscreen: self.chrome.is_fullscreen(),
            notifications: &self.notifications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::ui::shortcuts::Action;
    use crate::ui::state::VisibilityState;
    use crate::ui::video_controls;
    use crate::video_player::{MediaEngine, PipelineEvent, PlayState, VideoFrame};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn video_fixture(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"fixture").expect("failed to write fixture");
        path
    }

    fn app_with_window() -> App {
        let mut app = App::default();
        let _ = app.update(Message::WindowResized {
            id: window::Id::unique(),
            size: Size::new(800.0, 600.0),
        });
        app
    }

    #[test]
    fn title_shows_app_name_when_nothing_is_open() {
        let app = App::default();
        assert_eq!(app.title(), "Iced Player");
    }

    #[test]
    fn title_shows_file_name_when_open() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "holiday.mp4");
        let mut app = App::default();

        let _ = app.update(Message::FileDropped(path));

        assert_eq!(app.title(), "holiday.mp4 - Iced Player");
    }

    #[test]
    fn dropping_a_video_starts_playback_and_shows_controls() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "clip.mkv");
        let mut app = App::default();

        let _ = app.update(Message::FileDropped(path));

        assert_eq!(app.session.play_state(), PlayState::Playing);
        assert!(app.visibility.is_counting_down());
        assert!(app.session.is_sync_active());
    }

    #[test]
    fn rejected_file_raises_notice_and_stays_idle() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "notes.txt");
        let mut app = App::default();

        let _ = app.update(Message::FileDropped(path));

        assert_eq!(app.session.play_state(), PlayState::Idle);
        assert_eq!(app.notifications.visible_count(), 1);
    }

    fn opened_at(app: &mut App, path: PathBuf, duration: Duration) -> u64 {
        let _ = app.update(Message::FileDropped(path));
        let generation = app.session.generation();
        let _ = app.update(Message::Engine {
            generation,
            event: PipelineEvent::Opened {
                duration: Some(duration),
            },
        });
        generation
    }

    fn tiny_frame() -> VideoFrame {
        VideoFrame {
            rgba: Arc::new(vec![0; 16]),
            width: 2,
            height: 2,
            pts: Duration::ZERO,
        }
    }

    #[test]
    fn decoder_failure_demotes_session() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "broken.mp4");
        let mut app = App::default();
        let _ = app.update(Message::FileDropped(path));
        let generation = app.session.generation();

        let _ = app.update(Message::Engine {
            generation,
            event: PipelineEvent::Failed(SourceError::Corrupted),
        });

        assert!(!app.session.has_source());
        assert!(app.frame.is_none());
        assert_eq!(app.notifications.visible_count(), 1);
    }

    #[test]
    fn opened_duration_enables_relative_seek() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "clip.mp4");
        let mut app = App::default();
        let _ = app.update(Message::FileDropped(path));
        let generation = app.session.generation();
        let _ = app.update(Message::Action(Action::TogglePlayPause));

        let _ = app.update(Message::Engine {
            generation,
            event: PipelineEvent::Opened {
                duration: Some(Duration::from_secs(120)),
            },
        });
        let _ = app.update(Message::Action(Action::FastForward));

        assert!(app.session.media().position >= Duration::from_secs(10));
        assert!(app.session.slider().value() >= 10.0);
    }

    #[test]
    fn frames_of_the_current_source_are_shown() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "clip.mp4");
        let mut app = App::default();
        let stale = opened_at(&mut app, path.clone(), Duration::from_secs(60));
        let current = opened_at(&mut app, path, Duration::from_secs(60));

        let _ = app.update(Message::Engine {
            generation: stale,
            event: PipelineEvent::Frame(tiny_frame()),
        });
        assert!(app.frame.is_none());

        let _ = app.update(Message::Engine {
            generation: current,
            event: PipelineEvent::Frame(tiny_frame()),
        });
        assert!(app.frame.is_some());
    }

    #[test]
    fn opening_a_source_clears_the_previous_frame() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "clip.mp4");
        let mut app = App::default();
        let generation = opened_at(&mut app, path.clone(), Duration::from_secs(60));
        let _ = app.update(Message::Engine {
            generation,
            event: PipelineEvent::Frame(tiny_frame()),
        });

        let _ = app.update(Message::FileDropped(path));

        assert!(app.frame.is_none());
    }

    #[test]
    fn end_of_stream_ends_playback() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "clip.mp4");
        let mut app = App::default();
        let generation = opened_at(&mut app, path, Duration::from_secs(60));

        let _ = app.update(Message::Engine {
            generation,
            event: PipelineEvent::EndOfStream,
        });

        assert_eq!(app.session.play_state(), PlayState::Ended);
    }

    #[test]
    fn slider_drag_owns_position_until_release() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "clip.mp4");
        let mut app = App::default();
        let generation = opened_at(&mut app, path, Duration::from_secs(300));

        let _ = app.update(Message::PrimaryButton { pressed: true });
        let _ = app.update(Message::Controls(video_controls::Message::SeekChanged(90.0)));
        assert_eq!(app.session.seek_state(), SeekState::UserSeeking);

        let _ = app.update(Message::SyncTick(generation));
        assert_eq!(app.session.slider().value(), 90.0);

        let _ = app.update(Message::Controls(video_controls::Message::SeekReleased));
        assert_eq!(app.session.seek_state(), SeekState::Idle);
    }

    #[test]
    fn button_release_ends_a_drag_without_slider_release() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "clip.mp4");
        let mut app = App::default();
        opened_at(&mut app, path, Duration::from_secs(300));
        let _ = app.update(Message::Action(Action::TogglePlayPause));

        let _ = app.update(Message::PrimaryButton { pressed: true });
        let _ = app.update(Message::Controls(video_controls::Message::SeekChanged(75.0)));
        let _ = app.update(Message::PrimaryButton { pressed: false });

        assert_eq!(app.session.seek_state(), SeekState::Idle);
        assert_eq!(app.session.engine().position(), Duration::from_secs(75));
    }

    #[test]
    fn slider_change_without_held_button_never_sticks() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "clip.mp4");
        let mut app = App::default();
        let generation = opened_at(&mut app, path, Duration::from_secs(300));
        let _ = app.update(Message::Action(Action::TogglePlayPause));

        // Arrow key or wheel over the slider: a change with no release.
        let _ = app.update(Message::Controls(video_controls::Message::SeekChanged(30.0)));
        assert_eq!(app.session.seek_state(), SeekState::Idle);

        let _ = app.update(Message::Action(Action::FastForward));
        let _ = app.update(Message::Action(Action::FastForward));
        let _ = app.update(Message::Action(Action::TogglePlayPause));
        let _ = app.update(Message::SyncTick(generation));
        let _ = app.update(Message::SyncTick(generation));

        assert_eq!(app.session.seek_state(), SeekState::Idle);
        assert!(app.session.slider().value() >= 50.0);
        assert!(app.session.media().position >= Duration::from_secs(50));
    }

    #[test]
    fn hiding_the_overlay_mid_drag_commits_the_seek() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = video_fixture(&dir, "clip.mp4");
        let mut app = App::default();
        opened_at(&mut app, path, Duration::from_secs(300));
        let _ = app.update(Message::Action(Action::TogglePlayPause));

        let _ = app.update(Message::PrimaryButton { pressed: true });
        let _ = app.update(Message::Controls(video_controls::Message::SeekChanged(120.0)));
        let _ = app.update(Message::Tick(Instant::now() + Duration::from_secs(30)));

        assert!(!app.visibility.is_visible());
        assert_eq!(app.session.seek_state(), SeekState::Idle);
        assert_eq!(app.session.engine().position(), Duration::from_secs(120));
    }

    #[test]
    fn escape_never_enters_fullscreen() {
        let mut app = app_with_window();
        let _ = app.update(Message::Action(Action::ExitFullscreen));
        assert!(!app.chrome.is_fullscreen());

        let _ = app.update(Message::Action(Action::ToggleFullscreen));
        assert!(app.chrome.is_fullscreen());

        let _ = app.update(Message::Action(Action::ExitFullscreen));
        assert!(!app.chrome.is_fullscreen());
    }

    #[test]
    fn fullscreen_needs_a_known_window() {
        let mut app = App::default();
        let _ = app.update(Message::Action(Action::ToggleFullscreen));
        assert!(!app.chrome.is_fullscreen());
    }

    #[test]
    fn hovering_overlay_suspends_hiding() {
        let mut app = App::default();
        let _ = app.update(Message::PointerMoved);
        let _ = app.update(Message::OverlayEntered);
        let _ = app.update(Message::PointerMoved);

        let _ = app.update(Message::Tick(Instant::now() + Duration::from_secs(30)));

        assert_eq!(app.visibility.state(), VisibilityState::VisibleHovered);
    }

    #[test]
    fn volume_keys_step_volume() {
        let mut app = App::default();
        let before = app.session.volume().value();

        let _ = app.update(Message::Action(Action::VolumeUp));

        assert!(app.session.volume().value() > before);
    }
}
