// SPDX-License-Identifier: MPL-2.0
//! End-to-end behavior of the playback core against a scripted engine.

use iced_player::config::{self, Config, GeneralConfig};
use iced_player::error::SourceError;
use iced_player::i18n::fluent::I18n;
use iced_player::ui::state::{ControlsVisibility, OverlayTimeout, VisibilityState};
use iced_player::video_player::{
    format_time, MediaEngine, PlayState, PlaybackSession, SeekState, TickOutcome, Volume,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Load(PathBuf),
    Play,
    Pause,
    Stop,
    SetPosition(Duration),
    SetVolume,
}

#[derive(Debug, Default)]
struct Script {
    commands: Vec<Command>,
    position: Duration,
    duration: Option<Duration>,
    volume: Volume,
}

/// Engine whose position only moves when the test says so. The script is
/// shared so the test can advance the playhead while the session owns the
/// engine.
#[derive(Debug, Clone, Default)]
struct ScriptedEngine(Rc<RefCell<Script>>);

impl ScriptedEngine {
    fn advance_to(&self, position: Duration) {
        self.0.borrow_mut().position = position;
    }

    fn resolve(&self, duration: Duration) {
        self.0.borrow_mut().duration = Some(duration);
    }

    fn count(&self, command: &Command) -> usize {
        self.0
            .borrow()
            .commands
            .iter()
            .filter(|c| *c == command)
            .count()
    }

    fn seeks(&self) -> Vec<Duration> {
        self.0
            .borrow()
            .commands
            .iter()
            .filter_map(|c| match c {
                Command::SetPosition(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn clear_log(&self) {
        self.0.borrow_mut().commands.clear();
    }
}

impl MediaEngine for ScriptedEngine {
    fn load(&mut self, source: &Path) -> Result<(), SourceError> {
        let mut script = self.0.borrow_mut();
        script.commands.push(Command::Load(source.to_path_buf()));
        script.position = Duration::ZERO;
        script.duration = None;
        Ok(())
    }

    fn play(&mut self) {
        self.0.borrow_mut().commands.push(Command::Play);
    }

    fn pause(&mut self) {
        self.0.borrow_mut().commands.push(Command::Pause);
    }

    fn stop(&mut self) {
        let mut script = self.0.borrow_mut();
        script.commands.push(Command::Stop);
        script.position = Duration::ZERO;
    }

    fn position(&self) -> Duration {
        self.0.borrow().position
    }

    fn set_position(&mut self, position: Duration) {
        let mut script = self.0.borrow_mut();
        script.commands.push(Command::SetPosition(position));
        script.position = position;
    }

    fn natural_duration(&self) -> Option<Duration> {
        self.0.borrow().duration
    }

    fn resolve_duration(&mut self, duration: Duration) {
        self.0.borrow_mut().duration = Some(duration);
    }

    fn volume(&self) -> Volume {
        self.0.borrow().volume
    }

    fn set_volume(&mut self, volume: Volume) {
        let mut script = self.0.borrow_mut();
        script.commands.push(Command::SetVolume);
        script.volume = volume;
    }

    fn can_pause(&self) -> bool {
        true
    }
}

type Session = PlaybackSession<ScriptedEngine>;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

/// Session with `clip.mp4` loaded but not yet playing.
fn loaded() -> (Session, ScriptedEngine, u64) {
    let engine = ScriptedEngine::default();
    let mut session = PlaybackSession::new(engine.clone());
    let generation = session
        .load(Path::new("clip.mp4"))
        .expect("scripted engine accepts any source");
    (session, engine, generation)
}

/// Playing session with a known duration, positioned at `at`.
fn playing_at(duration: Duration, at: Duration) -> (Session, ScriptedEngine, u64) {
    let (mut session, engine, generation) = loaded();
    engine.resolve(duration);
    session.play();
    engine.advance_to(at);
    session.tick(generation);
    (session, engine, generation)
}

#[test]
fn format_time_matches_label_format() {
    assert_eq!(format_time(secs(45 * 60 + 5)), "45:05");
    assert_eq!(format_time(secs(3723)), "01:02:03");
    assert_eq!(format_time(Duration::ZERO), "00:00");
}

#[test]
fn sync_tick_projects_position_onto_slider_and_labels() {
    let (mut session, _engine, generation) = playing_at(secs(120), secs(30));

    assert_eq!(session.slider().maximum(), 120.0);
    assert_eq!(session.slider().value(), 30.0);
    assert_eq!(session.labels().elapsed, "00:30");
    assert_eq!(session.labels().remaining, "-01:30");
    assert_eq!(session.seek_state(), SeekState::Idle);
    assert!(matches!(
        session.tick(generation),
        Some(TickOutcome::Projected { .. })
    ));
}

#[test]
fn sync_tick_with_unknown_duration_changes_nothing() {
    let (mut session, engine, generation) = loaded();
    session.play();
    engine.advance_to(secs(4));

    assert_eq!(session.tick(generation), Some(TickOutcome::DurationUnknown));
    assert_eq!(session.slider().value(), 0.0);
    assert_eq!(session.labels().elapsed, "00:00");
}

#[test]
fn programmatic_slider_writes_never_seek_the_engine() {
    let (mut session, engine, generation) = playing_at(secs(300), secs(10));
    engine.clear_log();

    for second in 11..40 {
        engine.advance_to(secs(second));
        session.tick(generation);
    }

    assert!(engine.seeks().is_empty());
    assert_eq!(session.slider().value(), 39.0);
}

#[test]
fn user_drag_owns_the_slider_until_release() {
    let (mut session, engine, generation) = playing_at(secs(300), secs(10));
    engine.clear_log();

    session.seek_press_start();
    session.seek_value_changed(200.0);
    assert_eq!(engine.seeks(), vec![secs(200)]);

    // Playback keeps running and ticks keep arriving mid-drag.
    engine.advance_to(secs(201));
    assert_eq!(session.tick(generation), Some(TickOutcome::Suspended));
    engine.advance_to(secs(202));
    session.tick(generation);
    assert_eq!(session.slider().value(), 200.0);
    assert_eq!(session.seek_state(), SeekState::UserSeeking);

    session.seek_press_end(210.0);
    assert_eq!(session.seek_state(), SeekState::Idle);
    assert_eq!(engine.seeks(), vec![secs(200), secs(210)]);

    engine.advance_to(secs(211));
    session.tick(generation);
    assert_eq!(session.slider().value(), 211.0);
}

#[test]
fn slider_change_outside_a_drag_seeks_once_and_sync_continues() {
    let (mut session, engine, generation) = playing_at(secs(300), secs(10));
    session.pause();
    engine.clear_log();

    session.seek_commit(30.0);
    assert_eq!(engine.seeks(), vec![secs(30)]);
    assert_eq!(session.seek_state(), SeekState::Idle);

    session.seek_relative(10.0);
    session.seek_relative(10.0);
    session.play();
    engine.advance_to(secs(51));
    session.tick(generation);
    engine.advance_to(secs(52));
    session.tick(generation);

    assert_eq!(session.seek_state(), SeekState::Idle);
    assert_eq!(session.slider().value(), 52.0);
    assert_eq!(session.labels().elapsed, "00:52");
}

#[test]
fn toggle_twice_from_idle_plays_then_pauses() {
    let (mut session, engine, _) = loaded();
    engine.resolve(secs(60));
    engine.clear_log();

    session.toggle_play_pause();
    assert_eq!(session.play_state(), PlayState::Playing);
    session.toggle_play_pause();
    assert_eq!(session.play_state(), PlayState::Paused);

    assert_eq!(engine.count(&Command::Play), 1);
    assert_eq!(engine.count(&Command::Pause), 1);
}

#[test]
fn toggle_without_source_is_a_noop() {
    let engine = ScriptedEngine::default();
    let mut session = PlaybackSession::new(engine.clone());

    session.toggle_play_pause();

    assert_eq!(session.play_state(), PlayState::Idle);
    assert_eq!(engine.count(&Command::Play), 0);
}

#[test]
fn rewind_near_start_clamps_to_zero() {
    let (mut session, engine, _) = playing_at(secs(120), secs(5));

    assert_eq!(session.seek_relative(-10.0), Some(Duration::ZERO));
    assert_eq!(engine.seeks(), vec![Duration::ZERO]);
    assert_eq!(session.slider().value(), 0.0);
}

#[test]
fn fast_forward_near_end_clamps_to_duration() {
    let duration = secs(120);
    let (mut session, engine, _) = playing_at(duration, duration - secs(3));

    assert_eq!(session.seek_relative(10.0), Some(duration));
    assert_eq!(engine.seeks(), vec![duration]);
    assert_eq!(session.slider().value(), 120.0);
}

#[test]
fn relative_seek_with_unknown_duration_is_dropped() {
    let (mut session, engine, _) = loaded();
    session.play();

    assert_eq!(session.seek_relative(10.0), None);
    assert!(engine.seeks().is_empty());
}

#[test]
fn reaching_the_end_marks_playback_ended() {
    let (mut session, engine, generation) = playing_at(secs(60), secs(59));

    engine.advance_to(secs(60));
    session.tick(generation);

    assert_eq!(session.play_state(), PlayState::Ended);
    assert_eq!(session.labels().remaining, "-00:00");

    // Playing again restarts from the beginning.
    session.toggle_play_pause();
    assert_eq!(session.play_state(), PlayState::Playing);
    assert_eq!(engine.seeks().last(), Some(&Duration::ZERO));
}

#[test]
fn stop_halts_the_sync_loop() {
    let (mut session, engine, generation) = playing_at(secs(60), secs(20));

    session.stop();

    assert_eq!(session.play_state(), PlayState::Stopped);
    assert!(!session.is_sync_active());
    assert_eq!(engine.count(&Command::Stop), 1);
    assert_eq!(session.tick(generation), None);
}

#[test]
fn second_source_resets_the_session() {
    let (mut session, engine, first) = playing_at(secs(600), secs(300));
    assert_eq!(session.slider().value(), 300.0);

    let second = session
        .open(Path::new("other.mkv"))
        .expect("scripted engine accepts any source");

    assert_ne!(first, second);
    assert_eq!(session.source(), Some(Path::new("other.mkv")));
    assert_eq!(session.media().position, Duration::ZERO);
    assert_eq!(session.media().natural_duration, None);
    assert_eq!(session.slider().value(), 0.0);
    assert_eq!(session.labels().elapsed, "00:00");

    // A tick still in flight for the first source is discarded.
    engine.advance_to(secs(2));
    assert_eq!(session.tick(first), None);
    assert_eq!(session.tick(second), Some(TickOutcome::DurationUnknown));
}

#[test]
fn opening_a_source_forces_the_overlay_visible() {
    let now = Instant::now();
    let mut visibility = ControlsVisibility::new(OverlayTimeout::default());
    visibility.overlay_entered();
    assert_eq!(visibility.state(), VisibilityState::VisibleHovered);

    visibility.force_active(now);

    assert!(visibility.is_counting_down());
    assert!(visibility.check(now + Duration::from_secs(2)));
    assert!(!visibility.is_visible());
}

#[test]
fn hovering_the_overlay_keeps_it_visible() {
    let start = Instant::now();
    let mut visibility = ControlsVisibility::new(OverlayTimeout::new(1_000));

    visibility.pointer_moved(start);
    visibility.overlay_entered();
    assert!(!visibility.check(start + Duration::from_secs(10)));
    assert!(visibility.is_visible());

    let left = start + Duration::from_secs(10);
    visibility.overlay_left(left);
    assert!(!visibility.check(left + Duration::from_millis(500)));
    assert!(visibility.check(left + Duration::from_millis(1_000)));
    assert!(!visibility.is_visible());
}

#[test]
fn volume_is_reapplied_to_each_new_source() {
    let (mut session, engine, _) = loaded();
    session.set_volume(Volume::new(0.7));
    engine.clear_log();

    session
        .load(Path::new("next.webm"))
        .expect("scripted engine accepts any source");

    assert_eq!(engine.count(&Command::SetVolume), 1);
    assert_eq!(session.volume(), Volume::new(0.7));
}

#[test]
fn configured_language_selects_the_bundle() {
    let dir = tempdir().expect("failed to create temp dir");
    let path = dir.path().join("settings.toml");

    let french = Config {
        general: GeneralConfig {
            language: Some("fr".to_string()),
        },
        ..Config::default()
    };
    config::save_to_path(&french, &path).expect("failed to write config");
    let loaded = config::load_from_path(&path).expect("failed to read config");

    let i18n = I18n::new(None, &loaded);
    assert_eq!(i18n.current_locale().to_string(), "fr");

    let overridden = I18n::new(Some("en-US".to_string()), &loaded);
    assert_eq!(overridden.current_locale().to_string(), "en-US");
}
