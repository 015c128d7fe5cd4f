// SPDX-License-Identifier: MPL-2.0
//! Transport actions and the keyboard shortcut map.
//!
//! The control buttons and the keyboard both produce [`Action`] values, and
//! the application handles every action in one place.

use iced::keyboard::{self, key::Named, Key, Modifiers};

/// User intent shared by the control buttons and the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePlayPause,
    Stop,
    ToggleFullscreen,
    /// Leaves fullscreen; never enters it.
    ExitFullscreen,
    /// Seek backward by the configured step.
    Rewind,
    /// Seek forward by the configured step.
    FastForward,
    VolumeUp,
    VolumeDown,
    Open,
}

/// Maps a key press to an action.
///
/// | Key | Action |
/// |-----|--------|
/// | Space | toggle play/pause |
/// | S | stop |
/// | F | toggle fullscreen |
/// | Escape | exit fullscreen |
/// | Left / Right | rewind / fast-forward |
/// | Up / Down | volume up / down |
/// | Ctrl+O | open file |
pub fn map_key(key: &Key, modifiers: Modifiers) -> Option<Action> {
    match key {
        Key::Named(Named::Space) => Some(Action::TogglePlayPause),
        Key::Named(Named::Escape) => Some(Action::ExitFullscreen),
        Key::Named(Named::ArrowLeft) => Some(Action::Rewind),
        Key::Named(Named::ArrowRight) => Some(Action::FastForward),
        Key::Named(Named::ArrowUp) => Some(Action::VolumeUp),
        Key::Named(Named::ArrowDown) => Some(Action::VolumeDown),
        Key::Character(c) => map_character(c.as_str(), modifiers),
        _ => None,
    }
}

fn map_character(c: &str, modifiers: Modifiers) -> Option<Action> {
    if modifiers.alt() {
        return None;
    }
    if modifiers.command() {
        return c.eq_ignore_ascii_case("o").then_some(Action::Open);
    }
    match c {
        "s" | "S" => Some(Action::Stop),
        "f" | "F" => Some(Action::ToggleFullscreen),
        _ => None,
    }
}

/// Extracts an action from a raw keyboard event.
pub fn action_for_event(event: &keyboard::Event) -> Option<Action> {
    match event {
        keyboard::Event::KeyPressed { key, modifiers, .. } => map_key(key, *modifiers),
        _ => None,
    }
}
