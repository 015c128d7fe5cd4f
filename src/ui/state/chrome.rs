// SPDX-License-Identifier: MPL-2.0
//! Window chrome state: windowed or fullscreen.
//!
//! The windowed layout is captured when entering fullscreen and handed back on
//! exit so the window can be restored to where it was.

/// Windowed size to restore when leaving fullscreen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLayout {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ChromeState {
    #[default]
    Windowed,
    Fullscreen { saved: Option<WindowLayout> },
}

/// Window mode change the application must apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChromeCommand {
    EnterFullscreen,
    ExitFullscreen { restore: Option<WindowLayout> },
}

#[derive(Debug, Clone, Default)]
pub struct ChromeController {
    state: ChromeState,
}

impl ChromeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChromeState {
        self.state
    }

    pub fn is_fullscreen(&self) -> bool {
        matches!(self.state, ChromeState::Fullscreen { .. })
    }

    /// Switches mode. `current` is the windowed layout at the time of the
    /// call, used only when entering fullscreen.
    pub fn toggle(&mut self, current: Option<WindowLayout>) -> ChromeCommand {
        match self.state {
            ChromeState::Windowed => {
                self.state = ChromeState::Fullscreen { saved: current };
                ChromeCommand::EnterFullscreen
            }
            ChromeState::Fullscreen { saved } => {
                self.state = ChromeState::Windowed;
                ChromeCommand::ExitFullscreen { restore: saved }
            }
        }
    }

    /// Leaves fullscreen. Never enters it.
    pub fn exit(&mut self) -> Option<ChromeCommand> {
        match self.state {
            ChromeState::Windowed => None,
            ChromeState::Fullscreen { saved } => {
                self.state = ChromeState::Windowed;
                Some(ChromeCommand::ExitFullscreen { restore: saved })
            }
        }
    }
}
