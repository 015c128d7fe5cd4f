// SPDX-License-Identifier: MPL-2.0
//! UI state management modules
//!
//! State machines that sit between raw window events and the view, kept
//! separate from the main App struct.

pub mod chrome;
pub mod controls_visibility;
pub mod overlay_timeout;

// Re-export commonly used types for convenience
pub use chrome::{ChromeCommand, ChromeController, ChromeState, WindowLayout};
pub use controls_visibility::{ControlsVisibility, VisibilityState};
pub use overlay_timeout::OverlayTimeout;
