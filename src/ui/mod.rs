// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! Elm-style "state down, messages up": widgets here only render and emit
//! messages; the `app` module owns the state.
//!
//! - [`video_controls`] - transport bar, seek slider and time labels
//! - [`shortcuts`] - [`shortcuts::Action`] and the keyboard map
//! - [`state`] - overlay visibility and window chrome state machines
//! - [`notifications`] - toast notices
//! - [`styles`] / [`design_tokens`] - styling

pub mod design_tokens;
pub mod notifications;
pub mod shortcuts;
pub mod state;
pub mod styles;
pub mod video_controls;
