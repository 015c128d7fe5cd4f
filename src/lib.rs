// SPDX-License-Identifier: MPL-2.0
//! `iced_player` is a lightweight desktop video player built with the Iced GUI
//! framework.
//!
//! The playback core in [`video_player`] keeps the seek slider, the time
//! labels and the transport state consistent with a media engine whose
//! position advances on its own. The [`ui`] and [`app`] modules wire it to
//! Iced widgets, keyboard shortcuts and window chrome.

#![doc(html_root_url = "https://docs.rs/iced_player/0.1.0")]

pub mod app;
pub mod config;
pub mod error;
pub mod i18n;
pub mod ui;
pub mod video_player;

#[cfg(test)]
pub(crate) mod test_utils;
