// SPDX-License-Identifier: MPL-2.0
//! Centralized styles for the player widgets.

pub mod button;
pub mod overlay;
