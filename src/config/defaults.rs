// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Volume**: Audio playback volume settings
//! - **Seek**: Keyboard seek step bounds
//! - **Sync**: Position sync loop interval
//! - **Overlay**: Controls overlay auto-hide timeout

// ==========================================================================
// Volume Defaults
// ==========================================================================

/// Default playback volume (0.0 to 1.0).
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Minimum volume level.
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum volume level.
pub const MAX_VOLUME: f32 = 1.0;

/// Volume adjustment step per key press (5%).
pub const VOLUME_STEP: f32 = 0.05;

// ==========================================================================
// Seek Defaults
// ==========================================================================

/// Default seek step for the rewind/fast-forward shortcuts (in seconds).
pub const DEFAULT_SEEK_STEP_SECS: f64 = 10.0;

/// Minimum seek step (in seconds).
pub const MIN_SEEK_STEP_SECS: f64 = 1.0;

/// Maximum seek step (in seconds).
pub const MAX_SEEK_STEP_SECS: f64 = 60.0;

// ==========================================================================
// Position Sync Defaults
// ==========================================================================

/// Default interval between two position sync ticks (in milliseconds).
pub const DEFAULT_SYNC_INTERVAL_MS: u64 = 500;

/// Minimum sync interval (in milliseconds).
pub const MIN_SYNC_INTERVAL_MS: u64 = 50;

/// Maximum sync interval (in milliseconds).
pub const MAX_SYNC_INTERVAL_MS: u64 = 2_000;

// ==========================================================================
// Overlay/Timeout Defaults
// ==========================================================================

/// Default inactivity period before the controls overlay hides (in milliseconds).
pub const DEFAULT_OVERLAY_TIMEOUT_MS: u64 = 1_000;

/// Minimum overlay timeout (in milliseconds).
pub const MIN_OVERLAY_TIMEOUT_MS: u64 = 500;

/// Maximum overlay timeout (in milliseconds).
pub const MAX_OVERLAY_TIMEOUT_MS: u64 = 30_000;

/// Resolution of the countdown check while the overlay is visible.
pub const OVERLAY_CHECK_INTERVAL_MS: u64 = 100;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Volume validation
    assert!(MIN_VOLUME >= 0.0);
    assert!(MAX_VOLUME > MIN_VOLUME);
    assert!(DEFAULT_VOLUME >= MIN_VOLUME);
    assert!(DEFAULT_VOLUME <= MAX_VOLUME);
    assert!(VOLUME_STEP > 0.0);

    // Seek step validation
    assert!(MIN_SEEK_STEP_SECS > 0.0);
    assert!(MAX_SEEK_STEP_SECS >= MIN_SEEK_STEP_SECS);
    assert!(DEFAULT_SEEK_STEP_SECS >= MIN_SEEK_STEP_SECS);
    assert!(DEFAULT_SEEK_STEP_SECS <= MAX_SEEK_STEP_SECS);

    // Sync interval validation
    assert!(MIN_SYNC_INTERVAL_MS > 0);
    assert!(MAX_SYNC_INTERVAL_MS >= MIN_SYNC_INTERVAL_MS);
    assert!(DEFAULT_SYNC_INTERVAL_MS >= MIN_SYNC_INTERVAL_MS);
    assert!(DEFAULT_SYNC_INTERVAL_MS <= MAX_SYNC_INTERVAL_MS);

    // Overlay timeout validation
    assert!(MIN_OVERLAY_TIMEOUT_MS > 0);
    assert!(MAX_OVERLAY_TIMEOUT_MS >= MIN_OVERLAY_TIMEOUT_MS);
    assert!(DEFAULT_OVERLAY_TIMEOUT_MS >= MIN_OVERLAY_TIMEOUT_MS);
    assert!(DEFAULT_OVERLAY_TIMEOUT_MS <= MAX_OVERLAY_TIMEOUT_MS);
    assert!(OVERLAY_CHECK_INTERVAL_MS < MIN_OVERLAY_TIMEOUT_MS);
};
