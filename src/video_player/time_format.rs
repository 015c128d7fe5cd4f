// SPDX-License-Identifier: MPL-2.0
//! Time label formatting for the controls overlay.

use std::time::Duration;

/// Formats a duration as `MM:SS`, or `HH:MM:SS` once it reaches one hour.
///
/// Sub-second precision is truncated, matching what a slider position label
/// should show while playback advances.
///
/// # Examples
///
/// ```
/// use iced_player::video_player::time_format::format_time;
/// use std::time::Duration;
///
/// assert_eq!(format_time(Duration::from_secs(45 * 60 + 5)), "45:05");
/// assert_eq!(format_time(Duration::from_secs(3723)), "01:02:03");
/// ```
pub fn format_time(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Formats a remaining-time label, prefixed with a minus sign.
pub fn format_remaining(remaining: Duration) -> String {
    format!("-{}", format_time(remaining))
}

/// Converts slider seconds into a duration, treating negative or non-finite
/// values as zero.
pub fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}
