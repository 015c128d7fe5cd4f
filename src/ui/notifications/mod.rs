// SPDX-License-Identifier: MPL-2.0
//! Toast notices for user feedback.
//!
//! Failures that the user should know about (a rejected source, unreadable
//! settings) are pushed here as i18n keys and rendered as toasts.
//!
//! - [`notification`] - `Notification` and `Severity`
//! - [`manager`] - queue and auto-dismiss
//! - [`toast`] - rendering

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, NotificationId, Severity};
pub use toast::Toast;
