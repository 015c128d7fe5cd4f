// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! User-facing strings (button tooltips, notices) are resolved through Fluent
//! bundles embedded in the binary.
//!
//! # Features
//!
//! - Automatic locale detection from CLI, config, or system settings
//! - Fallback to `en-US` when a locale is unavailable

pub mod fluent;
