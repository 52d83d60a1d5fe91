//! Per-package language selection for localized twee content.

pub mod addon;
pub mod config;
pub mod diagnostics;
pub mod i18n;
pub mod loader;
pub mod package;
