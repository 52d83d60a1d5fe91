//! Package descriptors (`boot.json`) and discovery on disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Name of the plugin that owns the language addon
pub const ADDON_MOD_NAME: &str = "I18nTweeList";

/// Name of the addon entry carrying language params
pub const ADDON_NAME: &str = "I18nTweeListAddon";

/// One addon plugin reference declared by a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonPlugin {
    pub mod_name: String,
    pub addon_name: String,
    #[serde(default)]
    pub mod_version: Option<String>,
    /// Untyped params; validated by the addon that consumes them
    #[serde(default)]
    pub params: Value,
}

/// Package descriptor as read from `boot.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub addon_plugin: Vec<AddonPlugin>,
}

impl PackageDescriptor {
    /// Parse a descriptor from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse package descriptor")
    }

    /// The first addon entry that belongs to the language plugin, if any.
    pub fn language_addon(&self) -> Option<&AddonPlugin> {
        self.addon_plugin
            .iter()
            .find(|a| a.mod_name == ADDON_MOD_NAME && a.addon_name == ADDON_NAME)
    }
}

/// Find packages under `dir`.
///
/// Every subdirectory containing `boot_file` is a package. Subdirectories are
/// visited in name order. Descriptors that cannot be read or parsed are logged
/// and skipped.
///
/// # Errors
/// Fails only if `dir` itself cannot be listed.
pub fn discover_packages(dir: &Path, boot_file: &str) -> Result<Vec<(PackageDescriptor, PathBuf)>> {
    let mut roots: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read packages directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    roots.sort();

    let mut packages = Vec::new();
    for root in roots {
        let boot_path = root.join(boot_file);
        if !boot_path.is_file() {
            debug!("Skipping {}: no {}", root.display(), boot_file);
            continue;
        }

        let descriptor = std::fs::read_to_string(&boot_path)
            .with_context(|| format!("Failed to read {}", boot_path.display()))
            .and_then(|json| PackageDescriptor::from_json(&json));

        match descriptor {
            Ok(descriptor) => packages.push((descriptor, root)),
            Err(e) => error!("Skipping package at {}: {:#}", root.display(), e),
        }
    }

    Ok(packages)
}
