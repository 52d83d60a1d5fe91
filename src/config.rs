use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Packages
    pub mods_dir: PathBuf,
    pub boot_file: String,

    // Active language requested from every package
    pub language: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let language = match std::env::var("I18N_LANGUAGE") {
            Ok(v) => v.trim().to_string(),
            // Fall back to the POSIX locale, e.g. LANG=zh_CN.UTF-8
            Err(_) => std::env::var("LANG")
                .ok()
                .and_then(|v| locale_language(&v))
                .unwrap_or_else(|| "en".to_string()),
        };
        if language.is_empty() {
            bail!("I18N_LANGUAGE must not be empty");
        }

        Ok(Self {
            mods_dir: std::env::var("I18N_MODS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("mods")),
            boot_file: std::env::var("I18N_BOOT_FILE")
                .unwrap_or_else(|_| "boot.json".to_string()),
            language,
        })
    }
}

/// Language part of a POSIX locale string (`zh_CN.UTF-8@euro` -> `zh_CN`).
///
/// Returns `None` for empty values and the `C`/`POSIX` locales.
fn locale_language(locale: &str) -> Option<String> {
    let language = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    match language {
        "" | "C" | "POSIX" => None,
        _ => Some(language.to_string()),
    }
}
