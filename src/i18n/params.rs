//! Per-package language configuration and its validation.
//!
//! Addon params arrive as untyped JSON from a package's `boot.json`. They are
//! checked field by field and turned into a [`LanguageConfig`] only when the
//! whole shape is valid.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One localization declared by a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// Language tag (e.g., "en", "zh-CN")
    pub language: String,

    /// Twee files for this language, in load order
    #[serde(rename = "tweeFileList")]
    pub file_list: Vec<String>,
}

/// Language configuration declared once per package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Tag used when the requested language matches nothing
    #[serde(rename = "mainLanguage")]
    pub main_language: String,

    /// Declared localizations, in declaration order
    #[serde(rename = "languageFile")]
    pub entries: Vec<LanguageEntry>,
}

/// Reasons addon params fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("params must be an object")]
    NotAnObject,

    #[error("`{0}` is missing")]
    Missing(String),

    #[error("`{0}` must be a string")]
    NotAString(String),

    #[error("`{0}` must be an array")]
    NotAnArray(String),

    #[error("`{0}` must be an object")]
    EntryNotAnObject(String),
}

impl LanguageConfig {
    /// Validate untyped addon params and build a `LanguageConfig`.
    ///
    /// Accepted shape:
    /// `{ "mainLanguage": string, "languageFile": [{ "language": string, "tweeFileList": [string] }] }`.
    /// An empty `languageFile` array is allowed. Unknown keys are ignored.
    ///
    /// # Errors
    /// Returns the first [`ParamsError`] found, with the JSON path of the
    /// offending field.
    pub fn from_value(params: &Value) -> Result<Self, ParamsError> {
        let object = params.as_object().ok_or(ParamsError::NotAnObject)?;

        let main_language = require_str(object.get("mainLanguage"), "mainLanguage")?;

        let files = object
            .get("languageFile")
            .ok_or_else(|| ParamsError::Missing("languageFile".to_string()))?
            .as_array()
            .ok_or_else(|| ParamsError::NotAnArray("languageFile".to_string()))?;

        let mut entries = Vec::with_capacity(files.len());
        for (i, item) in files.iter().enumerate() {
            let path = format!("languageFile[{}]", i);
            let item = item
                .as_object()
                .ok_or_else(|| ParamsError::EntryNotAnObject(path.clone()))?;

            let list_path = format!("{}.tweeFileList", path);
            let list = item
                .get("tweeFileList")
                .ok_or_else(|| ParamsError::Missing(list_path.clone()))?
                .as_array()
                .ok_or_else(|| ParamsError::NotAnArray(list_path.clone()))?;
            let file_list = list
                .iter()
                .enumerate()
                .map(|(j, f)| require_str(Some(f), &format!("{}[{}]", list_path, j)))
                .collect::<Result<Vec<_>, _>>()?;

            let language = require_str(item.get("language"), &format!("{}.language", path))?;

            entries.push(LanguageEntry {
                language,
                file_list,
            });
        }

        Ok(Self {
            main_language,
            entries,
        })
    }

    /// Declared language tags in declaration order.
    pub fn languages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.language.as_str()).collect()
    }

    /// Find the entry whose tag equals `language` exactly.
    pub fn entry(&self, language: &str) -> Option<&LanguageEntry> {
        self.entries.iter().find(|e| e.language == language)
    }
}

fn require_str(value: Option<&Value>, path: &str) -> Result<String, ParamsError> {
    match value {
        None => Err(ParamsError::Missing(path.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ParamsError::NotAString(path.to_string())),
    }
}
