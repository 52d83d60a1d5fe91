//! Language selection for localized package content.
//!
//! A package declares one file list per language tag. At registration the
//! package is bound to a single tag, chosen from the host's active language:
//!
//! - `matcher`: longest prefix-compatible tag lookup
//! - `params`: typed language configuration, validated from untyped JSON
//! - `resolver`: per-package language binding and content refresh
//!
//! # Example
//!
//! ```rust,ignore
//! use i18n_twee_list::i18n::{LanguageConfig, LanguageResolver};
//!
//! let config = LanguageConfig::from_value(&params)?;
//! let resolver = LanguageResolver::new(sink, "MyMod", config, "zh-CN", "en");
//! resolver.refresh_content(&loader).await?;
//! ```

mod matcher;
mod params;
mod resolver;

pub use matcher::{best_prefix_match, PrefixMatch};
pub use params::{LanguageConfig, LanguageEntry, ParamsError};
pub use resolver::{LanguageResolver, RefreshOutcome};
