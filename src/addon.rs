//! The `I18nTweeList` addon plugin.
//!
//! Packages opt in by declaring an `I18nTweeListAddon` entry in their
//! descriptor. Each valid package gets its own [`LanguageResolver`]; before
//! the host applies package content, every resolver refreshes its files in
//! registration order.

use crate::diagnostics::DiagnosticSink;
use crate::i18n::{LanguageConfig, LanguageResolver, ParamsError, RefreshOutcome};
use crate::loader::{ContentLoader, LoadError};
use crate::package::PackageDescriptor;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Supplies the host's active language.
pub trait LanguageProvider: Send + Sync {
    fn active_language(&self) -> String;
}

/// Provider that always returns the same language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLanguage(pub String);

impl LanguageProvider for FixedLanguage {
    fn active_language(&self) -> String {
        self.0.clone()
    }
}

impl<F> LanguageProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn active_language(&self) -> String {
        self()
    }
}

/// Why a package was not registered.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("package `{package}` does not declare an I18nTweeListAddon")]
    MissingAddon { package: String },

    #[error("package `{package}` has invalid I18nTweeListAddon params: {source}")]
    InvalidParams {
        package: String,
        #[source]
        source: ParamsError,
    },

    #[error("package `{package}` is already registered")]
    DuplicatePackage { package: String },
}

/// Packages whose content load failed during a refresh pass.
#[derive(Debug, Error)]
#[error("{} package(s) failed to refresh: {}", .failures.len(), package_list(.failures))]
pub struct RefreshError {
    pub failures: Vec<(String, LoadError)>,
}

fn package_list(failures: &[(String, LoadError)]) -> String {
    failures
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// What happened to each package during a successful refresh pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Packages whose files were loaded
    pub loaded: Vec<String>,

    /// Packages skipped because their resolved language had no entry
    pub skipped: Vec<String>,
}

/// A registered package and everything needed to refresh it.
pub struct PackageRecord {
    pub descriptor: PackageDescriptor,
    pub resolver: LanguageResolver,
    loader: Arc<dyn ContentLoader>,
}

/// The plugin: one resolver per registered package.
pub struct I18nTweeList {
    sink: Arc<dyn DiagnosticSink>,
    languages: Box<dyn LanguageProvider>,
    records: Vec<PackageRecord>,
    by_name: HashMap<String, usize>,
}

impl I18nTweeList {
    pub fn new(sink: Arc<dyn DiagnosticSink>, languages: impl LanguageProvider + 'static) -> Self {
        Self {
            sink,
            languages: Box::new(languages),
            records: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a package if it declares valid language params.
    ///
    /// Rejected packages are reported to the sink and skipped; the error is
    /// returned for callers that want to count them.
    pub fn register_package(
        &mut self,
        descriptor: PackageDescriptor,
        loader: Arc<dyn ContentLoader>,
    ) -> Result<(), RegisterError> {
        let package = descriptor.name.clone();

        let Some(addon) = descriptor.language_addon() else {
            self.sink.error(&format!(
                "[I18nTweeList] cannot find I18nTweeListAddon {}",
                package
            ));
            return Err(RegisterError::MissingAddon { package });
        };

        let config = match LanguageConfig::from_value(&addon.params) {
            Ok(config) => config,
            Err(source) => {
                self.sink.error(&format!(
                    "[I18nTweeList] I18nTweeListAddon params invalid {}: {}",
                    package, source
                ));
                return Err(RegisterError::InvalidParams { package, source });
            }
        };

        if self.by_name.contains_key(&package) {
            self.sink.error(&format!(
                "[I18nTweeList] package already registered {}",
                package
            ));
            return Err(RegisterError::DuplicatePackage { package });
        }

        let fallback = config.main_language.clone();
        let resolver = LanguageResolver::new(
            self.sink.clone(),
            package.clone(),
            config,
            self.languages.active_language(),
            fallback,
        );

        self.by_name.insert(package, self.records.len());
        self.records.push(PackageRecord {
            descriptor,
            resolver,
            loader,
        });
        Ok(())
    }

    /// Refresh every registered package, one at a time, in registration order.
    ///
    /// A failing package does not stop the pass.
    ///
    /// # Errors
    /// After all packages were attempted, returns [`RefreshError`] listing
    /// every package whose loader failed.
    pub async fn before_patch_mod_to_game(&self) -> Result<RefreshSummary, RefreshError> {
        let mut summary = RefreshSummary::default();
        let mut failures = Vec::new();

        for record in &self.records {
            let name = record.resolver.package_name().to_string();
            match record.resolver.refresh_content(record.loader.as_ref()).await {
                Ok(RefreshOutcome::Loaded { .. }) => summary.loaded.push(name),
                Ok(RefreshOutcome::MissingLanguage) => summary.skipped.push(name),
                Err(e) => {
                    self.sink.error(&format!(
                        "[I18nTweeList] refreshContent failed [{}]: {}",
                        name, e
                    ));
                    failures.push((name, e));
                }
            }
        }

        if failures.is_empty() {
            Ok(summary)
        } else {
            Err(RefreshError { failures })
        }
    }

    /// Resolver of the package named `name`.
    pub fn resolver(&self, name: &str) -> Option<&LanguageResolver> {
        self.by_name.get(name).map(|&i| &self.records[i].resolver)
    }

    /// Registered packages in registration order.
    pub fn packages(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
