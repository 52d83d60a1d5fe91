//! Per-package language resolution.
//!
//! A [`LanguageResolver`] commits a package to a single language when it is
//! constructed and later hands that language's twee files to a
//! [`ContentLoader`].

use crate::diagnostics::DiagnosticSink;
use crate::i18n::matcher::best_prefix_match;
use crate::i18n::params::LanguageConfig;
use crate::loader::{ContentLoader, LoadError};
use std::fmt;
use std::sync::Arc;

/// Result of a [`LanguageResolver::refresh_content`] call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The resolved language's files were handed to the loader
    Loaded { files: usize },

    /// No entry exists for the resolved language; nothing was loaded
    MissingLanguage,
}

/// Language binding for one package.
pub struct LanguageResolver {
    sink: Arc<dyn DiagnosticSink>,
    package_name: String,
    config: LanguageConfig,
    requested_language: String,
    fallback_language: String,
    resolved_language: String,
}

impl fmt::Debug for LanguageResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageResolver")
            .field("package_name", &self.package_name)
            .field("requested_language", &self.requested_language)
            .field("fallback_language", &self.fallback_language)
            .field("resolved_language", &self.resolved_language)
            .finish_non_exhaustive()
    }
}

impl LanguageResolver {
    /// Bind `package_name` to a language.
    ///
    /// The resolved language is, in order of preference:
    /// 1. `requested_language`, if a declared tag equals it exactly
    /// 2. the best prefix-compatible declared tag, per [`best_prefix_match`]
    /// 3. `fallback_language`, with a warning
    ///
    /// The result is logged and never recomputed.
    pub fn new(
        sink: Arc<dyn DiagnosticSink>,
        package_name: impl Into<String>,
        config: LanguageConfig,
        requested_language: impl Into<String>,
        fallback_language: impl Into<String>,
    ) -> Self {
        let package_name = package_name.into();
        let requested_language = requested_language.into();
        let fallback_language = fallback_language.into();

        let resolved_language = resolve_language(
            sink.as_ref(),
            &package_name,
            &config,
            &requested_language,
            &fallback_language,
        );

        Self {
            sink,
            package_name,
            config,
            requested_language,
            fallback_language,
            resolved_language,
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// The language the host asked for.
    pub fn requested_language(&self) -> &str {
        &self.requested_language
    }

    pub fn fallback_language(&self) -> &str {
        &self.fallback_language
    }

    /// The language this package committed to at construction.
    pub fn resolved_language(&self) -> &str {
        &self.resolved_language
    }

    pub fn config(&self) -> &LanguageConfig {
        &self.config
    }

    /// Load the resolved language's files through `loader`.
    ///
    /// Always asks for a non-destructive refill. If the configuration has no
    /// entry for the resolved language, an error is reported to the sink and
    /// the loader is not called.
    ///
    /// # Errors
    /// Returns the loader's [`LoadError`] unchanged.
    pub async fn refresh_content(
        &self,
        loader: &dyn ContentLoader,
    ) -> Result<RefreshOutcome, LoadError> {
        let Some(entry) = self.config.entry(&self.resolved_language) else {
            self.sink.error(&format!(
                "[I18nTweeList] refreshContent cannot find languageFile for resolved language. [{}] [{}]",
                self.package_name, self.resolved_language
            ));
            return Ok(RefreshOutcome::MissingLanguage);
        };

        loader.refill(&entry.file_list, false).await?;

        Ok(RefreshOutcome::Loaded {
            files: entry.file_list.len(),
        })
    }
}

fn resolve_language(
    sink: &dyn DiagnosticSink,
    package_name: &str,
    config: &LanguageConfig,
    requested: &str,
    fallback: &str,
) -> String {
    let languages = config.languages();

    let matched = if languages.iter().any(|l| *l == requested) {
        Some(requested.to_string())
    } else {
        best_prefix_match(requested, &languages).map(|m| m.value.to_string())
    };

    let resolved = match matched {
        Some(language) => language,
        None => {
            let declared = serde_json::to_string(&languages).unwrap_or_default();
            sink.warn(&format!(
                "[I18nTweeList] calcMainLanguage cannot calc main language, use fallback language. [{}] [{}] [{}]",
                package_name, fallback, declared
            ));
            fallback.to_string()
        }
    };

    sink.log(&format!(
        "[I18nTweeList] calcMainLanguage mod[{}] language[{}]",
        package_name, resolved
    ));
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Level, RecordingSink};
    use crate::i18n::params::LanguageEntry;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Loader that records every call and optionally fails.
    #[derive(Default)]
    struct MockLoader {
        calls: Mutex<Vec<(Vec<String>, bool)>>,
        fail: bool,
    }

    impl MockLoader {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(Vec<String>, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentLoader for MockLoader {
        async fn refill(&self, files: &[String], destructive: bool) -> Result<(), LoadError> {
            self.calls.lock().unwrap().push((files.to_vec(), destructive));
            if self.fail {
                return Err(LoadError::Rejected("archive unreadable".into()));
            }
            Ok(())
        }
    }

    fn config(main: &str, languages: &[&str]) -> LanguageConfig {
        LanguageConfig {
            main_language: main.to_string(),
            entries: languages
                .iter()
                .map(|l| LanguageEntry {
                    language: l.to_string(),
                    file_list: vec![format!("{}/a.twee", l), format!("{}/b.twee", l)],
                })
                .collect(),
        }
    }

    fn resolver(
        sink: &Arc<RecordingSink>,
        languages: &[&str],
        requested: &str,
        fallback: &str,
    ) -> LanguageResolver {
        LanguageResolver::new(
            sink.clone(),
            "TestMod",
            config(fallback, languages),
            requested,
            fallback,
        )
    }

    // ==================== Resolution ====================

    #[test]
    fn test_exact_match() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["en", "zh-CN"], "zh-CN", "en");
        assert_eq!(r.resolved_language(), "zh-CN");
        assert_eq!(sink.count(Level::Warn), 0);
    }

    #[test]
    fn test_exact_match_beats_longer_prefix_candidate() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["en-US", "en"], "en", "zh");
        assert_eq!(r.resolved_language(), "en");
    }

    #[test]
    fn test_prefix_match() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["en", "zh-CN"], "zh", "en");
        assert_eq!(r.resolved_language(), "zh-CN");
        assert_eq!(sink.count(Level::Warn), 0);
    }

    #[test]
    fn test_prefix_match_tie_prefers_first_declared() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["zh-TW", "zh-CN"], "zh", "en");
        assert_eq!(r.resolved_language(), "zh-TW");
    }

    #[test]
    fn test_prefix_match_nested_tags_takes_later_prefix() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["zh-CN", "zh"], "zh-CN-Hans", "en");
        assert_eq!(r.resolved_language(), "zh");
        assert_eq!(sink.count(Level::Warn), 0);
    }

    #[test]
    fn test_fallback_with_single_warning() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["en", "zh-CN"], "fr-FR", "en");

        assert_eq!(r.resolved_language(), "en");
        assert_eq!(sink.count(Level::Warn), 1);
        let warning = &sink.messages(Level::Warn)[0];
        assert!(warning.contains("TestMod"));
        assert!(warning.contains("[en]"));
        assert!(warning.contains(r#"["en","zh-CN"]"#));
    }

    #[test]
    fn test_result_always_logged_once() {
        let sink = Arc::new(RecordingSink::new());
        resolver(&sink, &["en"], "en", "en");
        resolver(&sink, &["en"], "fr", "en");

        let logs = sink.messages(Level::Log);
        assert_eq!(logs.len(), 2);
        assert!(logs
            .iter()
            .all(|m| m.contains("mod[TestMod]") && m.contains("language[en]")));
    }

    #[test]
    fn test_accessors() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["en"], "en-GB", "en");
        assert_eq!(r.package_name(), "TestMod");
        assert_eq!(r.requested_language(), "en-GB");
        assert_eq!(r.fallback_language(), "en");
        assert_eq!(r.resolved_language(), "en");
        assert_eq!(r.config().entries.len(), 1);
        assert!(format!("{:?}", r).contains("en-GB"));
    }

    // ==================== Refresh ====================

    #[tokio::test]
    async fn test_refresh_loads_resolved_files_non_destructively() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["en", "zh-CN"], "zh", "en");
        let loader = MockLoader::default();

        let outcome = r.refresh_content(&loader).await.unwrap();

        assert_eq!(outcome, RefreshOutcome::Loaded { files: 2 });
        assert_eq!(
            loader.calls(),
            vec![(
                vec!["zh-CN/a.twee".to_string(), "zh-CN/b.twee".to_string()],
                false
            )]
        );
    }

    #[tokio::test]
    async fn test_refresh_twice_loads_twice_without_changing_language() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["en", "zh-CN"], "zh-CN", "en");
        let loader = MockLoader::default();

        r.refresh_content(&loader).await.unwrap();
        r.refresh_content(&loader).await.unwrap();

        let calls = loader.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(r.resolved_language(), "zh-CN");
        // Resolution logged once, at construction
        assert_eq!(sink.count(Level::Log), 1);
    }

    #[tokio::test]
    async fn test_refresh_missing_language_reports_error_and_skips_loader() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["en", "zh-CN"], "fr", "de");
        let loader = MockLoader::default();

        let outcome = r.refresh_content(&loader).await.unwrap();

        assert_eq!(outcome, RefreshOutcome::MissingLanguage);
        assert!(loader.calls().is_empty());
        let errors = sink.messages(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("[TestMod] [de]"));
    }

    #[tokio::test]
    async fn test_refresh_with_no_entries_falls_back_and_skips() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &[], "en", "en");
        let loader = MockLoader::default();

        assert_eq!(r.resolved_language(), "en");
        assert_eq!(sink.count(Level::Warn), 1);
        assert_eq!(
            r.refresh_content(&loader).await.unwrap(),
            RefreshOutcome::MissingLanguage
        );
        assert!(loader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_propagates_loader_failure() {
        let sink = Arc::new(RecordingSink::new());
        let r = resolver(&sink, &["en"], "en", "en");
        let loader = MockLoader::failing();

        let err = r.refresh_content(&loader).await.unwrap_err();

        assert!(matches!(err, LoadError::Rejected(ref m) if m == "archive unreadable"));
        assert_eq!(loader.calls().len(), 1);
        assert_eq!(sink.count(Level::Error), 0);
    }
}
