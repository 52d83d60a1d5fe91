//! Content loading collaborators.
//!
//! The resolver only decides *which* twee files a package should use. Getting
//! their contents into the host's passage cache is the job of a
//! [`ContentLoader`]. [`DirectoryLoader`] reads files from a package's
//! directory on disk into a shared [`PassageCache`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Errors reported by a content loader.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file `{file}` not found in package")]
    MissingFile { file: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("load rejected: {0}")]
    Rejected(String),
}

/// Loads a list of twee files into the host's passage cache.
#[async_trait]
pub trait ContentLoader: Send + Sync {
    /// Load `files` in order.
    ///
    /// With `destructive == false`, cached passages from files outside the
    /// list are left untouched.
    ///
    /// # Errors
    /// Returns [`LoadError`] when any file cannot be loaded.
    async fn refill(&self, files: &[String], destructive: bool) -> Result<(), LoadError>;
}

/// Passage file contents keyed by package, then by file name.
///
/// Cloning is cheap; clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct PassageCache {
    inner: Arc<RwLock<HashMap<String, HashMap<String, String>>>>,
}

impl PassageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of `file` for `package`, if cached.
    pub async fn get(&self, package: &str, file: &str) -> Option<String> {
        self.inner
            .read()
            .await
            .get(package)
            .and_then(|files| files.get(file))
            .cloned()
    }

    /// Cached file names for `package`, sorted.
    pub async fn files(&self, package: &str) -> Vec<String> {
        let guard = self.inner.read().await;
        let mut names: Vec<String> = guard
            .get(package)
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Total number of cached files across all packages.
    pub async fn len(&self) -> usize {
        self.inner.read().await.values().map(HashMap::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Store `contents` for `file`, replacing any previous contents.
    pub async fn insert(&self, package: &str, file: &str, contents: String) {
        self.inner
            .write()
            .await
            .entry(package.to_string())
            .or_default()
            .insert(file.to_string(), contents);
    }

    /// Drop every cached file of `package`.
    pub async fn clear_package(&self, package: &str) {
        self.inner.write().await.remove(package);
    }
}

/// Loader backed by a package directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    package: String,
    root: PathBuf,
    cache: PassageCache,
}

impl DirectoryLoader {
    /// Create a loader that reads files for `package` relative to `root`.
    pub fn new(package: impl Into<String>, root: impl Into<PathBuf>, cache: PassageCache) -> Self {
        Self {
            package: package.into(),
            root: root.into(),
            cache,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContentLoader for DirectoryLoader {
    async fn refill(&self, files: &[String], destructive: bool) -> Result<(), LoadError> {
        // Read everything first so a failed refill leaves the cache as it was
        let mut loaded = Vec::with_capacity(files.len());
        for file in files {
            if !is_package_relative(file) {
                return Err(LoadError::Rejected(format!(
                    "`{}` escapes the package directory",
                    file
                )));
            }
            let path = self.root.join(file);
            let contents = match tokio::fs::read_to_string(&path).await {
                Ok(contents) => contents,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(LoadError::MissingFile { file: file.clone() });
                }
                Err(source) => return Err(LoadError::Io { path, source }),
            };
            loaded.push((file, contents));
        }

        if destructive {
            self.cache.clear_package(&self.package).await;
        }
        for (file, contents) in loaded {
            self.cache.insert(&self.package, file, contents).await;
        }

        debug!(
            "Refilled {} files for package {} (destructive: {})",
            files.len(),
            self.package,
            destructive
        );
        Ok(())
    }
}

/// Whether `file` stays inside the package root when joined onto it.
fn is_package_relative(file: &str) -> bool {
    Path::new(file)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
