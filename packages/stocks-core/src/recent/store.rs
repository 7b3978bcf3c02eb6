//! Per-user persistence of recently viewed stocks.

use super::RecentlyViewedCache;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Text files holding each user's recently viewed stocks.
///
/// Files live at `<dir>/<user>.txt` in the format produced by
/// [`RecentlyViewedCache::to_text`].
#[derive(Debug, Clone)]
pub struct RecentlyViewedStore {
    dir: PathBuf,
}

impl RecentlyViewedStore {
    /// Create a store rooted at `dir`. Nothing is created until the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the user files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing the given user's list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUser`] for an id that is empty, a dot segment,
    /// or contains a path separator, so every file stays inside the store.
    pub fn path_for(&self, user: &str) -> Result<PathBuf> {
        if user.is_empty() || user == "." || user == ".." || user.contains(['/', '\\', '\0']) {
            return Err(Error::InvalidUser(user.to_string()));
        }
        Ok(self.dir.join(format!("{}.txt", user)))
    }

    /// Load a user's list. A missing file yields an empty cache.
    pub fn load(&self, user: &str, capacity: usize) -> Result<RecentlyViewedCache> {
        let path = self.path_for(user)?;
        if !path.exists() {
            tracing::info!(path = %path.display(), "no recently viewed stocks stored");
            return RecentlyViewedCache::new(capacity);
        }

        let content = fs::read_to_string(&path)?;
        let cache = RecentlyViewedCache::from_text(&content, capacity)?;
        tracing::info!(path = %path.display(), entries = cache.len(), "loaded recently viewed stocks");
        Ok(cache)
    }

    /// Save a user's list, replacing the previous file.
    ///
    /// An empty cache is not written, so an earlier non-empty file survives.
    /// Returns whether a file was written.
    pub fn save(&self, user: &str, cache: &RecentlyViewedCache) -> Result<bool> {
        let path = self.path_for(user)?;
        if cache.is_empty() {
            tracing::info!(path = %path.display(), "recently viewed list empty, skipping save");
            return Ok(false);
        }

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, cache.to_text())?;
        tracing::info!(path = %path.display(), entries = cache.len(), "saved recently viewed stocks");
        Ok(true)
    }
}
