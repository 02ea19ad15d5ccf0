//! Durable client-side cache of route priorities.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors from the priority cache file.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// I/O error.
    #[error("Priority cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not a JSON map of id to priority.
    #[error("Priority cache at {path} is corrupt: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Map of route id to last confirmed priority, stored as a single JSON
/// object on disk.
///
/// The backend is the authority; this only remembers positions across runs.
#[derive(Debug, Clone)]
pub struct PriorityCache {
    path: PathBuf,
    priorities: BTreeMap<String, u32>,
}

impl PriorityCache {
    /// An empty cache that will be stored at `path`.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priorities: BTreeMap::new(),
        }
    }

    /// Load the cache. A missing file yields an empty cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::empty(path));
        }

        let content = fs::read_to_string(&path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;
        let priorities = serde_json::from_str(&content).map_err(|source| CacheError::Json {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, priorities })
    }

    /// Load the cache, starting empty if the file is unreadable.
    #[must_use]
    pub fn load_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(path.clone()) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable priority cache");
                Self::empty(path)
            }
        }
    }

    /// Write the cache atomically (temp file, then rename).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let content = serde_json::to_string_pretty(&self.priorities).map_err(|source| {
            CacheError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&temp_path, content).map_err(io_err)?;
        fs::rename(&temp_path, &self.path).map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), entries = self.priorities.len(), "Priority cache saved");
        Ok(())
    }

    /// Cached priority for a route.
    #[must_use]
    pub fn get(&self, pair_id: &str) -> Option<u32> {
        self.priorities.get(pair_id).copied()
    }

    /// Record one priority.
    pub fn set(&mut self, pair_id: impl Into<String>, priority: u32) {
        self.priorities.insert(pair_id.into(), priority);
    }

    /// Replace the whole map with a confirmed assignment.
    pub fn replace_all<I>(&mut self, assignment: I)
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        self.priorities = assignment.into_iter().collect();
    }

    /// Current contents.
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, u32> {
        &self.priorities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }

    /// Location of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
