//! Utilities for loading RON files and watching directories for changes.
//!
//! Provides a small helper for reading RON files from disk and a filesystem
//! watcher resource that raises a shared flag when files change. The watcher
//! drives hot-reloading of the settings during development.

use bevy::prelude::{Resource, warn};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Why a single RON file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// File-watcher resource for RON hot-reload.
#[derive(Resource)]
pub struct RonWatcher {
    changed: Arc<AtomicBool>, // Set when a watched file is modified.
    _watcher: Option<RecommendedWatcher>, // Kept alive so the OS watch is not dropped.
}

impl RonWatcher {
    /// Create a stub `RonWatcher` with no OS watcher behind it.
    ///
    /// Useful as a fallback when watcher creation fails; it never reports a change
    /// unless [`RonWatcher::mark_changed`] is called.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(AtomicBool::new(false)),
            _watcher: None,
        }
    }

    /// Consume the pending change, returning whether there was one.
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }

    pub fn mark_changed(&self) {
        self.changed.store(true, Ordering::Release);
    }
}

/// Read and deserialize a single RON file.
///
/// # Errors
/// Returns [`LoadError::Io`] when the file cannot be read and
/// [`LoadError::Parse`] when its contents are not a valid `T`.
pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files are visited in name order. Files that fail to load are skipped
/// with a warning.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();

    paths
        .iter()
        .filter_map(|p| match load_ron_file(p) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("{e}");
                None
            }
        })
        .collect()
}

/// Create a `RonWatcher` that watches a directory for modifications.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file-watcher cannot be
/// created or the watcher cannot be registered for the provided path.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&changed);
    // Canonical form so events can be filtered to the watched directory
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                let relevant = matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_))
                    && event.paths.iter().any(|p| {
                        std::fs::canonicalize(p)
                            .unwrap_or_else(|_| p.clone())
                            .starts_with(&watched_path)
                    });
                if relevant {
                    flag.store(true, Ordering::Release);
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}
