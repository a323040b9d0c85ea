// File lifecycle - gates dataset operations on whether a file is bound

use crate::core::dataset_store::DatasetStore;
use crate::models::dataset::{CaptureError, CaptureResult};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub enum FileLifecycle {
    /// No dataset file has been created or loaded yet
    #[default]
    Unbound,
    Bound(DatasetStore),
}

/// Result of a transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Bound,
    /// The destructive action was not confirmed; nothing changed
    Declined,
}

impl FileLifecycle {
    /// Replace the active dataset with a fresh, empty file at `path`.
    ///
    /// Overwrites whatever is at `path`, so the caller must pass the user's
    /// explicit confirmation.
    pub fn new_file(&mut self, path: impl Into<PathBuf>, confirmed: bool) -> CaptureResult<LifecycleOutcome> {
        let path = path.into();
        if !confirmed {
            tracing::info!(path = %path.display(), "New dataset declined");
            return Ok(LifecycleOutcome::Declined);
        }

        let store = DatasetStore::create(path)?;
        *self = FileLifecycle::Bound(store);
        Ok(LifecycleOutcome::Bound)
    }

    /// Replace the active dataset with the one parsed from `path`.
    /// On error the current state is kept.
    pub fn load_file(&mut self, path: impl Into<PathBuf>) -> CaptureResult<LifecycleOutcome> {
        let store = DatasetStore::open(path)?;
        *self = FileLifecycle::Bound(store);
        Ok(LifecycleOutcome::Bound)
    }

    pub fn backup(&self, target: &Path) -> CaptureResult<()> {
        match self {
            FileLifecycle::Bound(store) => store.backup(target),
            FileLifecycle::Unbound => Err(CaptureError::NoDataset),
        }
    }

    pub fn bound(&self) -> CaptureResult<&DatasetStore> {
        match self {
            FileLifecycle::Bound(store) => Ok(store),
            FileLifecycle::Unbound => Err(CaptureError::NotBound),
        }
    }

    pub fn bound_mut(&mut self) -> CaptureResult<&mut DatasetStore> {
        match self {
            FileLifecycle::Bound(store) => Ok(store),
            FileLifecycle::Unbound => Err(CaptureError::NotBound),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, FileLifecycle::Bound(_))
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.bound().ok().map(DatasetStore::path)
    }
}
