// Capture session - owns the active dataset and serializes user actions on it

use crate::core::config::CaptureConfig;
use crate::core::detection_feed::LatestDetection;
use crate::core::lifecycle::{FileLifecycle, LifecycleOutcome};
use crate::core::sample_ingestor::SampleIngestor;
use crate::core::statistics::compute_counts;
use crate::models::dataset::{CaptureResult, LabelStatistics, SignLabel};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::RwLock;

// ==============================================================================
// Actions
// ==============================================================================

/// Actions the UI layer can issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    /// Create an empty dataset at `path`, overwriting it. Requires the user
    /// to have confirmed the overwrite.
    NewDataset { path: PathBuf, confirmed: bool },
    LoadDataset { path: PathBuf },
    Backup,
    Label { code: char },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Bound {
        path: PathBuf,
        statistics: LabelStatistics,
    },
    Declined,
    BackedUp {
        target: PathBuf,
    },
    Labeled {
        label: SignLabel,
        statistics: LabelStatistics,
    },
}

/// Consistent view of the session for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub active_path: Option<PathBuf>,
    pub row_count: usize,
    pub statistics: LabelStatistics,
}

// ==============================================================================
// Session
// ==============================================================================

struct SessionState {
    lifecycle: FileLifecycle,
    statistics: LabelStatistics,
}

pub struct CaptureSession {
    config: CaptureConfig,
    ingestor: SampleIngestor,
    latest: LatestDetection,
    state: RwLock<SessionState>,
}

impl CaptureSession {
    pub fn new(config: CaptureConfig, latest: LatestDetection) -> Self {
        let ingestor = SampleIngestor::new(config.world_landmarks);
        Self {
            config,
            ingestor,
            latest,
            state: RwLock::new(SessionState {
                lifecycle: FileLifecycle::Unbound,
                statistics: LabelStatistics::zeroed(),
            }),
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Route one UI action
    pub async fn dispatch(&self, action: UserAction) -> CaptureResult<ActionOutcome> {
        tracing::debug!(?action, "Dispatching action");
        match action {
            UserAction::NewDataset { path, confirmed } => self.new_dataset(path, confirmed).await,
            UserAction::LoadDataset { path } => self.load_dataset(path).await,
            UserAction::Backup => self.backup().await,
            UserAction::Label { code } => self.label(code).await,
        }
    }

    /// Start a fresh dataset at `path`. Without confirmation nothing changes.
    pub async fn new_dataset(&self, path: impl Into<PathBuf>, confirmed: bool) -> CaptureResult<ActionOutcome> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        match state.lifecycle.new_file(path, confirmed)? {
            LifecycleOutcome::Declined => Ok(ActionOutcome::Declined),
            LifecycleOutcome::Bound => Self::refresh_bound(state),
        }
    }

    /// Replace the active dataset with the one stored at `path`
    pub async fn load_dataset(&self, path: impl Into<PathBuf>) -> CaptureResult<ActionOutcome> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        state.lifecycle.load_file(path)?;
        Self::refresh_bound(state)
    }

    /// Snapshot the active dataset to the configured backup path
    pub async fn backup(&self) -> CaptureResult<ActionOutcome> {
        let state = self.state.read().await;
        let target = self.config.backup_path.clone();

        state.lifecycle.backup(&target)?;
        Ok(ActionOutcome::BackedUp { target })
    }

    /// Record the latest detection under `code`.
    ///
    /// Ingest, append, persist and the statistics refresh all happen under
    /// the write lock, so readers never see the dataset without its counts.
    pub async fn label(&self, code: char) -> CaptureResult<ActionOutcome> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let store = state.lifecycle.bound_mut()?;
        let label = SignLabel::from_code(code)?;
        let detection = self.latest.current()?;
        let row = self.ingestor.ingest(label, &detection)?;

        store.append(row)?;
        state.statistics = compute_counts(store.dataset());

        tracing::info!(
            label = %label,
            count = state.statistics.count(label),
            total = state.statistics.total_rows,
            "Captured sample"
        );

        Ok(ActionOutcome::Labeled {
            label,
            statistics: state.statistics.clone(),
        })
    }

    pub async fn statistics(&self) -> LabelStatistics {
        self.state.read().await.statistics.clone()
    }

    pub async fn active_path(&self) -> Option<PathBuf> {
        self.state
            .read()
            .await
            .lifecycle
            .active_path()
            .map(|p| p.to_path_buf())
    }

    pub async fn row_count(&self) -> Option<usize> {
        self.state.read().await.lifecycle.bound().ok().map(|store| store.len())
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            active_path: state.lifecycle.active_path().map(|p| p.to_path_buf()),
            row_count: state.lifecycle.bound().map(|store| store.len()).unwrap_or(0),
            statistics: state.statistics.clone(),
        }
    }

    fn refresh_bound(state: &mut SessionState) -> CaptureResult<ActionOutcome> {
        let store = state.lifecycle.bound()?;
        let path = store.path().to_path_buf();
        state.statistics = compute_counts(store.dataset());

        tracing::info!(
            path = %path.display(),
            rows = state.statistics.total_rows,
            "Dataset bound"
        );

        Ok(ActionOutcome::Bound {
            path,
            statistics: state.statistics.clone(),
        })
    }
}
