pub mod core;
pub mod models;
pub mod platform;

use crate::core::capture_session::{ActionOutcome, CaptureSession, SessionSnapshot, UserAction};
use crate::core::config::CaptureConfig;
use crate::core::detection_feed::{DetectionFeed, DetectionPublisher, LatestDetection};
use crate::models::dataset::Notification;
use crate::platform::capture::FrameSource;
use crate::platform::pose::HandLandmarker;
use std::sync::Arc;

// Application state
pub struct AppState {
    pub session: Arc<CaptureSession>,
    pub feed: DetectionFeed,
    publisher: DetectionPublisher,
}

impl AppState {
    pub fn new(config: CaptureConfig) -> Self {
        let (publisher, latest) = LatestDetection::channel();
        Self {
            session: Arc::new(CaptureSession::new(config, latest)),
            feed: DetectionFeed::new(),
            publisher,
        }
    }

    /// Build the state from the persisted settings file
    pub fn from_settings() -> Result<Self, String> {
        let config =
            CaptureConfig::load().map_err(|e| format!("Failed to load configuration: {}", e))?;
        Ok(Self::new(config))
    }

    /// Handle to push detections into the session without running the feed
    pub fn publisher(&self) -> &DetectionPublisher {
        &self.publisher
    }
}

// Session commands
pub async fn dispatch_action(
    action: UserAction,
    state: &AppState,
) -> Result<ActionOutcome, Notification> {
    state.session.dispatch(action).await.map_err(|e| {
        tracing::warn!(error = %e, "Action failed");
        e.notification()
    })
}

pub async fn get_session_snapshot(state: &AppState) -> SessionSnapshot {
    state.session.snapshot().await
}

pub fn get_config(state: &AppState) -> CaptureConfig {
    state.session.config().clone()
}

// Detection feed commands

/// Build a landmarker from the configured hand tracking settings and start
/// feeding its detections to the session
pub async fn start_detection<S, L>(source: S, state: &AppState) -> Result<(), String>
where
    S: FrameSource + 'static,
    L: HandLandmarker + 'static,
{
    let landmarker = L::new(&state.session.config().hand_tracking)
        .map_err(|e| format!("Failed to initialize hand landmarker: {}", e))?;
    start_detection_with(source, Arc::new(landmarker), state).await
}

/// Start the feed with a landmarker the caller already built
pub async fn start_detection_with<S, L>(
    source: S,
    landmarker: Arc<L>,
    state: &AppState,
) -> Result<(), String>
where
    S: FrameSource + 'static,
    L: HandLandmarker + ?Sized + 'static,
{
    let interval = state.session.config().detection_interval();
    state
        .feed
        .start(source, landmarker, state.publisher.clone(), interval)
        .await
        .map_err(|e| format!("Failed to start detection: {}", e))
}

pub async fn stop_detection(state: &AppState) {
    state.feed.stop().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::capture::StillFrameSource;
    use crate::platform::pose::DummyLandmarker;
    use crate::models::pose::fixtures::hand;
    use crate::models::pose::Detection;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_label_without_dataset_shows_dataframe_error() {
        let state = AppState::new(CaptureConfig::default());
        state.publisher().publish(Detection::new(0, vec![hand(1.0, 0.9)]));

        let notification = dispatch_action(UserAction::Label { code: 'a' }, &state)
            .await
            .unwrap_err();
        assert_eq!(notification.title, "DataFrame Error");
        assert_eq!(
            notification.message,
            "Error: No DataFrame loaded! Create new file or load an existing one!"
        );
    }

    #[tokio::test]
    async fn test_dispatch_updates_snapshot() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("letters.csv");
        let state = AppState::new(CaptureConfig::default());

        dispatch_action(
            UserAction::NewDataset {
                path: path.clone(),
                confirmed: true,
            },
            &state,
        )
        .await
        .expect("Failed to create dataset");

        state.publisher().publish(Detection::new(1, vec![hand(2.0, 0.8)]));
        dispatch_action(UserAction::Label { code: 'c' }, &state)
            .await
            .expect("Failed to label");

        let snapshot = get_session_snapshot(&state).await;
        assert_eq!(snapshot.active_path, Some(path));
        assert_eq!(snapshot.row_count, 1);
        assert_eq!(get_config(&state), CaptureConfig::default());
    }

    #[tokio::test]
    async fn test_start_detection_uses_configured_tracking() {
        let mut config = CaptureConfig::default();
        config.hand_tracking.min_detection_confidence = 1.5;
        let state = AppState::new(config);

        let err = start_detection::<_, DummyLandmarker>(StillFrameSource::default(), &state)
            .await
            .unwrap_err();
        assert!(err.contains("min_detection_confidence"), "{}", err);
        assert!(!state.feed.is_running().await);

        let state = AppState::new(CaptureConfig::default());
        start_detection::<_, DummyLandmarker>(StillFrameSource::default(), &state)
            .await
            .expect("Failed to start detection");
        assert!(state.feed.is_running().await);
        stop_detection(&state).await;
    }
}
