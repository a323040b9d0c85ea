// MediaPipe Hands integration bridge
// Abstracts the hand landmark model so the capture pipeline never depends on
// a particular inference backend

use crate::models::capture::RawFrame;
use crate::models::pose::{Detection, HandTrackingConfig, PoseError, PoseResult};

/// Hand landmarker trait
/// Implement this for each inference backend
pub trait HandLandmarker: Send + Sync {
    /// Initialize the landmark model
    fn new(config: &HandTrackingConfig) -> PoseResult<Self>
    where
        Self: Sized;

    /// Run inference on a frame. A frame without a hand yields a detection
    /// with an empty hand list, not an error.
    fn detect(&self, frame: &RawFrame) -> PoseResult<Detection>;

    /// Check if the model is loaded
    fn is_initialized(&self) -> bool;

    /// Get model info
    fn get_model_info(&self) -> String;
}

/// Largest hand count the landmark models track
pub const MAX_TRACKED_HANDS: u32 = 2;

/// Check tracking settings before a backend is built from them
pub fn validate_config(config: &HandTrackingConfig) -> PoseResult<()> {
    if config.max_num_hands == 0 || config.max_num_hands > MAX_TRACKED_HANDS {
        return Err(PoseError::InvalidConfig(format!(
            "max_num_hands must be between 1 and {}, got {}",
            MAX_TRACKED_HANDS, config.max_num_hands
        )));
    }

    for (name, value) in [
        ("min_detection_confidence", config.min_detection_confidence),
        ("min_tracking_confidence", config.min_tracking_confidence),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(PoseError::InvalidConfig(format!(
                "{} must be between 0.0 and 1.0, got {}",
                name, value
            )));
        }
    }

    Ok(())
}

// ==============================================================================
// Dummy Implementation (no inference backend linked)
// ==============================================================================

pub struct DummyLandmarker {
    config: HandTrackingConfig,
}

impl HandLandmarker for DummyLandmarker {
    fn new(config: &HandTrackingConfig) -> PoseResult<Self> {
        validate_config(config)?;
        tracing::warn!("Using dummy hand landmarker (no inference); every frame reports no hand");
        Ok(Self {
            config: config.clone(),
        })
    }

    fn detect(&self, frame: &RawFrame) -> PoseResult<Detection> {
        Ok(Detection::empty(frame.timestamp))
    }

    fn is_initialized(&self) -> bool {
        false
    }

    fn get_model_info(&self) -> String {
        format!(
            "Dummy hand landmarker (no ML inference) - max hands: {}, complexity: {:?}",
            self.config.max_num_hands, self.config.model_complexity
        )
    }
}

// ==============================================================================
// Default Backend Selection
// ==============================================================================

pub type DefaultLandmarker = DummyLandmarker;
