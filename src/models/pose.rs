// Data models for hand tracking results consumed by the capture session

use serde::{Deserialize, Serialize};

/// Number of landmarks MediaPipe Hands reports per hand
pub const HAND_LANDMARK_COUNT: usize = 21;

// ==============================================================================
// Detection (Unified Result)
// ==============================================================================

/// Hand tracking result for a single processed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub timestamp: i64,
    pub hands: Vec<HandPose>, // Empty when no hand was found
    #[serde(default)]
    pub processing_time_ms: u64,
}

impl Detection {
    pub fn new(timestamp: i64, hands: Vec<HandPose>) -> Self {
        Self {
            timestamp,
            hands,
            processing_time_ms: 0,
        }
    }

    /// A frame in which the detector found nothing
    pub fn empty(timestamp: i64) -> Self {
        Self::new(timestamp, vec![])
    }

    /// The authoritative hand. Tracking is configured for a single hand, so
    /// when several are reported the first one wins.
    pub fn primary_hand(&self) -> Option<&HandPose> {
        self.hands.first()
    }

    pub fn has_hand(&self) -> bool {
        !self.hands.is_empty()
    }
}

// ==============================================================================
// Hand Tracking (21 keypoints per hand)
// ==============================================================================

/// Hand pose tracking result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandPose {
    pub handedness: Handedness,
    pub handedness_score: f32, // Classifier confidence for `handedness` [0, 1]
    pub landmarks: [Keypoint3D; HAND_LANDMARK_COUNT], // Image-normalized coordinates
    pub world_landmarks: [Keypoint3D; HAND_LANDMARK_COUNT], // Metric, hand-centered coordinates
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

// ==============================================================================
// Shared: 3D Keypoint
// ==============================================================================

/// A single (x, y, z) hand keypoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Keypoint3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Keypoint3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// ==============================================================================
// Configuration
// ==============================================================================

/// Settings handed to the hand landmarker backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandTrackingConfig {
    pub max_num_hands: u32,              // Only the first hand is ever sampled (default: 1)
    pub model_complexity: ModelComplexity,
    pub min_detection_confidence: f32,   // Minimum confidence for detection (default: 0.5)
    pub min_tracking_confidence: f32,    // Minimum confidence for tracking (default: 0.5)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelComplexity {
    Lite = 0, // Fastest, less accurate
    Full = 1, // Balanced
}

impl Default for HandTrackingConfig {
    fn default() -> Self {
        Self {
            max_num_hands: 1,
            model_complexity: ModelComplexity::Lite,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Hand landmarker not initialized")]
    NotInitialized,

    #[error("Detection feed already running")]
    AlreadyRunning,

    #[error("Model loading failed: {0}")]
    ModelLoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Frame capture failed: {0}")]
    FrameUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type PoseResult<T> = Result<T, PoseError>;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hand_is_first() {
        let detection = Detection::new(0, vec![fixtures::hand(1.0, 0.9), fixtures::hand(50.0, 0.4)]);
        let primary = detection.primary_hand().expect("hand present");
        assert_eq!(primary.handedness_score, 0.9);
        assert_eq!(primary.landmarks[0].x, 1.0);
    }

    #[test]
    fn test_empty_detection_has_no_hand() {
        let detection = Detection::empty(42);
        assert!(!detection.has_hand());
        assert!(detection.primary_hand().is_none());
    }

    #[test]
    fn test_detection_json_roundtrip() {
        let detection = Detection::new(7, vec![fixtures::hand(3.0, 0.75)]);
        let json = serde_json::to_string(&detection).unwrap();
        let parsed: Detection = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, detection);
        assert_eq!(parsed.hands[0].landmarks[20].x, 23.0);
    }

    #[test]
    fn test_hand_tracking_config_default() {
        let config = HandTrackingConfig::default();
        assert_eq!(config.max_num_hands, 1);
        assert_eq!(config.model_complexity, ModelComplexity::Lite);
        assert_eq!(config.min_detection_confidence, 0.5);
        assert_eq!(config.min_tracking_confidence, 0.5);
    }
}
