// Replay backend - plays back recorded hand detections instead of running a model
//
// Recordings are JSON arrays of `Detection` values, one per frame.

use super::mediapipe_bridge::{validate_config, HandLandmarker};
use crate::models::capture::RawFrame;
use crate::models::pose::{Detection, HandTrackingConfig, PoseError, PoseResult};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct ReplayLandmarker {
    recording: Vec<Detection>,
    cursor: AtomicUsize,
    max_num_hands: usize,
}

impl ReplayLandmarker {
    pub fn from_detections(recording: Vec<Detection>, config: &HandTrackingConfig) -> PoseResult<Self> {
        validate_config(config)?;
        Ok(Self {
            recording,
            cursor: AtomicUsize::new(0),
            max_num_hands: config.max_num_hands as usize,
        })
    }

    /// Load a recording written as a JSON array of detections
    pub fn from_file(path: &Path, config: &HandTrackingConfig) -> PoseResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PoseError::ModelLoadFailed(format!("Failed to read recording {}: {}", path.display(), e))
        })?;
        let recording: Vec<Detection> = serde_json::from_str(&contents).map_err(|e| {
            PoseError::ModelLoadFailed(format!("Failed to parse recording {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), frames = recording.len(), "Loaded detection recording");
        Self::from_detections(recording, config)
    }

    pub fn len(&self) -> usize {
        self.recording.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recording.is_empty()
    }
}

impl HandLandmarker for ReplayLandmarker {
    /// An empty recording; every frame reports no hand
    fn new(config: &HandTrackingConfig) -> PoseResult<Self> {
        Self::from_detections(vec![], config)
    }

    fn detect(&self, frame: &RawFrame) -> PoseResult<Detection> {
        if self.recording.is_empty() {
            return Ok(Detection::empty(frame.timestamp));
        }

        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.recording.len();
        let mut detection = self.recording[index].clone();
        detection.timestamp = frame.timestamp;
        detection.hands.truncate(self.max_num_hands);
        Ok(detection)
    }

    fn is_initialized(&self) -> bool {
        !self.recording.is_empty()
    }

    fn get_model_info(&self) -> String {
        format!("Replay hand landmarker ({} recorded frames)", self.recording.len())
    }
}
