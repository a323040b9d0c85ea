// Sample ingestion - turns a labeled detection into a schema-ordered row

use crate::models::dataset::{CaptureError, CaptureResult, SampleRow, SignLabel, LANDMARK_VALUES};
use crate::models::pose::{Detection, Keypoint3D, HAND_LANDMARK_COUNT};
use serde::{Deserialize, Serialize};

/// Which coordinates fill the `world_landmark_*` columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldLandmarkSource {
    /// The detector's metric world landmarks
    #[default]
    Detector,
    /// Repeat the image-normalized landmarks, matching datasets captured by
    /// the earlier gatherer which wrote the local set into both groups
    MirrorLocal,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SampleIngestor {
    world_source: WorldLandmarkSource,
}

impl SampleIngestor {
    pub fn new(world_source: WorldLandmarkSource) -> Self {
        Self { world_source }
    }

    pub fn world_source(&self) -> WorldLandmarkSource {
        self.world_source
    }

    /// Build a row from the first hand in `detection`
    pub fn ingest(&self, label: SignLabel, detection: &Detection) -> CaptureResult<SampleRow> {
        let hand = detection.primary_hand().ok_or(CaptureError::NoHandDetected)?;

        if detection.hands.len() > 1 {
            tracing::debug!(
                hands = detection.hands.len(),
                "Multiple hands detected, sampling the first"
            );
        }

        let landmarks = flatten(&hand.landmarks);
        let world_landmarks = match self.world_source {
            WorldLandmarkSource::Detector => flatten(&hand.world_landmarks),
            WorldLandmarkSource::MirrorLocal => landmarks,
        };

        Ok(SampleRow {
            landmarks,
            world_landmarks,
            handedness: f64::from(hand.handedness_score),
            letter: label.code().to_string(),
        })
    }
}

fn flatten(points: &[Keypoint3D; HAND_LANDMARK_COUNT]) -> [f64; LANDMARK_VALUES] {
    let mut values = [0.0f64; LANDMARK_VALUES];
    for (i, point) in points.iter().enumerate() {
        values[i * 3] = f64::from(point.x);
        values[i * 3 + 1] = f64::from(point.y);
        values[i * 3 + 2] = f64::from(point.z);
    }
    values
}
