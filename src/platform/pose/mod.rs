// Hand pose estimation platform integration
// Provides the landmarker bridge and its backends

pub mod mediapipe_bridge;
pub mod replay;

pub use mediapipe_bridge::{
    validate_config, DefaultLandmarker, DummyLandmarker, HandLandmarker, MAX_TRACKED_HANDS,
};
pub use replay::ReplayLandmarker;
