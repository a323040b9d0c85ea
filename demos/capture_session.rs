/// Example program driving a capture session against a replayed detection feed
/// Run with: cargo run --example capture_session [recording.json]
///
/// Without a recording argument a synthetic single-hand recording is used.

use signcapture_lib::core::capture_session::UserAction;
use signcapture_lib::core::config::CaptureConfig;
use signcapture_lib::core::logging;
use signcapture_lib::models::pose::{Detection, HandPose, Handedness, Keypoint3D, HAND_LANDMARK_COUNT};
use signcapture_lib::platform::capture::StillFrameSource;
use signcapture_lib::platform::pose::ReplayLandmarker;
use signcapture_lib::{
    dispatch_action, get_session_snapshot, start_detection_with, stop_detection, AppState,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn synthetic_hand(spread: f32) -> HandPose {
    let landmarks: [Keypoint3D; HAND_LANDMARK_COUNT] = std::array::from_fn(|i| {
        let t = i as f32 / HAND_LANDMARK_COUNT as f32;
        Keypoint3D::new(0.4 + t * spread, 0.6 - t * spread, -0.01 * i as f32)
    });
    let world_landmarks = landmarks.map(|p| Keypoint3D::new(p.x - 0.5, p.y - 0.5, p.z));

    HandPose {
        handedness: Handedness::Right,
        handedness_score: 0.97,
        landmarks,
        world_landmarks,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init()?;

    println!("=== Capture Session Demo ===\n");

    let work_dir = std::env::temp_dir().join("signcapture-demo");
    std::fs::create_dir_all(&work_dir)?;

    let mut config = CaptureConfig::default();
    config.backup_path = work_dir.join("backup.csv");
    config.validate()?;

    let tracking = config.hand_tracking.clone();
    let landmarker = match std::env::args().nth(1) {
        Some(path) => {
            println!("Replaying recording from {}", path);
            ReplayLandmarker::from_file(&PathBuf::from(path), &tracking)?
        }
        None => {
            println!("Using synthetic recording");
            let recording = (0..4)
                .map(|i| Detection::new(i, vec![synthetic_hand(0.1 + i as f32 * 0.05)]))
                .collect();
            ReplayLandmarker::from_detections(recording, &tracking)?
        }
    };

    let state = AppState::new(config);
    start_detection_with(StillFrameSource::default(), Arc::new(landmarker), &state).await?;
    println!("✓ Detection feed started\n");

    // Give the feed a few ticks to publish its first detection
    tokio::time::sleep(Duration::from_millis(100)).await;

    let dataset_path = work_dir.join(&state.session.config().default_dataset_name);
    let actions = vec![
        UserAction::Label { code: 'a' },
        UserAction::NewDataset {
            path: dataset_path.clone(),
            confirmed: true,
        },
        UserAction::Label { code: 'a' },
        UserAction::Label { code: 'b' },
        UserAction::Label { code: 'j' },
        UserAction::Label { code: 'a' },
        UserAction::Backup,
    ];

    for action in actions {
        println!("> {}", serde_json::to_string(&action)?);
        match dispatch_action(action, &state).await {
            Ok(outcome) => println!("✓ {}\n", serde_json::to_string(&outcome)?),
            Err(notification) => {
                println!("✗ [{}] {}\n", notification.title, notification.message)
            }
        }
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    stop_detection(&state).await;

    let snapshot = get_session_snapshot(&state).await;
    println!("=== Session Summary ===\n");
    println!("  Dataset: {:?}", snapshot.active_path);
    println!("  Rows: {}", snapshot.row_count);
    for (label, count) in snapshot.statistics.counts.iter().filter(|(_, c)| **c > 0) {
        println!("  {}: {}", label, count);
    }

    println!("\n✓ Dataset written to {}", dataset_path.display());
    Ok(())
}
