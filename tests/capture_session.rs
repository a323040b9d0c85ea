// End-to-end capture session scenarios against real files in a temp directory

use signcapture_lib::core::capture_session::{ActionOutcome, CaptureSession, UserAction};
use signcapture_lib::core::config::CaptureConfig;
use signcapture_lib::core::dataset_store::DatasetStore;
use signcapture_lib::core::detection_feed::{DetectionPublisher, LatestDetection};
use signcapture_lib::models::dataset::{CaptureError, Schema, SignLabel};
use signcapture_lib::models::pose::{Detection, HandPose, Handedness, Keypoint3D};
use std::path::Path;
use tempfile::TempDir;

fn hand(base: f32, handedness: Handedness, score: f32) -> HandPose {
    HandPose {
        handedness,
        handedness_score: score,
        landmarks: std::array::from_fn(|i| {
            let v = base + i as f32 * 0.25;
            Keypoint3D::new(v, v + 0.5, -v)
        }),
        world_landmarks: std::array::from_fn(|i| {
            let v = base + i as f32 * 0.25;
            Keypoint3D::new(v / 4.0, v / 8.0, v / 16.0)
        }),
    }
}

fn session(dir: &TempDir) -> (CaptureSession, DetectionPublisher) {
    let config = CaptureConfig {
        backup_path: dir.path().join("backup.csv"),
        ..CaptureConfig::default()
    };
    let (publisher, latest) = LatestDetection::channel();
    (CaptureSession::new(config, latest), publisher)
}

fn header_line(path: &Path) -> String {
    let contents = std::fs::read_to_string(path).expect("Failed to read dataset file");
    contents.lines().next().unwrap_or_default().to_string()
}

fn canonical_header() -> String {
    format!(",{}", Schema::columns().join(","))
}

#[tokio::test]
async fn test_one_then_two_hands_samples_first_hand() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("d.csv");
    let (session, publisher) = session(&dir);

    session
        .dispatch(UserAction::NewDataset {
            path: path.clone(),
            confirmed: true,
        })
        .await
        .expect("Failed to create dataset");

    publisher.publish(Detection::new(1, vec![hand(1.0, Handedness::Right, 0.75)]));
    let outcome = session
        .dispatch(UserAction::Label { code: 'a' })
        .await
        .expect("Failed to label first sample");
    match outcome {
        ActionOutcome::Labeled { label, statistics } => {
            assert_eq!(label, SignLabel::A);
            assert_eq!(statistics.count(SignLabel::A), 1);
            assert_eq!(statistics.total_rows, 1);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    publisher.publish(Detection::new(
        2,
        vec![
            hand(2.0, Handedness::Left, 0.5),
            hand(9.0, Handedness::Right, 0.25),
        ],
    ));
    session
        .dispatch(UserAction::Label { code: 'a' })
        .await
        .expect("Failed to label second sample");

    let stats = session.statistics().await;
    assert_eq!(stats.count(SignLabel::A), 2);
    assert_eq!(stats.total_rows, 2);
    assert_eq!(session.row_count().await, Some(2));

    let store = DatasetStore::open(&path).expect("Failed to reopen dataset");
    let rows = store.dataset().rows();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].landmarks[0], 1.0);
    assert_eq!(rows[0].handedness, 0.75);

    assert_eq!(rows[1].landmarks[0], 2.0);
    assert_eq!(rows[1].landmarks[1], 2.5);
    assert_eq!(rows[1].landmarks[2], -2.0);
    assert_eq!(rows[1].world_landmarks[0], 0.5);
    assert_eq!(rows[1].handedness, 0.5);
    assert_eq!(rows[1].letter, "a");
}

#[tokio::test]
async fn test_new_then_load_yields_empty_canonical_dataset() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("fresh.csv");
    let (session, _publisher) = session(&dir);

    session.new_dataset(&path, true).await.expect("Failed to create dataset");
    assert_eq!(header_line(&path), canonical_header());

    let outcome = session.load_dataset(&path).await.expect("Failed to load dataset");
    match outcome {
        ActionOutcome::Bound { path: bound, statistics } => {
            assert_eq!(bound, path);
            assert_eq!(statistics.total_rows, 0);
            assert!(statistics.counts.values().all(|c| *c == 0));
            assert_eq!(statistics.counts.len(), SignLabel::ALL.len());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(session.row_count().await, Some(0));
}

#[tokio::test]
async fn test_backup_mirrors_dataset_and_overwrites() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("letters.csv");
    let backup = dir.path().join("backup.csv");
    let (session, publisher) = session(&dir);

    session.new_dataset(&path, true).await.unwrap();
    publisher.publish(Detection::new(1, vec![hand(0.5, Handedness::Right, 1.0)]));
    session.label('c').await.unwrap();

    let outcome = session.backup().await.expect("Failed to back up");
    assert_eq!(outcome, ActionOutcome::BackedUp { target: backup.clone() });
    assert_eq!(
        std::fs::read_to_string(&backup).unwrap(),
        std::fs::read_to_string(&path).unwrap()
    );
    assert_eq!(session.active_path().await, Some(path.clone()));

    session.label('d').await.unwrap();
    session.backup().await.unwrap();

    let restored = DatasetStore::open(&backup).expect("Failed to open backup");
    assert_eq!(restored.len(), 2);
    assert_eq!(restored.dataset().rows()[1].letter, "d");
}

#[tokio::test]
async fn test_label_before_binding_writes_nothing() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (session, publisher) = session(&dir);
    publisher.publish(Detection::new(1, vec![hand(1.0, Handedness::Left, 0.9)]));

    let err = session.label('a').await.unwrap_err();
    assert!(matches!(err, CaptureError::NotBound));
    assert_eq!(err.notification().title, "DataFrame Error");

    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn test_load_rejects_foreign_csv_and_keeps_binding() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let good = dir.path().join("good.csv");
    let foreign = dir.path().join("foreign.csv");
    std::fs::write(&foreign, ",a,b,c\n0,1,2,3\n").unwrap();

    let (session, _publisher) = session(&dir);
    session.new_dataset(&good, true).await.unwrap();

    let err = session.load_dataset(&foreign).await.unwrap_err();
    assert!(matches!(err, CaptureError::SchemaMismatch { .. }));
    assert_eq!(session.active_path().await, Some(good));
}
