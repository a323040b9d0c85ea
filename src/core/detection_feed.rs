// Detection feed - periodic frame -> landmark task publishing the latest result
//
// The feed owns the frame source and writes into a single-slot cell. Readers
// always see the most recent detection and never wait for the next one.

use crate::models::dataset::{CaptureError, CaptureResult};
use crate::models::pose::{Detection, PoseError, PoseResult};
use crate::platform::capture::FrameSource;
use crate::platform::pose::HandLandmarker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

// ==============================================================================
// Latest-detection cell
// ==============================================================================

/// Write half of the latest-detection cell
#[derive(Clone)]
pub struct DetectionPublisher {
    tx: Arc<watch::Sender<Option<Arc<Detection>>>>,
}

/// Read half of the latest-detection cell
#[derive(Clone)]
pub struct LatestDetection {
    rx: watch::Receiver<Option<Arc<Detection>>>,
}

impl LatestDetection {
    /// Create an empty cell
    pub fn channel() -> (DetectionPublisher, LatestDetection) {
        let (tx, rx) = watch::channel(None);
        (DetectionPublisher { tx: Arc::new(tx) }, LatestDetection { rx })
    }

    /// The most recent detection, or `NotReady` if none was ever published
    pub fn current(&self) -> CaptureResult<Arc<Detection>> {
        self.rx.borrow().clone().ok_or(CaptureError::NotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.rx.borrow().is_some()
    }
}

impl DetectionPublisher {
    /// Replace the stored detection; older values are dropped
    pub fn publish(&self, detection: Detection) {
        self.tx.send_replace(Some(Arc::new(detection)));
    }

    pub fn subscribe(&self) -> LatestDetection {
        LatestDetection {
            rx: self.tx.subscribe(),
        }
    }
}

// ==============================================================================
// Periodic feed task
// ==============================================================================

pub struct DetectionFeed {
    is_running: Arc<RwLock<bool>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl DetectionFeed {
    pub fn new() -> Self {
        Self {
            is_running: Arc::new(RwLock::new(false)),
            task: Mutex::new(None),
        }
    }

    /// Spawn the frame loop, ticking every `interval`
    pub async fn start<S, L>(
        &self,
        source: S,
        landmarker: Arc<L>,
        publisher: DetectionPublisher,
        interval: Duration,
    ) -> PoseResult<()>
    where
        S: FrameSource + 'static,
        L: HandLandmarker + ?Sized + 'static,
    {
        let mut is_running = self.is_running.write().await;
        if *is_running {
            return Err(PoseError::AlreadyRunning);
        }
        if interval.is_zero() {
            return Err(PoseError::InvalidConfig(
                "detection interval must be non-zero".to_string(),
            ));
        }
        *is_running = true;

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            model = %landmarker.get_model_info(),
            "Starting detection feed"
        );

        let running = self.is_running.clone();
        let handle = tokio::spawn(async move {
            Self::run_loop(source, landmarker, publisher, interval, running).await;
        });
        *self.task.lock().await = Some(handle);

        Ok(())
    }

    async fn run_loop<S, L>(
        mut source: S,
        landmarker: Arc<L>,
        publisher: DetectionPublisher,
        interval: Duration,
        is_running: Arc<RwLock<bool>>,
    ) where
        S: FrameSource,
        L: HandLandmarker + ?Sized + 'static,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if !*is_running.read().await {
                break;
            }

            match Self::process_tick(&mut source, &landmarker).await {
                Ok(Some(detection)) => publisher.publish(detection),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Skipping detection tick"),
            }
        }

        tracing::info!("Detection feed stopped");
    }

    async fn process_tick<S, L>(source: &mut S, landmarker: &Arc<L>) -> PoseResult<Option<Detection>>
    where
        S: FrameSource,
        L: HandLandmarker + ?Sized + 'static,
    {
        let frame = match source.grab()? {
            Some(frame) => frame,
            None => return Ok(None),
        };

        // Model inference blocks for the length of a frame; keep it off the async workers
        let landmarker = Arc::clone(landmarker);
        let detection = tokio::task::spawn_blocking(move || {
            let start_time = std::time::Instant::now();
            let mut detection = landmarker.detect(&frame)?;
            detection.processing_time_ms = start_time.elapsed().as_millis() as u64;
            Ok::<_, PoseError>(detection)
        })
        .await
        .map_err(|e| PoseError::InferenceFailed(format!("Landmarker task failed: {}", e)))??;

        Ok(Some(detection))
    }

    /// Stop the loop and wait for the task to exit
    pub async fn stop(&self) {
        {
            let mut is_running = self.is_running.write().await;
            if !*is_running {
                return;
            }
            *is_running = false;
        }

        if let Some(handle) = self.task.lock().await.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Detection feed task ended abnormally");
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }
}

impl Default for DetectionFeed {
    fn default() -> Self {
        Self::new()
    }
}
