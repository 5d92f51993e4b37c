//! Frame orchestration service
//!
//! Frames are admitted synchronously on the caller's thread, then fused on a
//! dedicated worker thread. The fused pose is published through a watch
//! channel so readers always see a whole value.

use metrics::{counter, gauge};
use pose_model::FusedPose;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    Admission, Frame, FrameGate, FusionConfig, FusionEngine, FusionError, KeypointEstimator,
};

/// Commands queued for the worker
const COMMAND_CAPACITY: usize = 8;

/// Slot holding the most recently published pose
pub type PoseSlot = watch::Receiver<Option<Arc<FusedPose>>>;

enum Command {
    Process(Frame),
    Reset,
}

/// Snapshot of the service counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionStats {
    pub frames_accepted: u64,
    pub frames_throttled: u64,
    pub frames_busy: u64,
    pub estimator_failures: u64,
    pub poses_published: u64,
    pub poses_discarded: u64,
}

#[derive(Debug, Default)]
struct StatsCounters {
    accepted: AtomicU64,
    throttled: AtomicU64,
    busy: AtomicU64,
    failures: AtomicU64,
    published: AtomicU64,
    discarded: AtomicU64,
}

impl StatsCounters {
    fn snapshot(&self) -> FusionStats {
        FusionStats {
            frames_accepted: self.accepted.load(Ordering::Relaxed),
            frames_throttled: self.throttled.load(Ordering::Relaxed),
            frames_busy: self.busy.load(Ordering::Relaxed),
            estimator_failures: self.failures.load(Ordering::Relaxed),
            poses_published: self.published.load(Ordering::Relaxed),
            poses_discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

fn lock(gate: &Mutex<FrameGate>) -> MutexGuard<'_, FrameGate> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Throttled, single-flight pose fusion with a published current pose
pub struct FusionService {
    commands: Option<mpsc::Sender<Command>>,
    gate: Arc<Mutex<FrameGate>>,
    current: PoseSlot,
    stats: Arc<StatsCounters>,
    worker: Option<JoinHandle<()>>,
}

impl FusionService {
    /// Validate the configuration and start the fusion worker
    pub fn spawn<E: KeypointEstimator>(
        config: FusionConfig,
        estimator: E,
    ) -> Result<Self, FusionError> {
        let engine = FusionEngine::new(&config)?;

        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        let (publisher, current) = watch::channel(None);
        let gate = Arc::new(Mutex::new(FrameGate::new(config.throttle.min_interval()?)));
        let stats = Arc::new(StatsCounters::default());

        let worker = Worker {
            engine,
            estimator,
            confident_threshold: config.detection.confident_joint_threshold,
            publisher,
            gate: gate.clone(),
            stats: stats.clone(),
        };

        let handle = std::thread::Builder::new()
            .name("pose-fusion".to_string())
            .spawn(move || worker.run(rx))
            .map_err(|e| FusionError::Spawn(e.to_string()))?;

        info!("Pose fusion started (max {} fps)", config.throttle.max_fps);

        Ok(Self {
            commands: Some(tx),
            gate,
            current,
            stats,
            worker: Some(handle),
        })
    }

    /// Offer a frame. Never blocks; rejected frames are dropped, not queued.
    pub fn submit(&self, frame: Frame) -> Result<Admission, FusionError> {
        let commands = self.commands.as_ref().ok_or(FusionError::WorkerStopped)?;

        let admission = lock(&self.gate).try_admit(frame.timestamp_ns);
        match admission {
            Admission::Throttled => {
                counter!("pose_fusion_frames_throttled_total").increment(1);
                self.stats.throttled.fetch_add(1, Ordering::Relaxed);
                debug!("Frame {} throttled", frame.sequence);
                return Ok(admission);
            }
            Admission::Busy => {
                self.record_busy(frame.sequence);
                return Ok(admission);
            }
            Admission::Accepted => {}
        }

        let sequence = frame.sequence;
        match commands.try_send(Command::Process(frame)) {
            Ok(()) => {
                counter!("pose_fusion_frames_accepted_total").increment(1);
                self.stats.accepted.fetch_add(1, Ordering::Relaxed);
                Ok(Admission::Accepted)
            }
            Err(TrySendError::Full(_)) => {
                lock(&self.gate).complete();
                self.record_busy(sequence);
                Ok(Admission::Busy)
            }
            Err(TrySendError::Closed(_)) => {
                lock(&self.gate).complete();
                Err(FusionError::WorkerStopped)
            }
        }
    }

    fn record_busy(&self, sequence: u32) {
        counter!("pose_fusion_frames_busy_total").increment(1);
        self.stats.busy.fetch_add(1, Ordering::Relaxed);
        debug!("Frame {} dropped, fusion in progress", sequence);
    }

    /// Clear all fusion history once queued work has finished
    pub async fn reset(&self) -> Result<(), FusionError> {
        let commands = self.commands.as_ref().ok_or(FusionError::WorkerStopped)?;
        commands
            .send(Command::Reset)
            .await
            .map_err(|_| FusionError::WorkerStopped)
    }

    /// Most recently published pose
    pub fn current_pose(&self) -> Option<Arc<FusedPose>> {
        self.current.borrow().clone()
    }

    /// Receiver notified on every publication
    pub fn subscribe(&self) -> PoseSlot {
        self.current.clone()
    }

    /// Whether a frame is being fused right now
    pub fn is_processing(&self) -> bool {
        lock(&self.gate).is_in_flight()
    }

    pub fn stats(&self) -> FusionStats {
        self.stats.snapshot()
    }

    /// Stop accepting frames and wait for the worker to finish
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // Closing the channel ends the worker loop after queued commands
        self.commands.take();

        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("Pose fusion worker panicked");
            } else {
                info!("Pose fusion stopped");
            }
        }
    }
}

impl Drop for FusionService {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Worker<E> {
    engine: FusionEngine,
    estimator: E,
    confident_threshold: f32,
    publisher: watch::Sender<Option<Arc<FusedPose>>>,
    gate: Arc<Mutex<FrameGate>>,
    stats: Arc<StatsCounters>,
}

impl<E: KeypointEstimator> Worker<E> {
    fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        while let Some(command) = commands.blocking_recv() {
            match command {
                Command::Process(frame) => {
                    self.process(&frame);
                    lock(&self.gate).complete();
                }
                Command::Reset => self.engine.reset(),
            }
        }
        debug!("Fusion command channel closed");
    }

    fn process(&mut self, frame: &Frame) {
        let observation = match self.estimator.estimate(frame) {
            Ok(observation) => observation,
            Err(e) => {
                warn!("Estimator failed on frame {}: {}", frame.sequence, e);
                counter!("pose_fusion_estimator_failures_total").increment(1);
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        match self.engine.process(observation, frame.timestamp_ns) {
            Some(pose) => {
                gauge!("pose_fusion_last_confident_joints")
                    .set(pose.joints.count_confident(self.confident_threshold) as f64);
                self.publisher.send_replace(Some(Arc::new(pose)));
                counter!("pose_fusion_poses_published_total").increment(1);
                self.stats.published.fetch_add(1, Ordering::Relaxed);
            }
            None => {
                debug!("Frame {} had no signal and no history", frame.sequence);
                counter!("pose_fusion_poses_discarded_total").increment(1);
                self.stats.discarded.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::seated;
    use crate::EstimatorError;
    use image::RgbImage;
    use pose_model::{Posture, RawObservation};
    use std::time::Duration;
    use tokio::time::timeout;

    const MS: u64 = 1_000_000;

    fn frame(sequence: u32, timestamp_ns: u64) -> Frame {
        Frame::new(RgbImage::new(4, 4), timestamp_ns, sequence)
    }

    fn seated_estimator(_frame: &Frame) -> Result<RawObservation, EstimatorError> {
        Ok(seated())
    }

    async fn wait_idle(service: &FusionService) {
        timeout(Duration::from_secs(2), async {
            while service.is_processing() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_accepted_frame_is_published() {
        let service = FusionService::spawn(FusionConfig::default(), seated_estimator).unwrap();
        let mut poses = service.subscribe();

        assert_eq!(service.submit(frame(0, 0)).unwrap(), Admission::Accepted);
        timeout(Duration::from_secs(2), poses.changed())
            .await
            .unwrap()
            .unwrap();

        let pose = service.current_pose().unwrap();
        assert_eq!(pose.timestamp_ns, 0);
        assert_eq!(pose.posture.as_ref().unwrap().posture, Posture::Sitting);

        wait_idle(&service).await;
        let stats = service.stats();
        assert_eq!(stats.frames_accepted, 1);
        assert_eq!(stats.poses_published, 1);
    }

    #[tokio::test]
    async fn test_estimator_failure_keeps_previous_pose() {
        let estimator = |frame: &Frame| -> Result<RawObservation, EstimatorError> {
            if frame.sequence == 0 {
                Ok(seated())
            } else {
                Err(EstimatorError::ResourceExhausted("no buffers".to_string()))
            }
        };
        let service = FusionService::spawn(FusionConfig::default(), estimator).unwrap();

        service.submit(frame(0, 0)).unwrap();
        wait_idle(&service).await;
        let before = service.current_pose().unwrap();

        assert!(service.submit(frame(1, 100 * MS)).unwrap().is_accepted());
        wait_idle(&service).await;

        let after = service.current_pose().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(service.stats().estimator_failures, 1);
    }

    #[tokio::test]
    async fn test_frames_dropped_while_busy() {
        let (release, wait) = std::sync::mpsc::channel::<()>();
        let estimator = move |_frame: &Frame| -> Result<RawObservation, EstimatorError> {
            wait.recv_timeout(Duration::from_secs(2))
                .map_err(|e| EstimatorError::Backend(e.to_string()))?;
            Ok(seated())
        };
        let service = FusionService::spawn(FusionConfig::default(), estimator).unwrap();

        assert_eq!(service.submit(frame(0, 0)).unwrap(), Admission::Accepted);
        assert!(service.is_processing());
        assert_eq!(service.submit(frame(1, 100 * MS)).unwrap(), Admission::Busy);

        release.send(()).unwrap();
        wait_idle(&service).await;

        assert_eq!(service.current_pose().unwrap().timestamp_ns, 0);
        assert_eq!(service.stats().frames_busy, 1);

        assert_eq!(service.submit(frame(2, 200 * MS)).unwrap(), Admission::Accepted);
        release.send(()).unwrap();
        wait_idle(&service).await;
        assert_eq!(service.current_pose().unwrap().timestamp_ns, 200 * MS);
    }

    #[tokio::test]
    async fn test_throttled_frames() {
        let service = FusionService::spawn(FusionConfig::default(), seated_estimator).unwrap();

        assert_eq!(service.submit(frame(0, 0)).unwrap(), Admission::Accepted);
        wait_idle(&service).await;
        assert_eq!(service.submit(frame(1, 40 * MS)).unwrap(), Admission::Accepted);
        wait_idle(&service).await;
        assert_eq!(service.submit(frame(2, 50 * MS)).unwrap(), Admission::Throttled);

        let stats = service.stats();
        assert_eq!(stats.frames_accepted, 2);
        assert_eq!(stats.frames_throttled, 1);
    }

    #[tokio::test]
    async fn test_reset_drops_carry_forward() {
        let estimator = |frame: &Frame| -> Result<RawObservation, EstimatorError> {
            Ok(if frame.sequence == 0 {
                seated()
            } else {
                RawObservation::default()
            })
        };
        let service = FusionService::spawn(FusionConfig::default(), estimator).unwrap();

        service.submit(frame(0, 0)).unwrap();
        wait_idle(&service).await;
        service.reset().await.unwrap();

        service.submit(frame(1, 100 * MS)).unwrap();
        wait_idle(&service).await;

        // Nothing to carry forward after reset; the old pose stays published
        assert_eq!(service.current_pose().unwrap().timestamp_ns, 0);
        assert_eq!(service.stats().poses_discarded, 1);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut config = FusionConfig::default();
        config.throttle.max_fps = -1.0;
        assert!(matches!(
            FusionService::spawn(config, seated_estimator),
            Err(FusionError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_shutdown_closes_slot() {
        let service = FusionService::spawn(FusionConfig::default(), seated_estimator).unwrap();
        let mut poses = service.subscribe();

        service.shutdown();
        assert!(poses.changed().await.is_err());
    }
}
