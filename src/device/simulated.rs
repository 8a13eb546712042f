use parking_lot::Mutex;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::provider::{
    DeviceAccessError, DeviceAccessProvider, MediaConstraints, MediaHandle, MediaTrack, TrackKind,
};

/// Scripted answer to a device access request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedOutcome {
    Grant,
    Deny,
    Missing,
}

impl FromStr for SimulatedOutcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grant" | "granted" => Ok(Self::Grant),
            "deny" | "denied" => Ok(Self::Deny),
            "missing" | "none" => Ok(Self::Missing),
            other => anyhow::bail!("unknown device outcome '{}' (expected grant, deny or missing)", other),
        }
    }
}

/// Track whose stopped flag stays observable after the handle is gone
struct SimulatedTrack {
    kind: TrackKind,
    stopped: Arc<AtomicBool>,
}

impl MediaTrack for SimulatedTrack {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst)
    }
}

/// Device provider answering from a fixed camera/microphone script
///
/// The combined request succeeds only if both devices grant; the audio-only
/// request follows the microphone outcome.
pub struct SimulatedDeviceProvider {
    camera: SimulatedOutcome,
    microphone: SimulatedOutcome,
    delay: Option<Duration>,
    requests: Mutex<HashMap<MediaConstraints, usize>>,
    issued: Mutex<Vec<Arc<AtomicBool>>>,
}

impl SimulatedDeviceProvider {
    pub fn new(camera: SimulatedOutcome, microphone: SimulatedOutcome) -> Self {
        Self {
            camera,
            microphone,
            delay: None,
            requests: Mutex::new(HashMap::new()),
            issued: Mutex::new(Vec::new()),
        }
    }

    /// Every request waits this long before answering, like a permission prompt
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests made with the given constraints
    pub fn request_count(&self, constraints: MediaConstraints) -> usize {
        self.requests.lock().get(&constraints).copied().unwrap_or(0)
    }

    /// Tracks handed out and not yet stopped
    pub fn live_tracks(&self) -> usize {
        self.issued
            .lock()
            .iter()
            .filter(|stopped| !stopped.load(Ordering::SeqCst))
            .count()
    }

    /// Tracks handed out in total
    pub fn issued_tracks(&self) -> usize {
        self.issued.lock().len()
    }

    fn answer(&self, constraints: MediaConstraints) -> Result<(), DeviceAccessError> {
        let outcomes = if constraints.wants_video() {
            vec![self.camera, self.microphone]
        } else {
            vec![self.microphone]
        };

        for outcome in &outcomes {
            match outcome {
                SimulatedOutcome::Grant => {}
                SimulatedOutcome::Deny => return Err(DeviceAccessError::PermissionDenied),
                SimulatedOutcome::Missing => return Err(DeviceAccessError::NotFound),
            }
        }
        Ok(())
    }

    fn track(&self, kind: TrackKind) -> Box<dyn MediaTrack> {
        let stopped = Arc::new(AtomicBool::new(false));
        self.issued.lock().push(Arc::clone(&stopped));
        Box::new(SimulatedTrack { kind, stopped })
    }
}

#[async_trait::async_trait]
impl DeviceAccessProvider for SimulatedDeviceProvider {
    async fn request(&self, constraints: MediaConstraints) -> Result<MediaHandle, DeviceAccessError> {
        *self.requests.lock().entry(constraints).or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.answer(constraints)?;

        let mut tracks = vec![self.track(TrackKind::Audio)];
        if constraints.wants_video() {
            tracks.push(self.track(TrackKind::Video));
        }

        info!("Simulated provider granted {:?}", constraints);
        Ok(MediaHandle::new(tracks))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
