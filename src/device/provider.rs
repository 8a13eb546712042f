use tracing::debug;
use uuid::Uuid;

/// Kind of device track carried by a media handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
}

/// Which devices a single access request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaConstraints {
    /// Camera and microphone together
    AudioVideo,
    /// Microphone only
    AudioOnly,
}

impl MediaConstraints {
    pub fn wants_video(self) -> bool {
        matches!(self, MediaConstraints::AudioVideo)
    }
}

/// Platform-level reasons an access request can fail
///
/// The authorizer collapses all of these to `DENIED`; the detail only reaches the logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceAccessError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("no such device")]
    NotFound,

    #[error("device busy")]
    Busy,

    #[error("platform error: {0}")]
    Platform(String),
}

/// A single live device track
pub trait MediaTrack: Send + Sync {
    fn kind(&self) -> TrackKind;

    /// Stop the track and free the underlying device. Must be idempotent.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// Owned audio/video resource returned by a successful access request
///
/// Tracks are stopped by [`MediaHandle::release`] or, failing that, on drop.
pub struct MediaHandle {
    id: Uuid,
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl MediaHandle {
    pub fn new(tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tracks,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn has_track(&self, kind: TrackKind) -> bool {
        self.tracks.iter().any(|track| track.kind() == kind)
    }

    pub fn live_tracks(&self) -> usize {
        self.tracks.iter().filter(|track| track.is_live()).count()
    }

    /// Stop every track
    pub fn release(mut self) {
        self.stop_all();
    }

    fn stop_all(&mut self) {
        for track in self.tracks.iter_mut().filter(|track| track.is_live()) {
            debug!("Stopping {:?} track of media handle {}", track.kind(), self.id);
            track.stop();
        }
    }
}

impl Drop for MediaHandle {
    fn drop(&mut self) {
        self.stop_all();
    }
}

impl std::fmt::Debug for MediaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaHandle")
            .field("id", &self.id)
            .field("tracks", &self.tracks.len())
            .field("live", &self.live_tracks())
            .finish()
    }
}

/// Host capability that grants access to camera/microphone
///
/// Implementations:
/// - `SimulatedDeviceProvider`: scripted outcomes (tests, CLI simulation)
/// - Browser or native capture backends plug in here
#[async_trait::async_trait]
pub trait DeviceAccessProvider: Send + Sync {
    /// Request access. May wait indefinitely on a user permission prompt.
    async fn request(&self, constraints: MediaConstraints) -> Result<MediaHandle, DeviceAccessError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
