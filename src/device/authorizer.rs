use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use super::provider::{DeviceAccessProvider, MediaConstraints, MediaHandle};
use super::state::{AuthorizationOutcome, DeviceAuthorizationState};

/// Acquires camera/microphone access once per mount and owns the resulting media
///
/// Other components only observe [`DeviceAuthorizationState`]; the
/// [`MediaHandle`] never leaves this type.
pub struct DeviceAuthorizer {
    provider: Arc<dyn DeviceAccessProvider>,

    /// Published authorization state
    state_tx: watch::Sender<DeviceAuthorizationState>,

    /// Media acquired by the access request, if any
    handle: Mutex<Option<MediaHandle>>,

    /// Set once the single access attempt has begun
    attempted: AtomicBool,

    /// Set on teardown; media acquired afterwards is released immediately
    released: AtomicBool,
}

impl DeviceAuthorizer {
    pub fn new(provider: Arc<dyn DeviceAccessProvider>) -> Self {
        let (state_tx, _) = watch::channel(DeviceAuthorizationState::checking());

        Self {
            provider,
            state_tx,
            handle: Mutex::new(None),
            attempted: AtomicBool::new(false),
            released: AtomicBool::new(false),
        }
    }

    /// Current authorization state
    pub fn state(&self) -> DeviceAuthorizationState {
        *self.state_tx.borrow()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<DeviceAuthorizationState> {
        self.state_tx.subscribe()
    }

    /// Run the access attempt: audio+video first, then audio only.
    ///
    /// Only the first call does anything; later calls return `None`.
    pub async fn authorize(&self) -> Option<AuthorizationOutcome> {
        if self.attempted.swap(true, Ordering::SeqCst) {
            warn!("Device access already requested for this mount");
            return None;
        }

        info!("Requesting camera and microphone via {}", self.provider.name());

        let (outcome, handle) = match self.provider.request(MediaConstraints::AudioVideo).await {
            Ok(handle) => (AuthorizationOutcome::BothGranted, Some(handle)),
            Err(e) => {
                warn!("Camera+microphone request failed ({}), retrying audio only", e);

                match self.provider.request(MediaConstraints::AudioOnly).await {
                    Ok(handle) => (AuthorizationOutcome::AudioOnlyGranted, Some(handle)),
                    Err(e) => {
                        warn!("Microphone request failed: {}", e);
                        (AuthorizationOutcome::NoneGranted, None)
                    }
                }
            }
        };

        if let Some(handle) = handle {
            self.store_handle(handle);
        }

        self.state_tx.send_if_modified(|state| state.resolve(outcome));
        info!("Device authorization resolved: {:?}", outcome);

        Some(outcome)
    }

    /// Wait until camera and microphone have both left `Checking`
    pub async fn wait_resolved(&self) -> DeviceAuthorizationState {
        let mut rx = self.state_tx.subscribe();
        let result = match rx.wait_for(|state| state.is_resolved()).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        };
        result
    }

    /// Whether a media handle is currently held
    pub fn holds_media(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Stop all held tracks. Idempotent; media arriving later is released on arrival.
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);

        let taken = self.handle.lock().take();
        if let Some(handle) = taken {
            info!("Releasing media handle {}", handle.id());
            handle.release();
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    fn store_handle(&self, handle: MediaHandle) {
        let mut slot = self.handle.lock();
        if self.released.load(Ordering::SeqCst) {
            drop(slot);
            info!("Flow already torn down, releasing media handle {}", handle.id());
            handle.release();
            return;
        }
        *slot = Some(handle);
    }
}

impl Drop for DeviceAuthorizer {
    fn drop(&mut self) {
        self.release();
    }
}
