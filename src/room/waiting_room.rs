use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::view::{SessionStatus, ViewParts, WaitingRoomView};
use crate::device::{DeviceAccessProvider, DeviceAuthorizationState, DeviceAuthorizer};
use crate::launch::{round_path, CountdownTimer, LaunchSequencer, Navigator, TickOutcome};
use crate::session::{LoadError, SessionContext, SessionDescriptor, SessionStore};

/// Timing and routing knobs for a waiting room
#[derive(Debug, Clone)]
pub struct RoomSettings {
    /// Interval between countdown ticks
    pub tick_period: Duration,
    /// Path of the external setup page
    pub setup_path: String,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            setup_path: "/interview/setup".to_string(),
        }
    }
}

/// Flow state shared with the background tasks and the countdown timer
struct RoomInner {
    mounted: bool,
    descriptor: Option<SessionDescriptor>,
    load_error: Option<LoadError>,
    launch: LaunchSequencer,
    countdown: Option<CountdownTimer>,
    session_task: Option<JoinHandle<()>>,
    device_task: Option<JoinHandle<()>>,
}

/// Session-setup flow that runs before the first interview round
///
/// On mount the session descriptor load and the device access request run
/// independently. Start is gated on both; teardown (unmount, back, redirect,
/// drop) cancels the countdown and releases any acquired media.
pub struct WaitingRoom {
    session_id: String,
    settings: RoomSettings,
    mounted_at: DateTime<Utc>,
    authorizer: Arc<DeviceAuthorizer>,
    navigator: Arc<dyn Navigator>,
    inner: Arc<Mutex<RoomInner>>,
    session_tx: watch::Sender<SessionStatus>,
    mounted_tx: watch::Sender<bool>,
}

impl WaitingRoom {
    /// Mount the flow. Must be called within a tokio runtime.
    pub fn mount(
        session_id: impl Into<String>,
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn DeviceAccessProvider>,
        navigator: Arc<dyn Navigator>,
        settings: RoomSettings,
    ) -> Self {
        let session_id = session_id.into();
        info!("Mounting waiting room for session {}", session_id);

        let authorizer = Arc::new(DeviceAuthorizer::new(provider));
        let inner = Arc::new(Mutex::new(RoomInner {
            mounted: true,
            descriptor: None,
            load_error: None,
            launch: LaunchSequencer::new(),
            countdown: None,
            session_task: None,
            device_task: None,
        }));
        let (session_tx, _) = watch::channel(SessionStatus::Loading);
        let (mounted_tx, _) = watch::channel(true);

        let room = Self {
            session_id,
            settings,
            mounted_at: Utc::now(),
            authorizer,
            navigator,
            inner,
            session_tx,
            mounted_tx,
        };

        {
            // Tasks see the handles stored before they can observe the flow state
            let mut inner = room.inner.lock();
            inner.device_task = Some(room.spawn_device_request());
            inner.session_task = Some(room.spawn_session_load(SessionContext::new(store)));
        }

        room
    }

    fn spawn_device_request(&self) -> JoinHandle<()> {
        let authorizer = Arc::clone(&self.authorizer);
        tokio::spawn(async move {
            authorizer.authorize().await;
        })
    }

    fn spawn_session_load(&self, context: SessionContext) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let authorizer = Arc::clone(&self.authorizer);
        let navigator = Arc::clone(&self.navigator);
        let session_tx = self.session_tx.clone();
        let mounted_tx = self.mounted_tx.clone();
        let setup_path = self.settings.setup_path.clone();

        tokio::spawn(async move {
            let result = context.load().await;

            let redirect = {
                let mut guard = inner.lock();
                if !guard.mounted {
                    return;
                }

                match result {
                    Ok(descriptor) => {
                        guard.descriptor = Some(descriptor);
                        false
                    }
                    Err(e) => {
                        warn!("Session unavailable ({}), redirecting to setup", e);
                        guard.load_error = Some(e);
                        teardown(&mut guard, &authorizer, &mounted_tx);
                        true
                    }
                }
            };

            if redirect {
                session_tx.send_replace(SessionStatus::Redirected);
                navigator.go_to(&setup_path);
            } else {
                session_tx.send_replace(SessionStatus::Ready);
            }
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.lock().mounted
    }

    pub fn devices(&self) -> DeviceAuthorizationState {
        self.authorizer.state()
    }

    pub fn session_status(&self) -> SessionStatus {
        *self.session_tx.borrow()
    }

    pub fn descriptor(&self) -> Option<SessionDescriptor> {
        self.inner.lock().descriptor.clone()
    }

    pub fn load_error(&self) -> Option<LoadError> {
        self.inner.lock().load_error.clone()
    }

    /// Whether the flow currently holds acquired media
    pub fn holds_media(&self) -> bool {
        self.authorizer.holds_media()
    }

    /// True once the session is loaded, the microphone is granted and
    /// the countdown has not begun
    pub fn can_start(&self) -> bool {
        let inner = self.inner.lock();
        self.can_start_locked(&inner)
    }

    fn can_start_locked(&self, inner: &RoomInner) -> bool {
        inner.mounted
            && inner.descriptor.is_some()
            && inner.launch.can_start(self.authorizer.state().microphone)
    }

    /// Begin the countdown. A no-op returning false unless [`Self::can_start`].
    pub fn start(&self) -> bool {
        let mut inner = self.inner.lock();

        if !self.can_start_locked(&inner) {
            warn!("Start ignored for session {}: flow not ready", self.session_id);
            return false;
        }

        let Some(first_round) = inner.descriptor.as_ref().map(SessionDescriptor::first_round) else {
            return false;
        };
        if !inner.launch.start(self.authorizer.state().microphone) {
            return false;
        }

        let target = round_path(&self.session_id, first_round);
        info!("Countdown started, launching {} next", target);

        let shared = Arc::clone(&self.inner);
        let authorizer = Arc::clone(&self.authorizer);
        let navigator = Arc::clone(&self.navigator);
        let mounted_tx = self.mounted_tx.clone();

        let timer = CountdownTimer::spawn(self.settings.tick_period, move || {
            let outcome = {
                let mut guard = shared.lock();
                if !guard.mounted {
                    return ControlFlow::Break(());
                }
                let outcome = guard.launch.tick();
                if outcome == TickOutcome::Launch {
                    // Leaving for the round is this flow's exit: tear down in the
                    // same critical section so a concurrent unmount cannot slip
                    // between the launch decision and the navigation.
                    teardown(&mut guard, &authorizer, &mounted_tx);
                }
                outcome
            };

            match outcome {
                TickOutcome::Counting(_) => ControlFlow::Continue(()),
                TickOutcome::Launch => {
                    navigator.go_to(&target);
                    ControlFlow::Break(())
                }
                TickOutcome::Ignored => ControlFlow::Break(()),
            }
        });

        inner.countdown = Some(timer);
        true
    }

    /// Leave for the setup page. Does nothing once the flow has already left.
    pub fn back(&self) {
        if self.unmount() {
            info!("Leaving waiting room {} for setup", self.session_id);
            self.navigator.go_to(&self.settings.setup_path);
        }
    }

    /// Tear the flow down. Idempotent; returns true if this call unmounted it.
    pub fn unmount(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.mounted {
            info!("Unmounting waiting room {}", self.session_id);
        }
        teardown(&mut inner, &self.authorizer, &self.mounted_tx)
    }

    /// Receiver that turns false once the flow has been torn down
    pub fn subscribe_mounted(&self) -> watch::Receiver<bool> {
        self.mounted_tx.subscribe()
    }

    pub fn view(&self) -> WaitingRoomView {
        let inner = self.inner.lock();
        WaitingRoomView::build(ViewParts {
            session_id: &self.session_id,
            mounted: inner.mounted,
            mounted_at: self.mounted_at,
            session: self.session_status(),
            descriptor: inner.descriptor.as_ref(),
            devices: self.authorizer.state(),
            launch: &inner.launch,
            start_enabled: self.can_start_locked(&inner),
        })
    }

    /// Wait until the session load has either succeeded or redirected
    pub async fn wait_for_session(&self) -> SessionStatus {
        let mut rx = self.session_tx.subscribe();
        let result = match rx.wait_for(|status| *status != SessionStatus::Loading).await {
            Ok(status) => *status,
            Err(_) => self.session_status(),
        };
        result
    }

    /// Wait until device authorization resolves or the flow is torn down
    pub async fn wait_for_devices(&self) -> DeviceAuthorizationState {
        let mut mounted_rx = self.mounted_tx.subscribe();
        let torn_down = async move {
            let _ = mounted_rx.wait_for(|mounted| !*mounted).await;
        };

        tokio::select! {
            state = self.authorizer.wait_resolved() => state,
            _ = torn_down => self.authorizer.state(),
        }
    }

    /// Wait for both independent mount-time operations to settle
    pub async fn settled(&self) {
        futures::future::join(self.wait_for_session(), self.wait_for_devices()).await;
    }
}

impl Drop for WaitingRoom {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Returns whether the flow was mounted before this call
fn teardown(
    inner: &mut RoomInner,
    authorizer: &DeviceAuthorizer,
    mounted_tx: &watch::Sender<bool>,
) -> bool {
    let was_mounted = std::mem::replace(&mut inner.mounted, false);

    if let Some(timer) = inner.countdown.take() {
        timer.cancel();
    }
    if let Some(task) = inner.device_task.take() {
        task.abort();
    }
    if let Some(task) = inner.session_task.take() {
        task.abort();
    }

    authorizer.release();
    mounted_tx.send_replace(false);
    was_mounted
}
