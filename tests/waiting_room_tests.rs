// Integration tests for the waiting room flow
//
// These tests drive the full mount → authorize → start → countdown → navigate
// sequence on tokio's paused clock, so countdown ticks advance virtual time
// instead of waiting on the wall clock.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use waiting_room::device::{DeviceStatus, SimulatedDeviceProvider, SimulatedOutcome};
use waiting_room::launch::{HistoryNavigator, LaunchPhase, Navigator};
use waiting_room::room::{
    DeviceKind, RoomSettings, SessionStatus, WaitingRoom, CAMERA_DENIED_NOTICE,
    MICROPHONE_DENIED_NOTICE,
};
use waiting_room::session::{MemoryStore, RoundKind};

const SETUP_PATH: &str = "/interview/setup";

const SPECIFIC_TECHNICAL: &str = r#"{
    "candidateName": "Grace Hopper",
    "position": "Compiler Engineer",
    "interviewMode": "specific",
    "specificRound": "technical"
}"#;

const FULL_INTERVIEW: &str = r#"{
    "candidateName": "Alan Turing",
    "position": "Research Engineer",
    "interviewMode": "full"
}"#;

struct Harness {
    room: WaitingRoom,
    provider: Arc<SimulatedDeviceProvider>,
    navigator: Arc<HistoryNavigator>,
}

fn mount_with(store: MemoryStore, provider: SimulatedDeviceProvider) -> Harness {
    let provider = Arc::new(provider);
    let navigator = Arc::new(HistoryNavigator::new());
    let room_navigator: Arc<dyn Navigator> = navigator.clone();

    let room = WaitingRoom::mount(
        "sess-1",
        Arc::new(store),
        provider.clone(),
        room_navigator,
        RoomSettings::default(),
    );

    Harness {
        room,
        provider,
        navigator,
    }
}

fn mount(record: Option<&str>, camera: SimulatedOutcome, microphone: SimulatedOutcome) -> Harness {
    mount_with(
        MemoryStore::new(record.map(str::to_string)),
        SimulatedDeviceProvider::new(camera, microphone),
    )
}

#[tokio::test(start_paused = true)]
async fn test_initial_view_is_checking() {
    let h = mount(Some(FULL_INTERVIEW), SimulatedOutcome::Grant, SimulatedOutcome::Grant);

    // Nothing has been polled yet
    let view = h.room.view();
    assert!(view.mounted);
    assert_eq!(view.session, SessionStatus::Loading);
    assert_eq!(view.device(DeviceKind::Camera).unwrap().label, "Checking...");
    assert_eq!(view.device(DeviceKind::Microphone).unwrap().label, "Checking...");
    assert_eq!(view.device(DeviceKind::Speaker).unwrap().status, DeviceStatus::Granted);
    assert!(!view.start_enabled);
    assert!(!h.room.start());
}

#[tokio::test(start_paused = true)]
async fn test_specific_round_with_all_devices() {
    let h = mount(Some(SPECIFIC_TECHNICAL), SimulatedOutcome::Grant, SimulatedOutcome::Grant);
    h.room.settled().await;

    let view = h.room.view();
    assert_eq!(view.session, SessionStatus::Ready);
    assert_eq!(view.candidate_name.as_deref(), Some("Grace Hopper"));
    assert_eq!(view.device(DeviceKind::Camera).unwrap().label, "Ready");
    assert_eq!(view.device(DeviceKind::Microphone).unwrap().label, "Ready");
    assert_eq!(view.camera_notice, None);
    assert_eq!(view.microphone_notice, None);
    assert_eq!(view.rounds.len(), 1);
    assert_eq!(view.rounds[0].name, "Technical");
    assert_eq!(view.first_round, Some(RoundKind::Technical));
    assert!(view.start_enabled);

    assert!(h.room.start());
    assert_eq!(h.room.view().countdown, Some(3));

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(h.room.view().countdown, Some(2));
    assert!(h.navigator.paths().is_empty());

    sleep(Duration::from_secs(2)).await;
    let view = h.room.view();
    assert_eq!(view.launch.phase, LaunchPhase::Launched);
    assert_eq!(view.countdown, None);
    assert!(!view.start_enabled);
    assert_eq!(h.navigator.paths(), vec!["/sess-1/round/technical"]);

    // Launching is the flow's normal exit: devices are released on the way out
    assert!(!view.mounted);
    assert_eq!(h.provider.live_tracks(), 0);
    assert!(!h.room.holds_media());
    assert!(!h.room.unmount(), "Flow already left when it launched");
    assert_eq!(h.navigator.paths().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_full_interview_audio_only() {
    let h = mount(Some(FULL_INTERVIEW), SimulatedOutcome::Deny, SimulatedOutcome::Grant);
    h.room.settled().await;

    let view = h.room.view();
    assert_eq!(view.device(DeviceKind::Camera).unwrap().label, "Denied (optional)");
    assert_eq!(view.device(DeviceKind::Microphone).unwrap().label, "Ready");
    assert_eq!(view.camera_notice, Some(CAMERA_DENIED_NOTICE));
    assert_eq!(view.rounds.len(), 5);
    assert_eq!(view.estimated_minutes, Some(100..=145));
    assert!(view.start_enabled);

    assert!(h.room.start());
    sleep(Duration::from_millis(3100)).await;

    assert_eq!(h.navigator.paths(), vec!["/sess-1/round/formal_qa"]);
}

#[tokio::test(start_paused = true)]
async fn test_missing_session_redirects_to_setup() {
    let h = mount_with(
        MemoryStore::new(None),
        SimulatedDeviceProvider::new(SimulatedOutcome::Grant, SimulatedOutcome::Grant)
            .with_delay(Duration::from_secs(10)),
    );

    assert_eq!(h.room.wait_for_session().await, SessionStatus::Redirected);
    assert_eq!(h.navigator.paths(), vec![SETUP_PATH]);
    assert!(!h.room.is_mounted());
    assert!(h.room.load_error().is_some());

    // The pending device request was abandoned and never yields live media
    sleep(Duration::from_secs(30)).await;
    assert_eq!(h.provider.live_tracks(), 0);
    assert!(!h.room.holds_media());
    assert!(!h.room.start());
    assert_eq!(h.navigator.paths().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_session_redirects_and_releases_media() {
    let h = mount(Some("not json"), SimulatedOutcome::Grant, SimulatedOutcome::Grant);

    h.room.settled().await;
    sleep(Duration::from_millis(10)).await;

    assert_eq!(h.room.session_status(), SessionStatus::Redirected);
    assert_eq!(h.navigator.paths(), vec![SETUP_PATH]);
    assert_eq!(h.provider.live_tracks(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_microphone_blocks_start() {
    let h = mount(Some(SPECIFIC_TECHNICAL), SimulatedOutcome::Deny, SimulatedOutcome::Deny);
    h.room.settled().await;

    let view = h.room.view();
    assert_eq!(view.device(DeviceKind::Camera).unwrap().status, DeviceStatus::Denied);
    assert_eq!(view.device(DeviceKind::Microphone).unwrap().label, "Denied");
    assert_eq!(view.microphone_notice, Some(MICROPHONE_DENIED_NOTICE));
    assert!(!view.start_enabled);
    assert!(!h.room.holds_media());

    assert!(!h.room.start());
    sleep(Duration::from_secs(10)).await;

    let view = h.room.view();
    assert_eq!(view.launch.phase, LaunchPhase::Idle);
    assert_eq!(view.countdown, None);
    assert!(h.navigator.paths().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_start_gate_waits_for_slow_session() {
    let h = mount_with(
        MemoryStore::new(Some(FULL_INTERVIEW.to_string())).with_delay(Duration::from_secs(2)),
        SimulatedDeviceProvider::new(SimulatedOutcome::Grant, SimulatedOutcome::Grant),
    );

    sleep(Duration::from_secs(1)).await;
    assert_eq!(h.room.devices().microphone, DeviceStatus::Granted);
    assert_eq!(h.room.session_status(), SessionStatus::Loading);
    assert!(!h.room.can_start());
    assert!(!h.room.start());

    sleep(Duration::from_secs(2)).await;
    assert!(h.room.can_start());
}

#[tokio::test(start_paused = true)]
async fn test_start_gate_waits_for_slow_devices() {
    let h = mount_with(
        MemoryStore::new(Some(FULL_INTERVIEW.to_string())),
        SimulatedDeviceProvider::new(SimulatedOutcome::Grant, SimulatedOutcome::Grant)
            .with_delay(Duration::from_secs(2)),
    );

    sleep(Duration::from_secs(1)).await;
    assert_eq!(h.room.session_status(), SessionStatus::Ready);
    assert_eq!(h.room.devices().microphone, DeviceStatus::Checking);
    assert!(!h.room.can_start());
    assert!(!h.room.start());

    sleep(Duration::from_secs(2)).await;
    assert!(h.room.can_start());
}

#[tokio::test(start_paused = true)]
async fn test_start_only_once() {
    let h = mount(Some(FULL_INTERVIEW), SimulatedOutcome::Grant, SimulatedOutcome::Grant);
    h.room.settled().await;

    assert!(h.room.start());
    sleep(Duration::from_millis(1500)).await;
    assert!(!h.room.start());
    assert_eq!(h.room.view().countdown, Some(2));

    sleep(Duration::from_secs(10)).await;
    assert_eq!(h.navigator.paths(), vec!["/sess-1/round/formal_qa"]);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_while_checking_releases_late_media() {
    let h = mount_with(
        MemoryStore::new(Some(FULL_INTERVIEW.to_string())),
        SimulatedDeviceProvider::new(SimulatedOutcome::Grant, SimulatedOutcome::Grant)
            .with_delay(Duration::from_secs(5)),
    );

    sleep(Duration::from_secs(1)).await;
    h.room.unmount();

    sleep(Duration::from_secs(10)).await;
    assert_eq!(h.provider.live_tracks(), 0);
    assert!(!h.room.view().mounted);
    assert!(!h.room.start());
    assert!(h.navigator.paths().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unmount_mid_countdown_cancels_navigation() {
    let h = mount(Some(SPECIFIC_TECHNICAL), SimulatedOutcome::Grant, SimulatedOutcome::Grant);
    h.room.settled().await;

    assert!(h.room.start());
    sleep(Duration::from_millis(1500)).await;
    h.room.unmount();

    sleep(Duration::from_secs(10)).await;
    assert!(h.navigator.paths().is_empty());
    assert_eq!(h.provider.live_tracks(), 0);
    assert_ne!(h.room.view().launch.phase, LaunchPhase::Launched);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_room_mid_countdown_cancels_navigation() {
    let h = mount(Some(SPECIFIC_TECHNICAL), SimulatedOutcome::Grant, SimulatedOutcome::Grant);
    h.room.settled().await;

    assert!(h.room.start());
    sleep(Duration::from_millis(2500)).await;

    let Harness {
        room,
        provider,
        navigator,
    } = h;
    drop(room);

    sleep(Duration::from_secs(10)).await;
    assert!(navigator.paths().is_empty());
    assert_eq!(provider.live_tracks(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_back_returns_to_setup() {
    let h = mount(Some(FULL_INTERVIEW), SimulatedOutcome::Grant, SimulatedOutcome::Grant);
    h.room.settled().await;
    assert_eq!(h.provider.live_tracks(), 2);

    h.room.back();

    assert_eq!(h.navigator.paths(), vec![SETUP_PATH]);
    assert_eq!(h.provider.live_tracks(), 0);
    assert!(!h.room.is_mounted());
    assert!(!h.room.start());
}

#[tokio::test(start_paused = true)]
async fn test_back_after_redirect_does_not_navigate_again() {
    let h = mount(None, SimulatedOutcome::Grant, SimulatedOutcome::Grant);

    assert_eq!(h.room.wait_for_session().await, SessionStatus::Redirected);
    h.room.back();

    assert_eq!(h.navigator.paths(), vec![SETUP_PATH]);
}

#[tokio::test(start_paused = true)]
async fn test_back_after_launch_does_not_navigate() {
    let h = mount(Some(FULL_INTERVIEW), SimulatedOutcome::Grant, SimulatedOutcome::Grant);
    h.room.settled().await;

    assert!(h.room.start());
    sleep(Duration::from_millis(3100)).await;
    h.room.back();

    assert_eq!(h.navigator.paths(), vec!["/sess-1/round/formal_qa"]);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_reports_first_teardown_only() {
    let h = mount(Some(FULL_INTERVIEW), SimulatedOutcome::Grant, SimulatedOutcome::Grant);
    h.room.settled().await;

    let mut mounted_rx = h.room.subscribe_mounted();
    assert!(*mounted_rx.borrow_and_update());

    assert!(h.room.unmount());
    assert!(!h.room.unmount());
    assert!(!*mounted_rx.borrow());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_redirect_on_multi_thread_runtime_abandons_device_request() {
    let h = mount_with(
        MemoryStore::new(None),
        SimulatedDeviceProvider::new(SimulatedOutcome::Grant, SimulatedOutcome::Grant)
            .with_delay(Duration::from_millis(200)),
    );

    assert_eq!(h.room.wait_for_session().await, SessionStatus::Redirected);
    sleep(Duration::from_millis(400)).await;

    // The pending request was cancelled with the redirect, so no media was ever granted
    assert_eq!(h.provider.issued_tracks(), 0);
    assert_eq!(h.navigator.paths(), vec![SETUP_PATH]);
}
