use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ops::RangeInclusive;

use crate::device::{DeviceAuthorizationState, DeviceStatus};
use crate::launch::{LaunchSequencer, LaunchState};
use crate::session::{estimated_minutes, RoundInfo, RoundKind, SessionDescriptor};

pub const CAMERA_DENIED_NOTICE: &str =
    "Camera access denied (optional). The interview can continue with audio only.";

pub const MICROPHONE_DENIED_NOTICE: &str =
    "Microphone access is required. Allow microphone access for this site in your browser settings, then reload the page.";

/// Where the session descriptor load stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Loading,
    Ready,
    Redirected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Camera,
    Microphone,
    Speaker,
}

/// One row of the device status panel
#[derive(Debug, Clone, Serialize)]
pub struct DeviceRow {
    pub device: DeviceKind,
    pub status: DeviceStatus,
    pub label: &'static str,
}

impl DeviceRow {
    fn new(device: DeviceKind, status: DeviceStatus) -> Self {
        let label = match (device, status) {
            (_, DeviceStatus::Checking) => "Checking...",
            (_, DeviceStatus::Granted) => "Ready",
            (DeviceKind::Camera, DeviceStatus::Denied) => "Denied (optional)",
            (_, DeviceStatus::Denied) => "Denied",
        };
        Self {
            device,
            status,
            label,
        }
    }
}

/// Render model of the waiting room
#[derive(Debug, Clone, Serialize)]
pub struct WaitingRoomView {
    pub session_id: String,
    pub mounted: bool,
    pub mounted_at: DateTime<Utc>,
    pub session: SessionStatus,
    pub candidate_name: Option<String>,
    pub position: Option<String>,
    pub devices: Vec<DeviceRow>,
    pub camera_notice: Option<&'static str>,
    pub microphone_notice: Option<&'static str>,
    pub start_enabled: bool,
    pub launch: LaunchState,
    pub countdown: Option<u32>,
    pub first_round: Option<RoundKind>,
    pub rounds: Vec<&'static RoundInfo>,
    pub estimated_minutes: Option<RangeInclusive<u32>>,
}

pub(crate) struct ViewParts<'a> {
    pub session_id: &'a str,
    pub mounted: bool,
    pub mounted_at: DateTime<Utc>,
    pub session: SessionStatus,
    pub descriptor: Option<&'a SessionDescriptor>,
    pub devices: DeviceAuthorizationState,
    pub launch: &'a LaunchSequencer,
    pub start_enabled: bool,
}

impl WaitingRoomView {
    pub(crate) fn build(parts: ViewParts<'_>) -> Self {
        let devices = parts.devices;
        let planned = parts
            .descriptor
            .map(SessionDescriptor::planned_rounds)
            .unwrap_or_default();

        Self {
            session_id: parts.session_id.to_string(),
            mounted: parts.mounted,
            mounted_at: parts.mounted_at,
            session: parts.session,
            candidate_name: parts.descriptor.map(|d| d.candidate_name.clone()),
            position: parts.descriptor.map(|d| d.position.clone()),
            devices: vec![
                DeviceRow::new(DeviceKind::Camera, devices.camera),
                DeviceRow::new(DeviceKind::Microphone, devices.microphone),
                // Speaker output is never probed
                DeviceRow::new(DeviceKind::Speaker, DeviceStatus::Granted),
            ],
            camera_notice: (devices.camera == DeviceStatus::Denied).then_some(CAMERA_DENIED_NOTICE),
            microphone_notice: (devices.microphone == DeviceStatus::Denied)
                .then_some(MICROPHONE_DENIED_NOTICE),
            start_enabled: parts.start_enabled,
            launch: parts.launch.state(),
            countdown: parts.launch.countdown(),
            first_round: parts.descriptor.map(SessionDescriptor::first_round),
            rounds: planned.iter().map(|round| round.info()).collect(),
            estimated_minutes: (!planned.is_empty()).then(|| estimated_minutes(&planned)),
        }
    }

    pub fn device(&self, device: DeviceKind) -> Option<&DeviceRow> {
        self.devices.iter().find(|row| row.device == device)
    }
}
