use serde::Serialize;

/// Authorization status of a single device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Checking,
    Granted,
    Denied,
}

impl DeviceStatus {
    pub fn is_resolved(self) -> bool {
        !matches!(self, DeviceStatus::Checking)
    }
}

/// Speaker output is assumed available and never probed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerStatus {
    Granted,
}

/// Result of the single access attempt made per mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationOutcome {
    BothGranted,
    AudioOnlyGranted,
    NoneGranted,
}

/// Observable device authorization, published by the authorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceAuthorizationState {
    pub camera: DeviceStatus,
    pub microphone: DeviceStatus,
    pub speaker: SpeakerStatus,
}

impl Default for DeviceAuthorizationState {
    fn default() -> Self {
        Self::checking()
    }
}

impl DeviceAuthorizationState {
    pub fn checking() -> Self {
        Self {
            camera: DeviceStatus::Checking,
            microphone: DeviceStatus::Checking,
            speaker: SpeakerStatus::Granted,
        }
    }

    pub fn from_outcome(outcome: AuthorizationOutcome) -> Self {
        let (camera, microphone) = match outcome {
            AuthorizationOutcome::BothGranted => (DeviceStatus::Granted, DeviceStatus::Granted),
            AuthorizationOutcome::AudioOnlyGranted => (DeviceStatus::Denied, DeviceStatus::Granted),
            AuthorizationOutcome::NoneGranted => (DeviceStatus::Denied, DeviceStatus::Denied),
        };
        Self {
            camera,
            microphone,
            speaker: SpeakerStatus::Granted,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.camera.is_resolved() && self.microphone.is_resolved()
    }

    /// Apply a terminal outcome. Returns false, leaving the state untouched,
    /// if either device has already left `Checking`.
    pub fn resolve(&mut self, outcome: AuthorizationOutcome) -> bool {
        if self.camera.is_resolved() || self.microphone.is_resolved() {
            return false;
        }
        *self = Self::from_outcome(outcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_checking() {
        let state = DeviceAuthorizationState::default();
        assert_eq!(state.camera, DeviceStatus::Checking);
        assert_eq!(state.microphone, DeviceStatus::Checking);
        assert_eq!(state.speaker, SpeakerStatus::Granted);
        assert!(!state.is_resolved());
    }

    #[test]
    fn test_outcome_mapping() {
        let audio_only = DeviceAuthorizationState::from_outcome(AuthorizationOutcome::AudioOnlyGranted);
        assert_eq!(audio_only.camera, DeviceStatus::Denied);
        assert_eq!(audio_only.microphone, DeviceStatus::Granted);

        let none = DeviceAuthorizationState::from_outcome(AuthorizationOutcome::NoneGranted);
        assert_eq!(none.camera, DeviceStatus::Denied);
        assert_eq!(none.microphone, DeviceStatus::Denied);
        assert_eq!(none.speaker, SpeakerStatus::Granted);
    }

    #[test]
    fn test_resolve_happens_once() {
        let mut state = DeviceAuthorizationState::checking();
        assert!(state.resolve(AuthorizationOutcome::NoneGranted));
        assert!(!state.resolve(AuthorizationOutcome::BothGranted));
        assert_eq!(state.camera, DeviceStatus::Denied);
        assert_eq!(state.microphone, DeviceStatus::Denied);
    }
}
