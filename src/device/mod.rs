pub mod authorizer;
pub mod provider;
pub mod simulated;
pub mod state;

pub use authorizer::DeviceAuthorizer;
pub use provider::{
    DeviceAccessError, DeviceAccessProvider, MediaConstraints, MediaHandle, MediaTrack, TrackKind,
};
pub use simulated::{SimulatedDeviceProvider, SimulatedOutcome};
pub use state::{AuthorizationOutcome, DeviceAuthorizationState, DeviceStatus, SpeakerStatus};
