pub mod config;
pub mod device;
pub mod http;
pub mod launch;
pub mod room;
pub mod session;

pub use config::Config;
pub use device::{
    AuthorizationOutcome, DeviceAccessError, DeviceAccessProvider, DeviceAuthorizationState,
    DeviceAuthorizer, DeviceStatus, MediaConstraints, MediaHandle, SimulatedDeviceProvider,
    SimulatedOutcome,
};
pub use http::{create_router, AppState};
pub use launch::{HistoryNavigator, LaunchPhase, LaunchSequencer, Navigator, COUNTDOWN_TICKS};
pub use room::{RoomSettings, WaitingRoom, WaitingRoomView};
pub use session::{
    InterviewMode, JsonFileStore, LoadError, MemoryStore, RoundKind, SessionContext,
    SessionDescriptor, SessionStore,
};
