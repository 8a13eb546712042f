//! Waiting room flow
//!
//! Ties the session context, device authorizer and launch sequencer together:
//! - `WaitingRoom::mount` starts the session load and device request concurrently
//! - `WaitingRoom::view` produces the render model for the UI shell
//! - `start` / `back` / `unmount` drive the user-facing transitions

mod view;
mod waiting_room;

pub use view::{
    DeviceKind, DeviceRow, SessionStatus, WaitingRoomView, CAMERA_DENIED_NOTICE,
    MICROPHONE_DENIED_NOTICE,
};
pub use waiting_room::{RoomSettings, WaitingRoom};
