use crate::device::DeviceAccessProvider;
use crate::launch::HistoryNavigator;
use crate::room::{RoomSettings, WaitingRoom};
use crate::session::SessionStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Mounted waiting rooms (session_id → room)
    pub rooms: Arc<RwLock<HashMap<String, Arc<WaitingRoom>>>>,

    /// Where session descriptors are read from
    pub store: Arc<dyn SessionStore>,

    /// Host device access capability
    pub provider: Arc<dyn DeviceAccessProvider>,

    /// Records every navigation the rooms request
    pub navigator: Arc<HistoryNavigator>,

    pub settings: RoomSettings,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn DeviceAccessProvider>,
        settings: RoomSettings,
    ) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            store,
            provider,
            navigator: Arc::new(HistoryNavigator::new()),
            settings,
        }
    }
}
