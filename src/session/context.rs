use std::sync::Arc;
use tracing::{info, warn};

use super::descriptor::SessionDescriptor;
use super::store::SessionStore;

/// Why a session descriptor could not be loaded. Both variants redirect to setup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("no session descriptor stored")]
    Missing,

    #[error("stored session descriptor is malformed: {0}")]
    Malformed(String),
}

/// Read-only access to the descriptor the waiting room is opened for
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<SessionDescriptor, LoadError> {
        let raw = match self.store.load_raw().await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                warn!("No session descriptor in {} store", self.store.name());
                return Err(LoadError::Missing);
            }
            Err(e) => {
                warn!("Failed to read session descriptor: {}", e);
                return Err(LoadError::Malformed(e.to_string()));
            }
        };

        if raw.trim().is_empty() {
            warn!("Session descriptor record is empty");
            return Err(LoadError::Missing);
        }

        let descriptor: SessionDescriptor = serde_json::from_str(&raw).map_err(|e| {
            warn!("Failed to parse session descriptor: {}", e);
            LoadError::Malformed(e.to_string())
        })?;

        info!(
            "Loaded session for {} ({}), mode={:?}, first round={}",
            descriptor.candidate_name,
            descriptor.position,
            descriptor.interview_mode,
            descriptor.first_round()
        );

        Ok(descriptor)
    }
}
