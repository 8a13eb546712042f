use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use crate::session::RoundKind;

/// Routing collaborator the flow hands transitions to
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

/// Path of an interview round: `/<session_id>/round/<round>`
pub fn round_path(session_id: &str, round: RoundKind) -> String {
    format!("/{}/round/{}", session_id, round.slug())
}

/// A navigation that happened
#[derive(Debug, Clone, Serialize)]
pub struct NavigationEntry {
    pub path: String,
    pub at: DateTime<Utc>,
}

/// Navigator that records every transition in order
#[derive(Default)]
pub struct HistoryNavigator {
    entries: Mutex<Vec<NavigationEntry>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<NavigationEntry> {
        self.entries.lock().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.entries.lock().iter().map(|entry| entry.path.clone()).collect()
    }

    pub fn last_path(&self) -> Option<String> {
        self.entries.lock().last().map(|entry| entry.path.clone())
    }
}

impl Navigator for HistoryNavigator {
    fn go_to(&self, path: &str) {
        info!("Navigating to {}", path);
        self.entries.lock().push(NavigationEntry {
            path: path.to_string(),
            at: Utc::now(),
        });
    }
}
