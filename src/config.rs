use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::room::RoomSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub session: SessionStoreConfig,
    pub launch: LaunchConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionStoreConfig {
    /// Location of the persisted session descriptor (JSON)
    pub store_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LaunchConfig {
    /// Interval between countdown ticks
    pub tick_millis: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    /// Where the flow redirects when session data is unusable or the user backs out
    pub setup_path: String,
}

impl Config {
    /// Load configuration from `path` (extension optional), layered over
    /// built-in defaults and `WAITING_ROOM__*` environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "waiting-room")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 8787)?
            .set_default("session.store_path", "~/.waiting-room/session.json")?
            .set_default("launch.tick_millis", 1000)?
            .set_default("navigation.setup_path", "/interview/setup")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("WAITING_ROOM").separator("__"))
            .build()
            .with_context(|| format!("Failed to build configuration from {}", path))?;

        Ok(settings.try_deserialize()?)
    }

    /// Session store path with `~` and environment variables expanded
    pub fn store_path(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.session.store_path)
            .with_context(|| format!("Failed to expand store path {}", self.session.store_path))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    pub fn room_settings(&self) -> RoomSettings {
        RoomSettings {
            tick_period: Duration::from_millis(self.launch.tick_millis),
            setup_path: self.navigation.setup_path.clone(),
        }
    }
}
