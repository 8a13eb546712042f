use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Key-value persistence holding the raw session descriptor record
///
/// Implementations return `Ok(None)` when nothing has been stored.
/// Parsing and validation belong to [`super::SessionContext`].
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_raw(&self) -> io::Result<Option<String>>;

    /// Store name for logging
    fn name(&self) -> &str;
}

/// Descriptor persisted as a JSON file on disk
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a raw record, creating parent directories as needed
    pub async fn save_raw(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, contents).await?;
        info!("Stored session descriptor at {}", self.path.display());
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionStore for JsonFileStore {
    async fn load_raw(&self) -> io::Result<Option<String>> {
        debug!("Reading session descriptor from {}", self.path.display());

        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

/// In-process store, optionally delaying reads to exercise completion ordering
#[derive(Default)]
pub struct MemoryStore {
    record: Mutex<Option<String>>,
    delay: Option<Duration>,
}

impl MemoryStore {
    pub fn new(record: Option<String>) -> Self {
        Self {
            record: Mutex::new(record),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set(&self, record: Option<String>) {
        *self.record.lock() = record;
    }
}

#[async_trait::async_trait]
impl SessionStore for MemoryStore {
    async fn load_raw(&self) -> io::Result<Option<String>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.record.lock().clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
