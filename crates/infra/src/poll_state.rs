//! File-backed poll cursor store
//!
//! Cursors are kept in one JSON object keyed by trigger key, with RFC 3339
//! timestamps as values. A missing file reads as "never polled".

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fishbowl_core::ports::PollStateStore;
use fishbowl_domain::utils::{parse_timestamp_str, to_iso_string};
use fishbowl_domain::{FishbowlError, Result};
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::InfraError;

type Cursors = BTreeMap<String, String>;

/// Poll cursors persisted to a JSON file.
#[derive(Debug)]
pub struct FilePollStateStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePollStateStore {
    /// Store backed by `path`; the file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Cursors> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Cursors::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                let path = self.path.display();
                FishbowlError::Config(format!("Invalid poll state file {path}: {e}"))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Cursors::new()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}

#[async_trait]
impl PollStateStore for FilePollStateStore {
    async fn last_poll_time(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let cursors = self.read().await?;
        cursors.get(key).map(String::as_str).map(parse_timestamp_str).transpose()
    }

    async fn set_last_poll_time(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut cursors = self.read().await?;
        cursors.insert(key.to_string(), to_iso_string(&at));

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }
        let contents = serde_json::to_string_pretty(&cursors)?;
        tokio::fs::write(&self.path, contents).await.map_err(InfraError::from)?;

        debug!(key, path = %self.path.display(), "poll_cursor_saved");
        Ok(())
    }
}
