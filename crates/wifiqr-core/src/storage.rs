//! Persistent storage for Wi-Fi records.
//!
//! Records live in memory behind a [`RwLock`] and are written through to a
//! single pretty-printed JSON file on every create. Writes go to a temporary
//! sibling file first and are then renamed over the target.

use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::lookup::RecordLookup;
use crate::types::{CredentialRecord, NewNetwork, RecordId};

/// File name used inside the data directory.
pub const RECORDS_FILE: &str = "networks.json";

/// JSON-file backed record store.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: RwLock<Vec<CredentialRecord>>,
}

impl JsonStore {
    /// Open the store at `path`, loading existing records if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), count = records.len(), "Opened record store");

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Open `networks.json` inside `data_dir`.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::open`].
    pub async fn open_in(data_dir: &Path) -> Result<Self> {
        Self::open(data_dir.join(RECORDS_FILE)).await
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in creation order.
    pub async fn list(&self) -> Vec<CredentialRecord> {
        self.records.read().await.clone()
    }

    /// Fetch one record.
    pub async fn get(&self, id: &RecordId) -> Option<CredentialRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == *id)
            .cloned()
    }

    /// Store a new record under a fresh identifier.
    ///
    /// The record is only kept in memory if it was persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be written.
    pub async fn create(&self, network: NewNetwork) -> Result<CredentialRecord> {
        let record = network.into_record(RecordId::new_v4());

        let mut records = self.records.write().await;
        records.push(record.clone());
        if let Err(e) = self.persist(&records).await {
            records.pop();
            return Err(e);
        }

        debug!(id = %record.id, "Created record");
        Ok(record)
    }

    async fn persist(&self, records: &[CredentialRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl RecordLookup for JsonStore {
    async fn lookup(&self, id: &RecordId) -> Option<CredentialRecord> {
        self.get(id).await
    }

    async fn lookup_many(
        &self,
        ids: &[RecordId],
    ) -> std::collections::HashMap<RecordId, CredentialRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .filter(|r| ids.contains(&r.id))
            .map(|r| (r.id, r.clone()))
            .collect()
    }
}

/// Get the default data directory.
///
/// On Linux: `/var/lib/wifiqr/`
/// Elsewhere: the platform data directory for `wifiqr`.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/var/lib/wifiqr")
    }
    #[cfg(not(target_os = "linux"))]
    {
        directories::ProjectDirs::from("", "", "wifiqr")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SecurityMode;

    fn network(ssid: &str) -> NewNetwork {
        NewNetwork {
            ssid: ssid.into(),
            password: Some("password1".into()),
            security: SecurityMode::Wpa2,
            hidden: false,
        }
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open_in(dir.path()).await.unwrap();
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open_in(dir.path()).await.unwrap();

        let home = store.create(network("Home")).await.unwrap();
        let guest = store.create(network("Guest")).await.unwrap();
        assert_ne!(home.id, guest.id);

        let reopened = JsonStore::open_in(dir.path()).await.unwrap();
        let records = reopened.list().await;
        assert_eq!(records, vec![home.clone(), guest]);
        assert_eq!(reopened.get(&home.id).await, Some(home));
    }

    #[tokio::test]
    async fn test_lookup_many_returns_only_known_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open_in(dir.path()).await.unwrap();
        let a = store.create(network("A")).await.unwrap();

        let found = store.lookup_many(&[a.id, RecordId::new_v4()]).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found.get(&a.id), Some(&a));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RECORDS_FILE), "not json").unwrap();
        let err = JsonStore::open_in(dir.path()).await.unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_default_data_dir_is_valid_path() {
        assert!(!default_data_dir().as_os_str().is_empty());
    }
}
