//! Snapshot store: the persisted baseline for the diff engine.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{domain::DocumentRecord, Result};

/// Owns the single JSON file holding the last-known document list.
///
/// The file is replaced wholesale at the end of every successful cycle; no
/// history is kept.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted baseline. A missing file is the normal first-run
    /// condition and yields an empty list; any other failure propagates so
    /// the cycle aborts before overwriting valid state.
    pub async fn load(&self) -> Result<Vec<DocumentRecord>> {
        let txt = match tokio::fs::read_to_string(&self.path).await {
            Ok(txt) => txt,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no prior snapshot");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<DocumentRecord> = serde_json::from_str(&txt)?;
        Ok(records)
    }

    /// Replaces the persisted baseline. Writes to a sibling temp file first
    /// and renames it over the target, so a crash mid-save leaves the prior
    /// snapshot intact.
    pub async fn save(&self, records: &[DocumentRecord]) -> Result<()> {
        let txt = serde_json::to_string_pretty(records)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, txt).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}.json"))
    }

    fn sample() -> Vec<DocumentRecord> {
        vec![
            DocumentRecord {
                title: "Rules 2026 (rev A)".to_string(),
                url: "https://docs.example.org/download.ashx?DocumentID=10".to_string(),
                document_id: Some("10".to_string()),
                filename: Some("rules_2026.pdf".to_string()),
            },
            DocumentRecord {
                title: "Errata".to_string(),
                url: "https://docs.example.org/errata.pdf".to_string(),
                document_id: None,
                filename: None,
            },
        ]
    }

    #[tokio::test]
    async fn load_on_missing_file_is_empty_not_an_error() {
        let store = SnapshotStore::new(tmp_path("docwatch-missing"));
        assert_eq!(store.load().await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn save_then_load_round_trips_by_value_in_order() {
        let path = tmp_path("docwatch-roundtrip");
        let store = SnapshotStore::new(&path);

        let records = sample();
        store.save(&records).await.unwrap();
        assert_eq!(store.load().await.unwrap(), records);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn save_does_not_leave_a_temp_file_behind() {
        let path = tmp_path("docwatch-tmpfile");
        let store = SnapshotStore::new(&path);
        store.save(&sample()).await.unwrap();

        assert!(!path.with_extension("json.tmp").exists());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn corrupt_snapshot_propagates_an_error() {
        let path = tmp_path("docwatch-corrupt");
        std::fs::write(&path, "not json").unwrap();

        let store = SnapshotStore::new(&path);
        assert!(store.load().await.is_err());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn persisted_form_uses_the_stable_keys() {
        let path = tmp_path("docwatch-keys");
        let store = SnapshotStore::new(&path);
        store.save(&sample()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let first = &raw.as_array().unwrap()[0];
        for key in ["title", "url", "document_id", "filename"] {
            assert!(first.get(key).is_some(), "missing key {key}");
        }

        let _ = std::fs::remove_file(&path);
    }
}
