//! One directory of pretty-printed JSON records, one file per key.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::infrastructure::ports::{validate_record_key, RepoError};

const RECORD_EXTENSION: &str = "json";

/// A directory holding one `{key}.json` file per record.
///
/// Every call goes to disk. Listing scans the whole directory and returns
/// records in the order the filesystem yields them, which is unspecified.
#[derive(Debug, Clone)]
pub(super) struct JsonDirectory {
    path: PathBuf,
    kind: &'static str,
}

impl JsonDirectory {
    pub(super) fn new(path: PathBuf, kind: &'static str) -> Self {
        Self { path, kind }
    }

    pub(super) async fn ensure_exists(&self) -> Result<(), RepoError> {
        tokio::fs::create_dir_all(&self.path)
            .await
            .map_err(|e| RepoError::storage("create_dir", format!("{}: {e}", self.path.display())))
    }

    pub(super) fn file_for(&self, key: &str) -> Result<PathBuf, RepoError> {
        validate_record_key(key)?;
        Ok(self.path.join(format!("{key}.{RECORD_EXTENSION}")))
    }

    pub(super) async fn load_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, RepoError> {
        let mut entries = tokio::fs::read_dir(&self.path)
            .await
            .map_err(|e| RepoError::storage("read_dir", format!("{}: {e}", self.path.display())))?;

        let mut records = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepoError::storage("read_dir", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            tracing::debug!(kind = self.kind, path = %path.display(), "Loading record");
            records.push(read_record(&path).await?);
        }
        Ok(records)
    }

    pub(super) async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, RepoError> {
        let path = self.file_for(key)?;
        tracing::debug!(kind = self.kind, path = %path.display(), "Loading record");
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| RepoError::storage("stat", format!("{}: {e}", path.display())))?;
        if !exists {
            return Ok(None);
        }
        read_record(&path).await.map(Some)
    }

    pub(super) async fn store<T: Serialize>(&self, key: &str, record: &T) -> Result<(), RepoError> {
        let path = self.file_for(key)?;
        tracing::debug!(kind = self.kind, path = %path.display(), "Saving record");
        let bytes = to_pretty_json(record).map_err(|e| RepoError::serialization_at(&path, e))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| RepoError::storage("write", format!("{}: {e}", path.display())))
    }
}

async fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T, RepoError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| RepoError::storage("read", format!("{}: {e}", path.display())))?;
    serde_json::from_slice(&bytes).map_err(|e| RepoError::serialization_at(path, e))
}

/// Serialize with four-space indentation, leaving non-ASCII text unescaped.
fn to_pretty_json<T: Serialize>(record: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    record.serialize(&mut serializer)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_for_escaping_keys_are_refused() {
        let dir = JsonDirectory::new(PathBuf::from("/data/characters"), "character");
        assert_eq!(
            dir.file_for("mira").expect("plain key"),
            PathBuf::from("/data/characters/mira.json")
        );
        assert!(matches!(dir.file_for("../etc"), Err(RepoError::InvalidKey(_))));
    }

    #[test]
    fn pretty_json_uses_four_spaces_and_keeps_unicode() {
        let bytes = to_pretty_json(&serde_json::json!({"name": "Zoë"})).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        assert_eq!(text, "{\n    \"name\": \"Zoë\"\n}");
    }
}
