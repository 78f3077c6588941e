use crate::error::Res;
use crate::model::TransactionId;
use anyhow::Context;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Res<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Unable to write to {}", path.display()))
}

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Res<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub(crate) async fn deserialize<T>(path: &Path) -> Res<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Creates `path` and any missing parents.
pub(crate) async fn make_dir(path: &Path) -> Res<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Unable to create directory {}", path.display()))
}

pub(crate) async fn canonicalize(path: &Path) -> Res<PathBuf> {
    tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("Unable to resolve path {}", path.display()))
}

/// Returns true if something exists at `path`.
pub(crate) async fn exists(path: &Path) -> Res<bool> {
    tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("Unable to check for {}", path.display()))
}

/// Generates a new, unique transaction id: `txn-` followed by a v4 UUID.
pub(crate) fn generate_transaction_id() -> TransactionId {
    TransactionId::new(format!("txn-{}", Uuid::new_v4()))
}

/// Today's date on the local calendar.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_read_exists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b.json");
        assert!(!exists(&path).await.unwrap());
        make_dir(path.parent().unwrap()).await.unwrap();
        write(&path, "[1, 2]").await.unwrap();
        assert!(exists(&path).await.unwrap());
        let numbers: Vec<u8> = deserialize(&path).await.unwrap();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_read_missing_has_path_context() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.txt");
        let message = format!("{:#}", read(&path).await.unwrap_err());
        assert!(message.contains("nope.txt"), "{message}");
    }

    #[test]
    fn test_generate_transaction_id() {
        let a = generate_transaction_id();
        let b = generate_transaction_id();
        assert!(a.as_str().starts_with("txn-"));
        assert_ne!(a, b);
    }
}
