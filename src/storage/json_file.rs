//! A `Storage` that keeps the whole collection in one JSON file.

use crate::error::{Error, ErrorType, IntoResult, Res, Result};
use crate::model::{Transaction, TransactionFields, TransactionId};
use crate::storage::Storage;
use crate::utils;
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Stores transactions as a pretty-printed JSON array. Every operation reads the file, and every
/// write rewrites it. A missing file reads as an empty collection.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the file with an empty collection, refusing to overwrite an existing file.
    pub(crate) async fn init(path: impl Into<PathBuf>) -> Res<Self> {
        let storage = Self::new(path);
        if utils::exists(&storage.path).await? {
            bail!(
                "Refusing to overwrite existing data file '{}'",
                storage.path.display()
            );
        }
        storage.save(&[]).await?;
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Res<Vec<Transaction>> {
        if !utils::exists(&self.path).await? {
            trace!("{} does not exist yet", self.path.display());
            return Ok(Vec::new());
        }
        let transactions: Vec<Transaction> = utils::deserialize(&self.path).await?;
        if let Some(t) = transactions.iter().find(|t| t.amount().to_minor().is_none()) {
            bail!(
                "Transaction '{}' in '{}' has an amount that is out of range: {}",
                t.id(),
                self.path.display(),
                t.amount().value()
            );
        }
        Ok(transactions)
    }

    async fn save(&self, transactions: &[Transaction]) -> Res<()> {
        let data =
            serde_json::to_string_pretty(transactions).context("Unable to serialize transactions")?;
        utils::write(&self.path, data).await
    }

    async fn load_for_write(&self) -> Result<Vec<Transaction>> {
        self.load()
            .await
            .context("Unable to read the data file before writing")
            .pub_result(ErrorType::Storage)
    }

    async fn save_for_write(&self, transactions: &[Transaction]) -> Result<()> {
        self.save(transactions).await.pub_result(ErrorType::Storage)
    }
}

fn position(transactions: &[Transaction], id: &TransactionId) -> Result<usize> {
    transactions
        .iter()
        .position(|t| t.id() == id)
        .ok_or_else(|| Error::not_found(format!("No stored transaction has the id '{id}'")))
}

#[async_trait::async_trait]
impl Storage for JsonFileStorage {
    async fn fetch_all(&mut self) -> Result<Vec<Transaction>> {
        self.load().await.pub_result(ErrorType::Storage)
    }

    async fn insert(&mut self, fields: &TransactionFields) -> Result<TransactionId> {
        let mut transactions = self.load_for_write().await?;
        let id = utils::generate_transaction_id();
        transactions.push(Transaction::new(id.clone(), fields.clone()));
        self.save_for_write(&transactions).await?;
        Ok(id)
    }

    async fn patch(&mut self, id: &TransactionId, fields: &TransactionFields) -> Result<()> {
        let mut transactions = self.load_for_write().await?;
        let i = position(&transactions, id)?;
        transactions[i] = Transaction::new(id.clone(), fields.clone());
        self.save_for_write(&transactions).await
    }

    async fn remove_by_id(&mut self, id: &TransactionId) -> Result<()> {
        let mut transactions = self.load_for_write().await?;
        let i = position(&transactions, id)?;
        transactions.remove(i);
        self.save_for_write(&transactions).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionType::{Expense, Income};
    use crate::test::fields;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::new(dir.path().join("none.json"));
        assert!(storage.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.json");
        JsonFileStorage::init(&path).await.unwrap();
        assert_eq!(utils::read(&path).await.unwrap(), "[]");
        assert!(JsonFileStorage::init(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.json");
        let mut storage = JsonFileStorage::init(&path).await.unwrap();
        let income = fields(Income, "100", "Udemy", "Bank", "2024-03-05");
        let expense = fields(Expense, "30.25", "Leisure", "Bank", "2024-03-10");
        let a = storage.insert(&income).await.unwrap();
        let b = storage.insert(&expense).await.unwrap();

        // A second handle on the same file sees the same records, in insertion order.
        let mut other = JsonFileStorage::new(&path);
        let all = other.fetch_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), &a);
        assert_eq!(all[0].fields(), &income);
        assert_eq!(all[1].id(), &b);
        assert_eq!(all[1].fields(), &expense);

        storage.remove_by_id(&a).await.unwrap();
        let all = other.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id(), &b);
    }

    #[tokio::test]
    async fn test_patch_unknown_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::init(dir.path().join("t.json")).await.unwrap();
        let e = storage
            .patch(
                &TransactionId::new("txn-x"),
                &fields(Income, "1", "Udemy", "Bank", "2024-03-05"),
            )
            .await
            .unwrap_err();
        assert!(e.is_not_found());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.json");
        utils::write(&path, "{ not json").await.unwrap();
        let mut storage = JsonFileStorage::new(&path);
        assert!(storage.fetch_all().await.unwrap_err().is_storage());
    }

    #[tokio::test]
    async fn test_out_of_range_amount_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.json");
        let record = r#"[{
            "id": "txn-1",
            "type": "income",
            "amount": "79228162514264337593543950335",
            "account": "Bank",
            "category": "Udemy",
            "date": "2024-03-05"
        }]"#;
        utils::write(&path, record).await.unwrap();
        let mut storage = JsonFileStorage::new(&path);
        let e = storage.fetch_all().await.unwrap_err();
        assert!(e.is_storage());
        assert!(e.to_string().contains("out of range"), "{e}");
    }
}
