//! The persistence seam. The store only talks to a `Storage`, so the same ledger runs against
//! SQLite, a JSON file, or memory.

mod json_file;
mod memory;

use crate::error::Result;
use crate::model::{Transaction, TransactionFields, TransactionId};
use serde::{Deserialize, Serialize};

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

/// A backend that persists transactions.
///
/// Implementations assign ids on `insert`. `patch` and `remove_by_id` fail with a `NotFound` error
/// for an id the backend does not hold. Any transport or permission failure is a `Storage` error.
/// Nothing is retried.
#[async_trait::async_trait]
pub trait Storage: Send {
    /// Returns every stored transaction, in insertion order.
    async fn fetch_all(&mut self) -> Result<Vec<Transaction>>;

    /// Stores a new transaction and returns the id it was given.
    async fn insert(&mut self, fields: &TransactionFields) -> Result<TransactionId>;

    /// Replaces every field of the transaction with `id`.
    async fn patch(&mut self, id: &TransactionId, fields: &TransactionFields) -> Result<()>;

    async fn remove_by_id(&mut self, id: &TransactionId) -> Result<()>;
}

/// The persistent backends that a home directory can be configured with.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// A SQLite database file.
    #[default]
    Sqlite,
    /// A single pretty-printed JSON file.
    Json,
}

serde_plain::derive_display_from_serialize!(StorageKind);
serde_plain::derive_fromstr_from_deserialize!(StorageKind);

impl StorageKind {
    /// The data file name used when the config does not name one.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            StorageKind::Sqlite => "fintrack.sqlite",
            StorageKind::Json => "transactions.json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_storage_kind_strings() {
        assert_eq!(StorageKind::default(), StorageKind::Sqlite);
        assert_eq!(StorageKind::Json.to_string(), "json");
        assert_eq!(StorageKind::from_str("sqlite").unwrap(), StorageKind::Sqlite);
        assert_eq!(StorageKind::Sqlite.default_file_name(), "fintrack.sqlite");
    }
}
