//! A `Storage` that keeps transactions in memory.

use crate::error::{Error, Result};
use crate::model::{Transaction, TransactionFields, TransactionId};
use crate::storage::Storage;
use crate::utils::generate_transaction_id;
use std::sync::{Arc, Mutex, MutexGuard};

/// An in-memory `Storage`. Clones share state, so a caller can hand one clone to a `Store` and
/// keep another to inspect or disturb the backend: make reads or writes fail, count calls, or
/// write records behind the store's back.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    transactions: Vec<Transaction>,
    fail_reads: bool,
    fail_writes: bool,
    calls: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `transactions`.
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let storage = Self::default();
        if let Ok(mut state) = storage.state.lock() {
            state.transactions = transactions;
        }
        storage
    }

    /// When set, `fetch_all` fails with a `Storage` error.
    pub fn set_fail_reads(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_reads = fail;
        }
    }

    /// When set, `insert`, `patch` and `remove_by_id` fail with a `Storage` error.
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_writes = fail;
        }
    }

    /// The number of `Storage` calls made so far, failed calls included.
    pub fn calls(&self) -> usize {
        self.state.lock().map(|s| s.calls).unwrap_or_default()
    }

    /// A copy of the stored transactions.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state
            .lock()
            .map(|s| s.transactions.clone())
            .unwrap_or_default()
    }

    /// Adds a transaction directly, as another session writing to the same backend would.
    pub fn push(&self, transaction: Transaction) {
        if let Ok(mut state) = self.state.lock() {
            state.transactions.push(transaction);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| Error::storage("The in-memory storage lock is poisoned"))?;
        state.calls += 1;
        Ok(state)
    }

    fn lock_for_write(&self) -> Result<MutexGuard<'_, MemoryState>> {
        let state = self.lock()?;
        if state.fail_writes {
            return Err(Error::storage("The in-memory storage is refusing writes"));
        }
        Ok(state)
    }

    fn position(state: &MemoryState, id: &TransactionId) -> Result<usize> {
        state
            .transactions
            .iter()
            .position(|t| t.id() == id)
            .ok_or_else(|| Error::not_found(format!("No stored transaction has the id '{id}'")))
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn fetch_all(&mut self) -> Result<Vec<Transaction>> {
        let state = self.lock()?;
        if state.fail_reads {
            return Err(Error::storage("The in-memory storage is refusing reads"));
        }
        Ok(state.transactions.clone())
    }

    async fn insert(&mut self, fields: &TransactionFields) -> Result<TransactionId> {
        let mut state = self.lock_for_write()?;
        let id = generate_transaction_id();
        state
            .transactions
            .push(Transaction::new(id.clone(), fields.clone()));
        Ok(id)
    }

    async fn patch(&mut self, id: &TransactionId, fields: &TransactionFields) -> Result<()> {
        let mut state = self.lock_for_write()?;
        let i = Self::position(&state, id)?;
        state.transactions[i] = Transaction::new(id.clone(), fields.clone());
        Ok(())
    }

    async fn remove_by_id(&mut self, id: &TransactionId) -> Result<()> {
        let mut state = self.lock_for_write()?;
        let i = Self::position(&state, id)?;
        state.transactions.remove(i);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fields;
    use crate::model::TransactionType::Expense;

    #[tokio::test]
    async fn test_insert_fetch_patch_remove() {
        let mut storage = MemoryStorage::new();
        let id = storage
            .insert(&fields(Expense, "30", "Leisure", "Bank", "2024-03-10"))
            .await
            .unwrap();
        let all = storage.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id(), &id);

        let changed = fields(Expense, "31", "Leisure", "Bank", "2024-03-10");
        storage.patch(&id, &changed).await.unwrap();
        assert_eq!(storage.transactions()[0].fields(), &changed);

        storage.remove_by_id(&id).await.unwrap();
        assert!(storage.fetch_all().await.unwrap().is_empty());
        assert_eq!(storage.calls(), 5);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let mut storage = MemoryStorage::new();
        let id = TransactionId::new("txn-missing");
        let f = fields(Expense, "30", "Leisure", "Bank", "2024-03-10");
        assert!(storage.patch(&id, &f).await.unwrap_err().is_not_found());
        assert!(storage.remove_by_id(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let mut storage = MemoryStorage::new();
        let handle = storage.clone();
        handle.set_fail_reads(true);
        assert!(storage.fetch_all().await.unwrap_err().is_storage());
        handle.set_fail_writes(true);
        let f = fields(Expense, "30", "Leisure", "Bank", "2024-03-10");
        assert!(storage.insert(&f).await.unwrap_err().is_storage());
        assert!(handle.transactions().is_empty());
        assert_eq!(handle.calls(), 2);
    }
}
