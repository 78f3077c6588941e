//! The transaction store: the one owner of the working set of transactions.
//!
//! The store never edits its own list. Every successful mutation is followed by a full reload from
//! the backend, so the list only ever reflects what the backend has confirmed, including writes
//! made by other sessions in the meantime.

use crate::error::{Error, Result};
use crate::model::{Transaction, TransactionId, TransactionInput, TransactionUpdates};
use crate::storage::Storage;
use crate::utils;
use tracing::{debug, trace, warn};

pub struct Store {
    storage: Box<dyn Storage>,
    transactions: Vec<Transaction>,
}

impl Store {
    /// Creates a store over `storage` with an empty working set. Call `reload` to fill it.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            transactions: Vec::new(),
        }
    }

    /// Creates a store and loads the working set from `storage`.
    ///
    /// # Errors
    /// Returns a `Storage` error if the backend cannot be read.
    pub async fn init(storage: Box<dyn Storage>) -> Result<Self> {
        let mut store = Self::new(storage);
        store.reload().await?;
        Ok(store)
    }

    /// Replaces the working set with the backend's records. On failure the working set is left as
    /// it was.
    pub async fn reload(&mut self) -> Result<()> {
        let transactions = self
            .storage
            .fetch_all()
            .await
            .map_err(|e| e.context("Unable to load transactions"))?;
        trace!("Loaded {} transactions", transactions.len());
        self.transactions = transactions;
        Ok(())
    }

    /// Validates `input`, defaults its date to today, and stores it.
    ///
    /// # Errors
    /// - `Validation` if the input breaks a transaction rule. Storage is not called.
    /// - `Storage` if the backend rejects the write.
    pub async fn add(&mut self, input: TransactionInput) -> Result<Transaction> {
        let fields = input.into_fields(utils::today())?;
        let id = self
            .storage
            .insert(&fields)
            .await
            .map_err(|e| e.context("Unable to save the new transaction"))?;
        debug!("Added transaction {id}");
        self.resync().await;
        Ok(self
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Transaction::new(id, fields)))
    }

    /// Applies `updates` to the transaction with `id`. The merged record is validated as a whole.
    ///
    /// # Errors
    /// - `NotFound` if no transaction with `id` is loaded, or the backend no longer has it.
    /// - `Validation` if the merged record breaks a transaction rule. Storage is not called.
    /// - `Storage` if the backend rejects the write.
    pub async fn update(
        &mut self,
        id: &TransactionId,
        updates: &TransactionUpdates,
    ) -> Result<Transaction> {
        let current = self.require(id)?;
        let fields = updates.apply(current.fields())?;
        self.storage
            .patch(id, &fields)
            .await
            .map_err(|e| e.context(format!("Unable to save changes to transaction '{id}'")))?;
        debug!("Updated transaction {id}");
        self.resync().await;
        Ok(self
            .get(id)
            .cloned()
            .unwrap_or_else(|| Transaction::new(id.clone(), fields)))
    }

    /// Deletes the transaction with `id`.
    ///
    /// # Errors
    /// - `NotFound` if no transaction with `id` is loaded, or the backend no longer has it.
    /// - `Storage` if the backend rejects the delete.
    pub async fn remove(&mut self, id: &TransactionId) -> Result<()> {
        self.require(id)?;
        self.storage
            .remove_by_id(id)
            .await
            .map_err(|e| e.context(format!("Unable to delete transaction '{id}'")))?;
        debug!("Removed transaction {id}");
        self.resync().await;
        Ok(())
    }

    /// The working set, in backend order.
    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    fn require(&self, id: &TransactionId) -> Result<&Transaction> {
        self.get(id)
            .ok_or_else(|| Error::not_found(format!("There is no transaction with the id '{id}'")))
    }

    /// Reloads after a mutation. The mutation itself already succeeded, so a failed reload is only
    /// logged and the working set stays stale until the next successful reload.
    async fn resync(&mut self) {
        if let Err(e) = self.reload().await {
            warn!("The change was saved but the transaction list could not be refreshed: {e}");
        }
    }
}
