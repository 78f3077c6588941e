//! The entry point for a presentation layer: one call per user action, and one call that returns
//! everything a render pass needs.

use crate::chart::{project_bar, project_doughnut, BarSeries, Doughnut};
use crate::error::Result;
use crate::filter::{filter, filter_options, FilterOptions, FilterSpec};
use crate::form::FormFields;
use crate::model::{Transaction, TransactionId, TransactionType, TransactionUpdates};
use crate::storage::Storage;
use crate::store::Store;
use crate::totals::{aggregate, Totals};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Everything needed to render one filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub spec: FilterSpec,
    /// The selected transactions, most recent first.
    pub rows: Vec<Transaction>,
    pub totals: Totals,
    pub bar: BarSeries,
    pub income_doughnut: Doughnut,
    /// Ordinary expense categories only.
    pub expense_doughnut: Doughnut,
}

pub struct Ledger {
    store: Store,
}

impl Ledger {
    /// Opens a ledger over `storage` and loads the transactions. A failed load is logged and the
    /// ledger starts out empty, so a presentation layer shows no data instead of failing.
    pub async fn open(storage: Box<dyn Storage>) -> Self {
        let mut ledger = Self {
            store: Store::new(storage),
        };
        ledger.refresh().await;
        ledger
    }

    /// Reloads from storage. A failure is logged and the current transactions are kept.
    pub async fn refresh(&mut self) {
        if let Err(e) = self.store.reload().await {
            error!("Showing stale data: {e}");
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.store.list()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.store.get(id)
    }

    /// Filters, totals and projects the transactions selected by `spec`.
    pub fn view(&self, spec: &FilterSpec) -> View {
        let rows = filter(self.store.list(), spec);
        debug!("{} of {} transactions in view", rows.len(), self.store.list().len());
        View {
            spec: spec.clone(),
            totals: aggregate(&rows),
            bar: project_bar(&rows),
            income_doughnut: project_doughnut(&rows, TransactionType::Income, false),
            expense_doughnut: project_doughnut(&rows, TransactionType::Expense, true),
            rows,
        }
    }

    /// The month, account and category choices for filter controls.
    pub fn filter_options(&self, today: NaiveDate) -> FilterOptions {
        filter_options(self.store.list(), today)
    }

    /// Records a new transaction from a submitted form.
    ///
    /// # Errors
    /// - `Validation` if the form is incomplete or breaks a transaction rule. Nothing is stored.
    /// - `Storage` if the backend rejects the write.
    pub async fn submit_transaction(&mut self, form: &FormFields) -> Result<Transaction> {
        let input = form.resolve()?;
        self.store.add(input).await
    }

    /// Replaces the transaction with `id` with the values of a submitted form. When the form has
    /// no date the existing date is kept.
    ///
    /// # Errors
    /// - `Validation` if the form is incomplete or breaks a transaction rule. Nothing is stored.
    /// - `NotFound` if there is no transaction with `id`.
    /// - `Storage` if the backend rejects the write.
    pub async fn edit_transaction(
        &mut self,
        id: &TransactionId,
        form: &FormFields,
    ) -> Result<Transaction> {
        let updates = TransactionUpdates::from(form.resolve()?);
        self.store.update(id, &updates).await
    }

    /// # Errors
    /// - `NotFound` if there is no transaction with `id`.
    /// - `Storage` if the backend rejects the delete.
    pub async fn delete_transaction(&mut self, id: &TransactionId) -> Result<()> {
        self.store.remove(id).await
    }
}
