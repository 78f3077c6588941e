//! Chart-ready series derived from a set of transactions. Nothing here draws anything; colors and
//! layout belong to whoever renders the series.

use crate::model::taxonomy::is_special_expense_category;
use crate::model::{Amount, Kind, Transaction, TransactionType};
use crate::totals::{aggregate, Totals};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The four scalar totals as a bar chart, in the order of `Kind::ALL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub values: Vec<Amount>,
}

impl From<&Totals> for BarSeries {
    fn from(totals: &Totals) -> Self {
        Self {
            labels: Kind::ALL.iter().map(|k| k.label().to_string()).collect(),
            values: Kind::ALL.iter().map(|&k| totals.total(k)).collect(),
        }
    }
}

/// Projects `transactions` to `[income, expense, credit given, crypto investment]`.
pub fn project_bar(transactions: &[Transaction]) -> BarSeries {
    BarSeries::from(&aggregate(transactions))
}

/// A category breakdown. `labels` holds each distinct category in the order it was first seen and
/// `values` holds the matching sums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doughnut {
    pub labels: Vec<String>,
    pub values: Vec<Amount>,
}

impl Doughnut {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Pairs of label and value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn total(&self) -> Amount {
        self.values.iter().sum()
    }
}

/// Sums the amounts of `transaction_type` transactions per category. When `exclude_special` is set
/// the `Credit Given` and `Crypto Investment` categories are left out.
pub fn project_doughnut(
    transactions: &[Transaction],
    transaction_type: TransactionType,
    exclude_special: bool,
) -> Doughnut {
    let mut doughnut = Doughnut::default();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for t in transactions {
        if t.transaction_type() != transaction_type {
            continue;
        }
        if exclude_special && is_special_expense_category(t.category()) {
            continue;
        }
        match positions.get(t.category()) {
            Some(&i) => doughnut.values[i] += t.amount(),
            None => {
                positions.insert(t.category(), doughnut.labels.len());
                doughnut.labels.push(t.category().to_string());
                doughnut.values.push(t.amount());
            }
        }
    }
    doughnut
}
