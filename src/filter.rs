//! The filter engine: selects the transactions that are in view and orders them newest first.

use crate::model::{Month, MonthOption, Transaction, TransactionType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The number of months offered by the month filter, counting the current month.
pub const RECENT_MONTHS: usize = 12;

/// Defines a view over the transactions: a required month plus optional type, account and
/// category. An optional value that is `None` or empty places no restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub month: Month,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl FilterSpec {
    /// A spec that selects every transaction in `month`.
    pub fn new(month: Month) -> Self {
        Self {
            month,
            transaction_type: None,
            account: None,
            category: None,
        }
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns true if `transaction` is selected by this spec. Account and category are compared
    /// by exact string equality.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.month.contains(transaction.date())
            && self
                .transaction_type
                .map_or(true, |t| t == transaction.transaction_type())
            && present(&self.account).map_or(true, |a| a == transaction.account())
            && present(&self.category).map_or(true, |c| c == transaction.category())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Returns the transactions selected by `spec`, most recent date first. Transactions that share a
/// date keep their relative order from `transactions`.
pub fn filter(transactions: &[Transaction], spec: &FilterSpec) -> Vec<Transaction> {
    let mut rows: Vec<Transaction> = transactions
        .iter()
        .filter(|t| spec.matches(t))
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.date().cmp(&a.date()));
    rows
}

/// The values a presentation layer can offer in its filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// The current month and the months before it, newest first.
    pub months: Vec<MonthOption>,
    /// Distinct accounts, sorted.
    pub accounts: Vec<String>,
    /// Distinct categories, sorted.
    pub categories: Vec<String>,
}

/// Collects the filter choices for `transactions`, with `RECENT_MONTHS` months ending at `today`.
pub fn filter_options(transactions: &[Transaction], today: NaiveDate) -> FilterOptions {
    let accounts: BTreeSet<&str> = transactions.iter().map(|t| t.account()).collect();
    let categories: BTreeSet<&str> = transactions.iter().map(|t| t.category()).collect();
    FilterOptions {
        months: Month::recent(today, RECENT_MONTHS)
            .into_iter()
            .map(MonthOption::from)
            .collect(),
        accounts: accounts.into_iter().map(String::from).collect(),
        categories: categories.into_iter().map(String::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::format_month;
    use crate::test::{credit, date, txn};
    use std::str::FromStr;

    fn month(s: &str) -> Month {
        Month::from_str(s).unwrap()
    }

    fn ids(rows: &[Transaction]) -> Vec<&str> {
        rows.iter().map(|t| t.id().as_str()).collect()
    }

    fn sample() -> Vec<Transaction> {
        use TransactionType::{Expense, Income};
        vec![
            txn("a", Income, "100", "Udemy", "Bank", "2024-03-05"),
            txn("b", Expense, "30", "Leisure", "Bank", "2024-03-10"),
            credit("c", "50", "Cash", "Ali", "2024-03-12"),
            txn("d", Expense, "12", "Leisure", "Cash", "2024-02-28"),
            txn("e", Income, "40", "Airbnb", "Cash", "2024-03-10"),
            txn("f", Expense, "7", "Groceries", "Bank", "2023-03-10"),
        ]
    }

    #[test]
    fn test_filter_by_month_sorts_newest_first() {
        let rows = filter(&sample(), &FilterSpec::new(month("2024-03")));
        // b and e share a date and keep their input order
        assert_eq!(ids(&rows), vec!["c", "b", "e", "a"]);
    }

    #[test]
    fn test_filter_month_count_matches_format_month() {
        let transactions = sample();
        for m in ["2024-03", "2024-02", "2023-03", "2024-04"] {
            let expected = transactions
                .iter()
                .filter(|t| format_month(t.date()) == m)
                .count();
            let rows = filter(&transactions, &FilterSpec::new(month(m)));
            assert_eq!(rows.len(), expected, "month {m}");
        }
    }

    #[test]
    fn test_filter_by_type() {
        let spec = FilterSpec::new(month("2024-03")).transaction_type(TransactionType::Expense);
        assert_eq!(ids(&filter(&sample(), &spec)), vec!["c", "b"]);
    }

    #[test]
    fn test_filter_by_account_and_category() {
        let spec = FilterSpec::new(month("2024-03")).account("Cash");
        assert_eq!(ids(&filter(&sample(), &spec)), vec!["c", "e"]);

        let spec = FilterSpec::new(month("2024-03"))
            .account("Bank")
            .category("Leisure");
        assert_eq!(ids(&filter(&sample(), &spec)), vec!["b"]);
    }

    #[test]
    fn test_filter_is_exact_match() {
        let spec = FilterSpec::new(month("2024-03")).account("bank");
        assert!(filter(&sample(), &spec).is_empty());
    }

    #[test]
    fn test_empty_values_are_absent() {
        let spec = FilterSpec::new(month("2024-03")).account("").category("");
        assert_eq!(filter(&sample(), &spec).len(), 4);
    }

    #[test]
    fn test_filter_empty_input() {
        assert!(filter(&[], &FilterSpec::new(month("2024-03"))).is_empty());
    }

    #[test]
    fn test_filter_options() {
        let options = filter_options(&sample(), date("2024-03-20"));
        assert_eq!(options.accounts, vec!["Bank", "Cash"]);
        assert_eq!(
            options.categories,
            vec!["Airbnb", "Credit Given", "Groceries", "Leisure", "Udemy"]
        );
        assert_eq!(options.months.len(), RECENT_MONTHS);
        assert_eq!(options.months[0].value, month("2024-03"));
        assert_eq!(options.months[0].label, "March 2024");
        assert_eq!(options.months[11].value, month("2023-04"));
    }

    #[test]
    fn test_spec_serde_omits_absent() {
        let spec = FilterSpec::new(month("2024-03")).account("Bank");
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"month":"2024-03","account":"Bank"}"#);
    }
}
