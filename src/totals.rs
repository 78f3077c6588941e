//! The aggregator: scalar and per-account totals over a set of transactions.
//!
//! Every transaction contributes to exactly one `Kind`. `Credit Given` and `Crypto Investment`
//! expenses have kinds of their own, so they never reach the ordinary expense total or net
//! earnings.

use crate::model::{Amount, Kind, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Amounts keyed by account name.
pub type AccountTotals = BTreeMap<String, Amount>;

/// The result of `aggregate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income: Amount,
    /// Ordinary expense only.
    pub expense: Amount,
    pub credit_given: Amount,
    pub crypto_investment: Amount,
    /// `income - expense`.
    pub net_earnings: Amount,
    pub income_by_account: AccountTotals,
    pub expense_by_account: AccountTotals,
    pub credit_given_by_account: AccountTotals,
    pub crypto_investment_by_account: AccountTotals,
    /// Income minus ordinary expense for every account that has income or ordinary expense.
    /// Accounts whose only activity is `Credit Given` or `Crypto Investment` are absent.
    pub net_earnings_by_account: AccountTotals,
}

impl Totals {
    /// The scalar total for `kind`.
    pub fn total(&self, kind: Kind) -> Amount {
        match kind {
            Kind::Income => self.income,
            Kind::Expense => self.expense,
            Kind::CreditGiven => self.credit_given,
            Kind::CryptoInvestment => self.crypto_investment,
        }
    }

    /// The per-account totals for `kind`.
    pub fn by_account(&self, kind: Kind) -> &AccountTotals {
        match kind {
            Kind::Income => &self.income_by_account,
            Kind::Expense => &self.expense_by_account,
            Kind::CreditGiven => &self.credit_given_by_account,
            Kind::CryptoInvestment => &self.crypto_investment_by_account,
        }
    }

    fn add(&mut self, kind: Kind, account: &str, amount: Amount) {
        let (total, by_account) = match kind {
            Kind::Income => (&mut self.income, &mut self.income_by_account),
            Kind::Expense => (&mut self.expense, &mut self.expense_by_account),
            Kind::CreditGiven => (&mut self.credit_given, &mut self.credit_given_by_account),
            Kind::CryptoInvestment => (
                &mut self.crypto_investment,
                &mut self.crypto_investment_by_account,
            ),
        };
        *total += amount;
        *by_account.entry(account.to_string()).or_default() += amount;
    }
}

/// Computes the totals for `transactions`. The input is usually the output of `filter`.
pub fn aggregate(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();
    for t in transactions {
        totals.add(t.kind(), t.account(), t.amount());
    }
    totals.net_earnings = totals.income - totals.expense;

    let accounts: BTreeSet<&String> = totals
        .income_by_account
        .keys()
        .chain(totals.expense_by_account.keys())
        .collect();
    let net_earnings_by_account = accounts
        .into_iter()
        .map(|account| {
            let income = totals.income_by_account.get(account).copied();
            let expense = totals.expense_by_account.get(account).copied();
            (
                account.clone(),
                income.unwrap_or_default() - expense.unwrap_or_default(),
            )
        })
        .collect();
    totals.net_earnings_by_account = net_earnings_by_account;
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionType::{Expense, Income};
    use crate::model::taxonomy::CRYPTO_INVESTMENT;
    use crate::test::{amount, credit, scenario_a, txn};

    #[test]
    fn test_scenario_a_totals() {
        let totals = aggregate(&scenario_a());
        assert_eq!(totals.income.to_string(), "100.00");
        assert_eq!(totals.expense.to_string(), "30.00");
        assert_eq!(totals.credit_given.to_string(), "50.00");
        assert_eq!(totals.crypto_investment.to_string(), "0.00");
        assert_eq!(totals.net_earnings.to_string(), "70.00");
    }

    #[test]
    fn test_scenario_d_net_earnings_by_account() {
        let mut transactions = vec![
            txn("1", Income, "200", "Udemy", "Bank", "2024-03-01"),
            txn("2", Expense, "80", "Leisure", "Bank", "2024-03-02"),
        ];
        let before = aggregate(&transactions);
        assert_eq!(before.net_earnings_by_account["Bank"], amount("120"));
        assert_eq!(before.net_earnings_by_account["Bank"].to_string(), "120.00");

        transactions.push(txn(
            "3",
            Expense,
            "500",
            CRYPTO_INVESTMENT,
            "Bank",
            "2024-03-03",
        ));
        let after = aggregate(&transactions);
        assert_eq!(after.net_earnings_by_account["Bank"], amount("120"));
        assert_eq!(after.crypto_investment, amount("500"));
        assert_eq!(after.expense, amount("80"));
    }

    #[test]
    fn test_special_only_accounts_omitted_from_net_earnings() {
        let totals = aggregate(&scenario_a());
        // Cash only has a Credit Given transaction
        assert_eq!(
            totals.net_earnings_by_account.keys().collect::<Vec<_>>(),
            vec!["Bank"]
        );
        assert_eq!(totals.credit_given_by_account["Cash"], amount("50"));
    }

    #[test]
    fn test_net_earnings_by_account_covers_union() {
        let transactions = vec![
            txn("1", Income, "10", "Udemy", "Bank", "2024-03-01"),
            txn("2", Expense, "4", "Leisure", "Cash", "2024-03-02"),
        ];
        let totals = aggregate(&transactions);
        assert_eq!(totals.net_earnings_by_account["Bank"], amount("10"));
        assert_eq!(totals.net_earnings_by_account["Cash"], amount("-4"));
        assert_eq!(totals.net_earnings_by_account["Cash"].to_string(), "-4.00");
    }

    #[test]
    fn test_by_account_partitions_totals() {
        let transactions = vec![
            txn("1", Income, "10.10", "Udemy", "Bank", "2024-03-01"),
            txn("2", Income, "0.20", "Airbnb", "Cash", "2024-03-01"),
            txn("3", Income, "5.05", "Other Gig", "Bank", "2024-03-02"),
            txn("4", Expense, "3.33", "Leisure", "Card", "2024-03-02"),
            credit("5", "9.99", "Card", "Sara", "2024-03-02"),
            txn("6", Expense, "1.11", "Leisure", "Bank", "2024-03-02"),
        ];
        let totals = aggregate(&transactions);
        for kind in Kind::ALL {
            let sum: Amount = totals.by_account(kind).values().sum();
            assert_eq!(sum, totals.total(kind), "{kind}");
        }
        assert_eq!(totals.income, amount("15.35"));
    }

    #[test]
    fn test_net_earnings_exact() {
        let mut transactions = Vec::new();
        for i in 0..300 {
            transactions.push(txn(
                &format!("i{i}"),
                Income,
                "0.10",
                "Udemy",
                "Bank",
                "2024-03-01",
            ));
            transactions.push(txn(
                &format!("e{i}"),
                Expense,
                "0.20",
                "Leisure",
                "Bank",
                "2024-03-01",
            ));
        }
        let totals = aggregate(&transactions);
        assert_eq!(totals.income - totals.expense, totals.net_earnings);
        assert_eq!(totals.income, amount("30"));
        assert_eq!(totals.expense, amount("60"));
        assert_eq!(totals.net_earnings, amount("-30"));
    }

    #[test]
    fn test_empty() {
        let totals = aggregate(&[]);
        assert_eq!(totals, Totals::default());
        assert!(totals.net_earnings.is_zero());
        assert!(totals.net_earnings_by_account.is_empty());
    }
}
