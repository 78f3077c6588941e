//! Category classification rules.
//!
//! Income and expense transactions draw their categories from fixed lists that both end in the
//! `Other` sentinel. Two expense categories are special: they record money moved out of the
//! spending pool (a loan to a person, a crypto purchase) rather than money consumed, so they are
//! tracked separately and never count towards ordinary expense or net earnings.

use crate::model::TransactionType;
use serde::{Deserialize, Serialize};

/// Money lent to a named person.
pub const CREDIT_GIVEN: &str = "Credit Given";

/// Money moved into crypto holdings.
pub const CRYPTO_INVESTMENT: &str = "Crypto Investment";

/// The sentinel that stands for a user-supplied category.
pub const OTHER: &str = "Other";

const INCOME_CATEGORIES: &[&str] = &[
    "Social Media",
    "Airbnb",
    "Agyweb",
    "Udemy",
    "iLearnCode",
    OTHER,
];

const EXPENSE_CATEGORIES: &[&str] = &[
    CREDIT_GIVEN,
    CRYPTO_INVESTMENT,
    "Work Expense",
    "Leisure",
    OTHER,
];

/// The category choices for `transaction_type`, in display order. The last entry is always
/// `OTHER`.
pub fn categories_for(transaction_type: TransactionType) -> &'static [&'static str] {
    match transaction_type {
        TransactionType::Income => INCOME_CATEGORIES,
        TransactionType::Expense => EXPENSE_CATEGORIES,
    }
}

/// True for `Credit Given` and `Crypto Investment`.
pub fn is_special_expense_category(category: &str) -> bool {
    category == CREDIT_GIVEN || category == CRYPTO_INVESTMENT
}

/// True if `category` is one of the named choices for `transaction_type`. The `Other` sentinel is
/// not a named choice: a stored category equal to "Other" was typed in by the user.
pub fn is_listed(transaction_type: TransactionType, category: &str) -> bool {
    category != OTHER && categories_for(transaction_type).contains(&category)
}

/// How a transaction counts towards the totals. Every transaction has exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Income,
    /// An expense whose category is not special.
    Expense,
    CreditGiven,
    CryptoInvestment,
}

serde_plain::derive_display_from_serialize!(Kind);
serde_plain::derive_fromstr_from_deserialize!(Kind);

impl Kind {
    /// All kinds in the order the summary cards and bar chart present them.
    pub const ALL: [Kind; 4] = [
        Kind::Income,
        Kind::Expense,
        Kind::CreditGiven,
        Kind::CryptoInvestment,
    ];

    /// Classifies a transaction by its type and category.
    pub fn of(transaction_type: TransactionType, category: &str) -> Kind {
        match transaction_type {
            TransactionType::Income => Kind::Income,
            TransactionType::Expense => match category {
                CREDIT_GIVEN => Kind::CreditGiven,
                CRYPTO_INVESTMENT => Kind::CryptoInvestment,
                _ => Kind::Expense,
            },
        }
    }

    /// The display label, e.g. `Credit Given`.
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Income => "Income",
            Kind::Expense => "Expense",
            Kind::CreditGiven => CREDIT_GIVEN,
            Kind::CryptoInvestment => CRYPTO_INVESTMENT,
        }
    }

    /// True for the kinds that count towards net earnings.
    pub fn is_ordinary(&self) -> bool {
        matches!(self, Kind::Income | Kind::Expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_categories_end_in_other() {
        let cats = categories_for(TransactionType::Income);
        assert_eq!(cats.last(), Some(&OTHER));
        assert!(cats.contains(&"Udemy"));
        assert!(!cats.contains(&CREDIT_GIVEN));
    }

    #[test]
    fn test_expense_categories_start_with_specials() {
        let cats = categories_for(TransactionType::Expense);
        assert_eq!(&cats[..2], &[CREDIT_GIVEN, CRYPTO_INVESTMENT]);
        assert_eq!(cats.last(), Some(&OTHER));
    }

    #[test]
    fn test_is_special() {
        assert!(is_special_expense_category("Credit Given"));
        assert!(is_special_expense_category("Crypto Investment"));
        assert!(!is_special_expense_category("Leisure"));
        assert!(!is_special_expense_category("credit given"));
    }

    #[test]
    fn test_is_listed() {
        assert!(is_listed(TransactionType::Income, "Airbnb"));
        assert!(!is_listed(TransactionType::Expense, "Airbnb"));
        assert!(!is_listed(TransactionType::Income, OTHER));
        assert!(!is_listed(TransactionType::Expense, "Groceries"));
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(Kind::of(TransactionType::Income, "Udemy"), Kind::Income);
        assert_eq!(Kind::of(TransactionType::Expense, "Leisure"), Kind::Expense);
        assert_eq!(
            Kind::of(TransactionType::Expense, CREDIT_GIVEN),
            Kind::CreditGiven
        );
        assert_eq!(
            Kind::of(TransactionType::Expense, CRYPTO_INVESTMENT),
            Kind::CryptoInvestment
        );
        assert_eq!(Kind::of(TransactionType::Expense, "Groceries"), Kind::Expense);
    }

    #[test]
    fn test_kind_display_and_label() {
        assert_eq!(Kind::CreditGiven.to_string(), "credit_given");
        assert_eq!(Kind::CreditGiven.label(), "Credit Given");
        assert!(Kind::Expense.is_ordinary());
        assert!(!Kind::CryptoInvestment.is_ordinary());
    }
}
