//! Turns what a user typed into a transaction, and a transaction back into what a user would
//! have typed.
//!
//! A presentation layer collects a `FormFields` value, calls `field_visibility` whenever the type
//! or category selection changes, and hands the fields to the ledger. The `Other` category choice
//! is replaced by the custom category text here, before anything reaches the store.

use crate::error::{Error, Result};
use crate::model::taxonomy::{self, CREDIT_GIVEN, OTHER};
use crate::model::{Amount, Transaction, TransactionInput, TransactionType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which optional inputs a form should show for a given type and category selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldVisibility {
    pub show_person_name: bool,
    pub show_custom_category: bool,
}

/// Derives the optional-field visibility from the current selection. The person name is only
/// shown for `Credit Given` and the custom category text only for `Other`.
pub fn field_visibility(transaction_type: TransactionType, category: &str) -> FieldVisibility {
    FieldVisibility {
        show_person_name: transaction_type == TransactionType::Expense && category == CREDIT_GIVEN,
        show_custom_category: category == OTHER,
    }
}

/// The raw values of a transaction form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Amount as typed, thousands separators allowed.
    pub amount: String,
    pub account: String,
    /// The selected category choice, possibly the `Other` sentinel.
    pub category: String,
    /// The custom category text. Only read when `category` is `Other`.
    #[serde(default)]
    pub other_category: String,
    /// Only read when the category is `Credit Given`.
    #[serde(default)]
    pub person_name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl FormFields {
    pub fn new(
        transaction_type: TransactionType,
        amount: impl Into<String>,
        account: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type,
            amount: amount.into(),
            account: account.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn other_category(mut self, other_category: impl Into<String>) -> Self {
        self.other_category = other_category.into();
        self
    }

    pub fn person_name(mut self, person_name: impl Into<String>) -> Self {
        self.person_name = person_name.into();
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn visibility(&self) -> FieldVisibility {
        field_visibility(self.transaction_type, &self.category)
    }

    /// Reconstructs the form a user would fill in to produce `transaction`. A category that is not
    /// one of the named choices for the transaction's type comes back as `Other` plus custom text.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        let (category, other_category) =
            if taxonomy::is_listed(transaction.transaction_type(), transaction.category()) {
                (transaction.category().to_string(), String::new())
            } else {
                (OTHER.to_string(), transaction.category().to_string())
            };
        let person_name = if transaction.category() == CREDIT_GIVEN {
            transaction.person_name().to_string()
        } else {
            String::new()
        };
        Self {
            transaction_type: transaction.transaction_type(),
            amount: transaction.amount().rounded().to_string(),
            account: transaction.account().to_string(),
            category,
            other_category,
            person_name,
            date: Some(transaction.date()),
        }
    }

    /// Parses and checks the form, substituting the custom category for `Other`.
    ///
    /// # Errors
    /// Returns a `Validation` error if the amount is missing or malformed, if `Other` is selected
    /// with no custom text, or if `Credit Given` is selected with no person name. The remaining
    /// rules are checked by the store.
    pub fn resolve(&self) -> Result<TransactionInput> {
        let amount_text = self.amount.trim();
        if amount_text.is_empty() {
            return Err(Error::validation("An amount is required"));
        }
        let amount = Amount::from_str(amount_text)
            .map_err(|e| Error::validation(format!("'{amount_text}' is not a valid amount: {e}")))?;

        let selected = self.category.trim();
        let category = if selected == OTHER {
            let custom = self.other_category.trim();
            if custom.is_empty() {
                return Err(Error::validation(
                    "Please specify the category when 'Other' is selected",
                ));
            }
            custom
        } else {
            selected
        };

        let person_name = if category == CREDIT_GIVEN {
            let name = self.person_name.trim();
            if name.is_empty() {
                return Err(Error::validation(
                    "Please enter the person's name for a 'Credit Given' transaction",
                ));
            }
            name
        } else {
            ""
        };

        let mut input = TransactionInput::new(
            self.transaction_type,
            amount,
            self.account.trim(),
            category,
        )
        .person_name(person_name);
        input.date = self.date;
        Ok(input)
    }
}
