use crate::error::{Error, Result};
use crate::model::taxonomy::{self, Kind, CREDIT_GIVEN};
use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Whether money came in or went out.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// The identifier a storage backend assigned to a transaction. Opaque to the rest of the crate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Every field of a transaction except its id. This is what gets inserted into and patched in a
/// storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionFields {
    #[serde(rename = "type")]
    pub(crate) transaction_type: TransactionType,
    pub(crate) amount: Amount,
    pub(crate) account: String,
    pub(crate) category: String,
    /// Only non-empty when `category` is `Credit Given`.
    #[serde(default)]
    pub(crate) person_name: String,
    pub(crate) date: NaiveDate,
}

impl TransactionFields {
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn person_name(&self) -> &str {
        &self.person_name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> Kind {
        Kind::of(self.transaction_type, &self.category)
    }

    /// Trims text fields, clears `person_name` where it does not apply, and checks every
    /// invariant. The whole field set is checked, not just the fields that changed, because a
    /// change of type or category changes what the other fields must hold.
    ///
    /// # Errors
    /// Returns a `Validation` error describing the first broken rule.
    pub fn validated(mut self) -> Result<Self> {
        self.account = self.account.trim().to_string();
        self.category = self.category.trim().to_string();
        self.person_name = self.person_name.trim().to_string();

        if self.account.is_empty() {
            return Err(Error::validation("An account is required"));
        }
        if self.category.is_empty() {
            return Err(Error::validation("A category is required"));
        }
        if !self.amount.is_positive() {
            return Err(Error::validation(format!(
                "The amount must be greater than zero, got {}",
                self.amount
            )));
        }
        if !self.amount.fits_minor_units() {
            return Err(Error::validation(format!(
                "The amount cannot have more than two decimal places, got {}",
                self.amount.value()
            )));
        }
        if self.amount.to_minor().is_none() {
            let amount = self.amount.value();
            return Err(Error::validation(format!("The amount {amount} is too large")));
        }
        if taxonomy::is_special_expense_category(&self.category)
            && self.transaction_type != TransactionType::Expense
        {
            return Err(Error::validation(format!(
                "'{}' can only be used for expense transactions",
                self.category
            )));
        }
        if self.category == CREDIT_GIVEN {
            if self.person_name.is_empty() {
                return Err(Error::validation(
                    "A person's name is required for a 'Credit Given' transaction",
                ));
            }
        } else {
            self.person_name.clear();
        }
        Ok(self)
    }
}

/// A transaction as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    #[serde(flatten)]
    fields: TransactionFields,
}

impl Transaction {
    pub fn new(id: TransactionId, fields: TransactionFields) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn fields(&self) -> &TransactionFields {
        &self.fields
    }

    pub fn into_fields(self) -> TransactionFields {
        self.fields
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.fields.transaction_type
    }

    pub fn amount(&self) -> Amount {
        self.fields.amount
    }

    pub fn account(&self) -> &str {
        &self.fields.account
    }

    pub fn category(&self) -> &str {
        &self.fields.category
    }

    pub fn person_name(&self) -> &str {
        &self.fields.person_name
    }

    pub fn date(&self) -> NaiveDate {
        self.fields.date
    }

    pub fn kind(&self) -> Kind {
        self.fields.kind()
    }

    /// The person name for display, or `-` when it does not apply.
    pub fn person_display(&self) -> &str {
        if self.fields.person_name.is_empty() {
            "-"
        } else {
            &self.fields.person_name
        }
    }
}

/// A candidate transaction handed to the store for creation. `date` defaults to today when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Amount,
    pub account: String,
    pub category: String,
    #[serde(default)]
    pub person_name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl TransactionInput {
    pub fn new(
        transaction_type: TransactionType,
        amount: Amount,
        account: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type,
            amount,
            account: account.into(),
            category: category.into(),
            person_name: String::new(),
            date: None,
        }
    }

    pub fn person_name(mut self, person_name: impl Into<String>) -> Self {
        self.person_name = person_name.into();
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Fills in the default date and validates.
    pub(crate) fn into_fields(self, today: NaiveDate) -> Result<TransactionFields> {
        TransactionFields {
            transaction_type: self.transaction_type,
            amount: self.amount,
            account: self.account,
            category: self.category,
            person_name: self.person_name,
            date: self.date.unwrap_or(today),
        }
        .validated()
    }
}

/// Field changes to apply to an existing transaction. `None` leaves a field unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionUpdates {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl TransactionUpdates {
    pub fn is_empty(&self) -> bool {
        self == &TransactionUpdates::default()
    }

    /// Merges these updates over `current` and validates the result.
    pub(crate) fn apply(&self, current: &TransactionFields) -> Result<TransactionFields> {
        TransactionFields {
            transaction_type: self.transaction_type.unwrap_or(current.transaction_type),
            amount: self.amount.unwrap_or(current.amount),
            account: self
                .account
                .clone()
                .unwrap_or_else(|| current.account.clone()),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| current.category.clone()),
            person_name: self
                .person_name
                .clone()
                .unwrap_or_else(|| current.person_name.clone()),
            date: self.date.unwrap_or(current.date),
        }
        .validated()
    }
}

impl From<TransactionInput> for TransactionUpdates {
    /// Replaces every field. The date is only replaced when the input has one.
    fn from(input: TransactionInput) -> Self {
        Self {
            transaction_type: Some(input.transaction_type),
            amount: Some(input.amount),
            account: Some(input.account),
            category: Some(input.category),
            person_name: Some(input.person_name),
            date: input.date,
        }
    }
}

impl From<&TransactionFields> for TransactionUpdates {
    /// Every field set to its current value: applying this changes nothing.
    fn from(fields: &TransactionFields) -> Self {
        Self {
            transaction_type: Some(fields.transaction_type),
            amount: Some(fields.amount),
            account: Some(fields.account.clone()),
            category: Some(fields.category.clone()),
            person_name: Some(fields.person_name.clone()),
            date: Some(fields.date),
        }
    }
}
