//! Types that represent the core data model, such as `Transaction` and `Amount`.
mod amount;
mod month;
pub mod taxonomy;
mod transaction;

pub use amount::{Amount, AmountError, MINOR_UNIT_SCALE};
pub use month::{format_month, Month, MonthOption, MAX_RECENT_MONTHS};
pub use taxonomy::Kind;
pub use transaction::{
    Transaction, TransactionFields, TransactionId, TransactionInput, TransactionType,
    TransactionUpdates,
};
