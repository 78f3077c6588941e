//! Edit command handler.

use crate::args::EditArgs;
use crate::commands::{open_ledger, Out};
use crate::error::Error;
use crate::form::FormFields;
use crate::model::{Transaction, TransactionId};
use crate::{Config, Result};
use tracing::debug;

/// Changes an existing transaction.
///
/// The form is first filled in from the stored transaction, the same way an edit dialog would be
/// pre-filled, and then the arguments that were given overwrite their fields. The result is
/// submitted and validated as a whole, so switching to 'Credit Given' needs `--person-name` too.
///
/// # Errors
/// - `NotFound` if there is no transaction with the given id.
/// - `Validation` if the edited form breaks a transaction rule.
/// - `Storage` if the backend cannot be opened or rejects the write.
pub async fn edit(config: Config, args: EditArgs) -> Result<Out<Transaction>> {
    let mut ledger = open_ledger(&config).await?;
    let id = TransactionId::new(args.id());
    let current = ledger
        .get(&id)
        .ok_or_else(|| Error::not_found(format!("There is no transaction with the id '{id}'")))?;
    let form = args.apply_to(FormFields::from_transaction(current))?;
    debug!("Submitting edit of {id}: {form:?}");
    let edited = ledger.edit_transaction(&id, &form).await?;
    Ok(Out::new(format!("Updated transaction {id}"), edited))
}
