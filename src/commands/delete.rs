//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::{open_ledger, Out};
use crate::model::TransactionId;
use crate::{Config, Result};

/// Deletes the transaction with the given id.
///
/// # Errors
/// - `NotFound` if there is no transaction with the id.
/// - `Storage` if the backend cannot be opened or rejects the delete.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<TransactionId>> {
    let mut ledger = open_ledger(&config).await?;
    let id = TransactionId::new(args.id());
    ledger.delete_transaction(&id).await?;
    Ok(Out::new(format!("Deleted transaction {id}"), id))
}
