//! Add command handler.

use crate::args::AddArgs;
use crate::commands::{open_ledger, Out};
use crate::model::Transaction;
use crate::{Config, Result};

/// Records a new transaction from the command line arguments.
///
/// The arguments are treated like a submitted form: `--category Other` takes its text from
/// `--other-category`, and `--person-name` is required for 'Credit Given'. A missing date
/// defaults to today. The backend assigns the id.
///
/// # Errors
/// - `Validation` if the arguments are incomplete or break a transaction rule.
/// - `Storage` if the backend cannot be opened or rejects the write.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Transaction>> {
    let mut ledger = open_ledger(&config).await?;
    let transaction = ledger.submit_transaction(&args.form()?).await?;
    let message = format!(
        "Added {} transaction {} of {} on {}",
        transaction.transaction_type(),
        transaction.id(),
        transaction.amount().display_with(config.currency()),
        transaction.date()
    );
    Ok(Out::new(message, transaction))
}
