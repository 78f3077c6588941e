//! This module is responsible for reading, writing and managing the SQLite database.

mod migrations;

use crate::error::{Error, ErrorType, IntoResult, Res, Result};
use crate::model::{Amount, Transaction, TransactionFields, TransactionId, TransactionType};
use crate::storage::Storage;
use crate::utils;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A SQLite-backed `Storage`. Amounts are stored as integer minor units so that nothing is ever
/// rounded on the way in or out.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the schema at the current version
    pub(crate) async fn init(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if utils::exists(path).await? {
            bail!("Refusing to overwrite existing database '{}'", path.display());
        }
        let pool = connect(path, true).await?;
        migrations::bootstrap(&pool).await?;
        migrations::run(&pool, 0, migrations::CURRENT_VERSION).await?;
        debug!("Created database at {}", path.display());
        Ok(Self { pool })
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Migrates the schema forward if it is out of date
    /// - Refuses a database written by a newer version of this program
    pub(crate) async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The database file is missing '{}'", path.display());
        }
        let pool = connect(path, false).await?;
        let version = migrations::version(&pool).await?;
        if version > migrations::CURRENT_VERSION {
            bail!(
                "The database schema is at version {version}, which is newer than the version \
                this program understands ({})",
                migrations::CURRENT_VERSION
            );
        }
        migrations::run(&pool, version, migrations::CURRENT_VERSION).await?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) async fn schema_version(&self) -> Res<i32> {
        migrations::version(&self.pool).await
    }

    async fn select_all(&self) -> Res<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            "SELECT id, transaction_type, amount_minor, account, category, person_name, date \
            FROM transactions ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .context("Unable to query transactions")?;
        trace!("Read {} transaction rows", rows.len());
        rows.into_iter().map(Transaction::try_from).collect()
    }
}

async fn connect(path: &Path, create: bool) -> Res<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Unable to open SQLite database '{}'", path.display()))
}

fn amount_minor(fields: &TransactionFields) -> Result<i64> {
    fields.amount().to_minor().ok_or_else(|| {
        Error::validation(format!(
            "The amount {} cannot be stored as whole minor units",
            fields.amount().value()
        ))
    })
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    transaction_type: String,
    amount_minor: i64,
    account: String,
    category: String,
    person_name: String,
    date: String,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(row: TransactionRow) -> Res<Self> {
        let transaction_type = TransactionType::from_str(&row.transaction_type)
            .with_context(|| format!("Bad transaction type in row '{}'", row.id))?;
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
            .with_context(|| format!("Bad date '{}' in row '{}'", row.date, row.id))?;
        let fields = TransactionFields {
            transaction_type,
            amount: Amount::from_minor(row.amount_minor),
            account: row.account,
            category: row.category,
            person_name: row.person_name,
            date,
        };
        Ok(Transaction::new(TransactionId::new(row.id), fields))
    }
}

#[async_trait::async_trait]
impl Storage for Db {
    async fn fetch_all(&mut self) -> Result<Vec<Transaction>> {
        self.select_all().await.pub_result(ErrorType::Storage)
    }

    async fn insert(&mut self, fields: &TransactionFields) -> Result<TransactionId> {
        let amount_minor = amount_minor(fields)?;
        let id = utils::generate_transaction_id();
        sqlx::query(
            "INSERT INTO transactions \
            (id, transaction_type, amount_minor, account, category, person_name, date) \
            VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.as_str())
        .bind(fields.transaction_type().to_string())
        .bind(amount_minor)
        .bind(fields.account())
        .bind(fields.category())
        .bind(fields.person_name())
        .bind(fields.date().format(DATE_FORMAT).to_string())
        .execute(&self.pool)
        .await
        .context("Unable to insert transaction")
        .pub_result(ErrorType::Storage)?;
        Ok(id)
    }

    async fn patch(&mut self, id: &TransactionId, fields: &TransactionFields) -> Result<()> {
        let amount_minor = amount_minor(fields)?;
        let result = sqlx::query(
            "UPDATE transactions SET transaction_type = ?, amount_minor = ?, account = ?, \
            category = ?, person_name = ?, date = ? WHERE id = ?",
        )
        .bind(fields.transaction_type().to_string())
        .bind(amount_minor)
        .bind(fields.account())
        .bind(fields.category())
        .bind(fields.person_name())
        .bind(fields.date().format(DATE_FORMAT).to_string())
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Unable to update transaction '{id}'"))
        .pub_result(ErrorType::Storage)?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!(
                "No stored transaction has the id '{id}'"
            )));
        }
        Ok(())
    }

    async fn remove_by_id(&mut self, id: &TransactionId) -> Result<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete transaction '{id}'"))
            .pub_result(ErrorType::Storage)?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!(
                "No stored transaction has the id '{id}'"
            )));
        }
        Ok(())
    }
}
