//! Versioned schema changes for the SQLite ledger.
//!
//! Each schema version `N` has a pair of SQL files in this directory: `migration_NN_up.sql` moves
//! the schema from `N-1` to `N`, and `migration_NN_down.sql` moves it back. The version the file is
//! at lives in the single-row `schema_version` table.

use crate::error::Res;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

/// The schema version this build of the program reads and writes.
pub(crate) const CURRENT_VERSION: i32 = 1;

struct Migration {
    version: i32,
    up: &'static str,
    down: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    up: include_str!("migration_01_up.sql"),
    down: include_str!("migration_01_down.sql"),
}];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Direction {
    Up,
    Down,
}

serde_plain::derive_display_from_serialize!(Direction);

/// One planned step: the SQL to run and the version the schema is at afterwards.
struct Step {
    version: i32,
    direction: Direction,
    sql: &'static str,
    resulting_version: i32,
}

/// Creates the `schema_version` table in a brand new database and records version 0.
pub(crate) async fn bootstrap(pool: &SqlitePool) -> Res<()> {
    let mut tx = pool.begin().await.context("Failed to begin bootstrap")?;
    sqlx::query("CREATE TABLE schema_version (version INTEGER NOT NULL)")
        .execute(&mut *tx)
        .await
        .context("Failed to create the schema_version table")?;
    sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
        .execute(&mut *tx)
        .await
        .context("Failed to record schema version 0")?;
    tx.commit().await.context("Failed to commit bootstrap")
}

/// Reads the schema version recorded in the database.
pub(crate) async fn version(pool: &SqlitePool) -> Res<i32> {
    let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .context("Failed to read the schema version")?;
    row.0.context("The schema_version table is empty")
}

/// Moves the schema from `current` to `target`, one version at a time. Every step is planned
/// before any SQL runs, so a missing migration leaves the database untouched.
pub(crate) async fn run(pool: &SqlitePool, current: i32, target: i32) -> Res<()> {
    let steps = plan(current, target)?;
    if steps.is_empty() {
        debug!("Schema already at version {target}");
        return Ok(());
    }
    for step in steps {
        debug!(
            "Applying migration {:02} ({}), schema version will be {}",
            step.version, step.direction, step.resulting_version
        );
        apply(pool, step.sql, step.resulting_version)
            .await
            .with_context(|| format!("Migration {:02} ({}) failed", step.version, step.direction))?;
    }
    debug!("Schema now at version {target}");
    Ok(())
}

fn plan(current: i32, target: i32) -> Res<Vec<Step>> {
    let find = |version: i32| -> Res<&'static Migration> {
        match MIGRATIONS.iter().find(|m| m.version == version) {
            Some(m) => Ok(m),
            None => bail!(
                "Migration {version} is required to go from schema version {current} to \
                {target} but does not exist"
            ),
        }
    };
    let mut steps = Vec::new();
    if current < target {
        for version in (current + 1)..=target {
            steps.push(Step {
                version,
                direction: Direction::Up,
                sql: find(version)?.up,
                resulting_version: version,
            });
        }
    } else {
        for version in ((target + 1)..=current).rev() {
            steps.push(Step {
                version,
                direction: Direction::Down,
                sql: find(version)?.down,
                resulting_version: version - 1,
            });
        }
    }
    Ok(steps)
}

/// Runs `sql` and records `resulting_version` in one SQL transaction.
async fn apply(pool: &SqlitePool, sql: &str, resulting_version: i32) -> Res<()> {
    let mut tx = pool.begin().await.context("Failed to begin migration")?;
    sqlx::raw_sql(sql)
        .execute(&mut *tx)
        .await
        .context("Failed to run migration SQL")?;
    sqlx::query("UPDATE schema_version SET version = ?")
        .bind(resulting_version)
        .execute(&mut *tx)
        .await
        .context("Failed to record the new schema version")?;
    tx.commit().await.context("Failed to commit migration")
}
