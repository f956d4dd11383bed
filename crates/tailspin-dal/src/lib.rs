pub mod category;
pub mod error;
pub mod game;
pub mod publisher;
pub mod seed;
pub mod validate;

use std::{str::FromStr as _, time::Duration};

pub use error::Error;
pub use sqlx::Error as SqlxError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::debug;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type ChosenRow = sqlx::sqlite::SqliteRow;
pub type Pool = sqlx::Pool<ChosenDB>;

/// Write transactions take the database lock on their first statement,
/// other writers wait up to `BUSY_TIMEOUT` for it
pub(crate) const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Reads an entity from a joined row, where its columns carry a `<entity>_` prefix
pub trait FromRowPrefixed: Sized {
    fn from_row_prefixed(row: &ChosenRow) -> Result<Self, sqlx::Error>;
}

/// Opens (and creates if missing) the database and brings the schema up to date
pub async fn new_pool(database_url: &str) -> Result<Pool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect_with(options)
        .await?;
    MIGRATOR.run(&pool).await?;
    debug!("Database ready at {database_url}");
    Ok(pool)
}
