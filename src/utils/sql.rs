use std::str::FromStr;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};

// Bootstrap DDL for the books table. `delete_at`/`delete_by` stay NULL until
// a soft delete stamps them; every read filters on `status > 0`.
pub(crate) const CREATE_BOOKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS books (
    id         TEXT PRIMARY KEY,
    status     INTEGER NOT NULL,
    create_at  TEXT NOT NULL,
    create_by  TEXT NOT NULL,
    update_at  TEXT NOT NULL,
    update_by  TEXT NOT NULL,
    delete_at  TEXT,
    delete_by  TEXT,
    book_name  TEXT NOT NULL,
    author     TEXT NOT NULL
)";

// Builds the shared connection pool, the only shared mutable resource in the
// process. An in-memory SQLite url is capped at one connection: every new
// connection to `:memory:` opens a distinct empty database.
pub(crate) async fn build_pool(config: &Configuration) -> LibraryResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(config.database_url.as_str())
        .map_err(|err| {
            LibraryError::runtime(
                format!("invalid database url {}: {}", config.database_url, err).as_str(), None)
        })?
        .create_if_missing(true);

    let max_connections = if config.database_url.contains(":memory:") {
        1
    } else {
        config.max_connections
    };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|err| {
            LibraryError::database(
                "failed to open database pool", Some(err.to_string()), false)
        })
}

pub(crate) async fn ensure_schema(pool: &SqlitePool) -> LibraryResult<()> {
    sqlx::query(CREATE_BOOKS_TABLE)
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|err| {
            LibraryError::database(
                "failed to create books table", Some(err.to_string()), false)
        })
}

// Appends the match-any suffix so lookups are prefix matches; an empty input
// degrades to `%`, the match-all pattern. The pattern is always passed as a
// bound parameter, never spliced into the statement text.
pub(crate) fn like_pattern(input: &str) -> String {
    format!("{}%", input.trim())
}

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        .with_ansi(false)
        .json()
        .init();
}
