//! Table definitions and connection pool setup.
//!
//! `Taco.order_position` and `Ingredient_Ref.position` record list indices;
//! row order alone is not enough to rebuild an order as it was submitted.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Ingredient (
    id   TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    type TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Taco_Order (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    delivery_name   TEXT NOT NULL CHECK (length(trim(delivery_name)) > 0),
    delivery_street TEXT NOT NULL,
    delivery_city   TEXT NOT NULL,
    delivery_state  TEXT NOT NULL,
    delivery_zip    TEXT NOT NULL,
    cc_number       TEXT NOT NULL,
    cc_expiration   TEXT NOT NULL,
    cc_cvv          TEXT NOT NULL,
    placed_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Taco (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    order_id       INTEGER NOT NULL REFERENCES Taco_Order (id),
    order_position INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Ingredient_Ref (
    ingredient_id TEXT NOT NULL REFERENCES Ingredient (id),
    taco_id       INTEGER NOT NULL REFERENCES Taco (id),
    position      INTEGER NOT NULL
);
"#;

/// Opens a pool against `database_url` with foreign keys enforced.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    info!(database_url, max_connections, "Database pool ready");
    Ok(pool)
}

/// Opens a single-connection in-memory database with the schema applied.
///
/// Every connection to `sqlite::memory:` sees its own empty database, so the
/// pool is pinned to one connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Creates any missing tables.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("Schema ready");
    Ok(())
}
