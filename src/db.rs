//! # Item Store
//!
//! SQLite persistence for consumable items. Every query is scoped by the
//! owning Telegram user; validation happens in the dialogue layer, so the
//! functions here trust their inputs.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use tracing::{debug, info};

/// A persisted consumable record
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Item {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub created_at: String,
}

/// The subset of an item shown in the `/list` reply
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ItemSummary {
    pub name: String,
    pub start_date: NaiveDate,
}

/// Open a connection pool, creating the database file if it does not exist
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database URL: {database_url}"))?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Failed to connect to database")
}

/// Initialize the database schema. Safe to call on every start.
pub async fn init_database_schema(pool: &SqlitePool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id INTEGER NOT NULL,
            name TEXT NOT NULL CHECK(length(name) <= 100),
            start_date TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create items table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_items_owner_start_date ON items(owner_id, start_date)",
    )
    .execute(pool)
    .await
    .context("Failed to create items owner index")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Insert a new item and return its identifier
pub async fn insert_item(
    pool: &SqlitePool,
    owner_id: i64,
    name: &str,
    start_date: NaiveDate,
) -> Result<i64> {
    debug!(user_id = owner_id, item_name = %name, %start_date, "Inserting item");

    let result = sqlx::query("INSERT INTO items (owner_id, name, start_date) VALUES (?1, ?2, ?3)")
        .bind(owner_id)
        .bind(name)
        .bind(start_date)
        .execute(pool)
        .await
        .context("Failed to insert item")?;

    let item_id = result.last_insert_rowid();
    info!(user_id = owner_id, item_id, "Item created");

    Ok(item_id)
}

/// List an owner's items, oldest start date first
pub async fn list_items_by_owner(pool: &SqlitePool, owner_id: i64) -> Result<Vec<ItemSummary>> {
    let items = sqlx::query_as::<_, ItemSummary>(
        "SELECT name, start_date FROM items WHERE owner_id = ?1 ORDER BY start_date, id",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .context("Failed to list items")?;

    debug!(user_id = owner_id, items_count = items.len(), "Listed items");
    Ok(items)
}

/// Delete every item of `owner_id` whose name matches exactly.
///
/// Names are not unique per owner, so this may remove several rows. Returns
/// the number of rows removed.
pub async fn delete_items_by_owner_and_name(
    pool: &SqlitePool,
    owner_id: i64,
    name: &str,
) -> Result<u64> {
    let rows_affected = sqlx::query("DELETE FROM items WHERE owner_id = ?1 AND name = ?2")
        .bind(owner_id)
        .bind(name)
        .execute(pool)
        .await
        .context("Failed to delete items")?
        .rows_affected();

    info!(user_id = owner_id, item_name = %name, rows_affected, "Deleted items");
    Ok(rows_affected)
}

/// Read a single item by ID
pub async fn read_item(pool: &SqlitePool, item_id: i64) -> Result<Option<Item>> {
    sqlx::query_as::<_, Item>(
        "SELECT id, owner_id, name, start_date, CAST(created_at AS TEXT) AS created_at
         FROM items WHERE id = ?1",
    )
    .bind(item_id)
    .fetch_optional(pool)
    .await
    .context("Failed to read item")
}
