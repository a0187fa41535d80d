//! Table definitions
//!
//! Tables are created with `CREATE TABLE IF NOT EXISTS` on start-up, so the
//! statements are safe to run against an existing database.

use sqlx::SqlitePool;
use tracing::debug;

const TABLES: &[(&str, &str)] = &[
    (
        "roles",
        r#"
        CREATE TABLE IF NOT EXISTS roles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            permission_type TEXT NOT NULL DEFAULT 'custom',
            permissions TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "admins",
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password TEXT,
            api_token TEXT UNIQUE,
            status INTEGER NOT NULL DEFAULT 0,
            role_id INTEGER NOT NULL REFERENCES roles(id),
            image TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "catalog_rules",
        r#"
        CREATE TABLE IF NOT EXISTS catalog_rules (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            starts_from TEXT,
            ends_till TEXT,
            status INTEGER NOT NULL DEFAULT 0,
            condition_type INTEGER NOT NULL DEFAULT 1,
            end_other_rules INTEGER NOT NULL DEFAULT 0,
            action_type TEXT,
            discount_amount REAL NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "order_transactions",
        r#"
        CREATE TABLE IF NOT EXISTS order_transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            transaction_id TEXT NOT NULL,
            status TEXT,
            type TEXT,
            payment_method TEXT,
            amount REAL,
            invoice_id INTEGER,
            order_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
];

/// Create every table that does not exist yet.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for (name, sql) in TABLES {
        debug!(table = %name, "Ensuring table exists");
        sqlx::query(sql).execute(pool).await?;
    }
    Ok(())
}
