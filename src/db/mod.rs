//! Database connection and repositories

pub mod admins;
pub mod catalog_rules;
pub mod query;
pub mod roles;
pub mod schema;
pub mod seed;
pub mod sqlite_helpers;
pub mod transactions;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use admins::{AdminRecord, AdminsRepository, CreateAdmin, DeleteOutcome, UpdateAdmin};
pub use catalog_rules::{CatalogRuleRecord, CatalogRulesRepository, CreateCatalogRule};
pub use query::{EqualityQuery, FromSqlRow, SqlValue};
pub use roles::{CreateRole, RoleRecord, RolesRepository};
pub use transactions::{CreateTransaction, TransactionRecord, TransactionsRepository};

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new database connection pool.
    ///
    /// In-memory databases are pinned to a single connection so every query
    /// sees the same data.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:");
        if !in_memory {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory {}", parent.display())
                    })?;
                }
            }
        }

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { max_connections })
            .acquire_timeout(Duration::from_secs(10));
        if in_memory {
            // Dropping the only connection would drop the database
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    /// Connect and create the schema. Used by tests and the CLI start-up path.
    pub async fn connect_and_migrate(url: &str, max_connections: u32) -> Result<Self> {
        let db = Self::connect(url, max_connections).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get an admins repository
    pub fn admins(&self) -> AdminsRepository {
        AdminsRepository::new(self.pool.clone())
    }

    /// Get a roles repository
    pub fn roles(&self) -> RolesRepository {
        RolesRepository::new(self.pool.clone())
    }

    /// Get a catalog rules repository
    pub fn catalog_rules(&self) -> CatalogRulesRepository {
        CatalogRulesRepository::new(self.pool.clone())
    }

    /// Get an order transactions repository
    pub fn transactions(&self) -> TransactionsRepository {
        TransactionsRepository::new(self.pool.clone())
    }

    /// Create missing tables
    pub async fn migrate(&self) -> Result<()> {
        schema::create_tables(&self.pool)
            .await
            .context("Schema creation failed")
    }
}
