//! Order transactions repository

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::query::{EqualityQuery, FromSqlRow};
use super::sqlite_helpers::now_iso8601;
use crate::error::AppResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: i64,
    pub transaction_id: String,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub payment_method: Option<String>,
    pub amount: Option<f64>,
    pub invoice_id: Option<i64>,
    pub order_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl FromSqlRow for TransactionRecord {
    const TABLE_NAME: &'static str = "order_transactions";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            transaction_id: row.try_get("transaction_id")?,
            status: row.try_get("status")?,
            transaction_type: row.try_get("type")?,
            payment_method: row.try_get("payment_method")?,
            amount: row.try_get("amount")?,
            invoice_id: row.try_get("invoice_id")?,
            order_id: row.try_get("order_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateTransaction {
    pub transaction_id: String,
    pub status: Option<String>,
    pub transaction_type: Option<String>,
    pub payment_method: Option<String>,
    pub amount: Option<f64>,
    pub invoice_id: Option<i64>,
    pub order_id: i64,
}

pub struct TransactionsRepository {
    pool: SqlitePool,
}

impl TransactionsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run an equality filter against the table
    pub async fn filter(&self, query: &EqualityQuery) -> AppResult<Vec<TransactionRecord>> {
        query.fetch_all(&self.pool).await
    }

    /// Insert a transaction and return its id
    pub async fn create(&self, tx: CreateTransaction) -> Result<i64> {
        let now = now_iso8601();
        let result = sqlx::query(
            r#"
            INSERT INTO order_transactions (transaction_id, status, type, payment_method, amount, invoice_id, order_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tx.transaction_id)
        .bind(&tx.status)
        .bind(&tx.transaction_type)
        .bind(&tx.payment_method)
        .bind(tx.amount)
        .bind(tx.invoice_id)
        .bind(tx.order_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
