//! Catalog rules (promotions) repository

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::query::{EqualityQuery, FromSqlRow};
use super::sqlite_helpers::{bool_to_int, int_to_bool, now_iso8601};
use crate::error::AppResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRuleRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub starts_from: Option<String>,
    pub ends_till: Option<String>,
    pub status: bool,
    pub condition_type: i64,
    pub end_other_rules: bool,
    pub action_type: Option<String>,
    pub discount_amount: f64,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl FromSqlRow for CatalogRuleRecord {
    const TABLE_NAME: &'static str = "catalog_rules";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            starts_from: row.try_get("starts_from")?,
            ends_till: row.try_get("ends_till")?,
            status: int_to_bool(row.try_get("status")?),
            condition_type: row.try_get("condition_type")?,
            end_other_rules: int_to_bool(row.try_get("end_other_rules")?),
            action_type: row.try_get("action_type")?,
            discount_amount: row.try_get("discount_amount")?,
            sort_order: row.try_get("sort_order")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateCatalogRule {
    pub name: String,
    pub description: Option<String>,
    pub starts_from: Option<String>,
    pub ends_till: Option<String>,
    pub status: bool,
    pub action_type: Option<String>,
    pub discount_amount: f64,
    pub sort_order: i64,
}

pub struct CatalogRulesRepository {
    pool: SqlitePool,
}

impl CatalogRulesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run an equality filter against the table
    pub async fn filter(&self, query: &EqualityQuery) -> AppResult<Vec<CatalogRuleRecord>> {
        query.fetch_all(&self.pool).await
    }

    /// Insert a catalog rule and return its id
    pub async fn create(&self, rule: CreateCatalogRule) -> Result<i64> {
        let now = now_iso8601();
        let result = sqlx::query(
            r#"
            INSERT INTO catalog_rules (name, description, starts_from, ends_till, status, action_type, discount_amount, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rule.name)
        .bind(&rule.description)
        .bind(&rule.starts_from)
        .bind(&rule.ends_till)
        .bind(bool_to_int(rule.status))
        .bind(&rule.action_type)
        .bind(rule.discount_amount)
        .bind(rule.sort_order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
