//! Equality-conjunction query builder
//!
//! Builds `SELECT ... WHERE a = ?1 AND b = ?2` for a table from a flat
//! key/value mapping and binds the values through sqlx. Column names come
//! from API input, so they are checked against a plain-identifier pattern and
//! quoted before they reach the SQL string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;

use crate::error::{AppError, AppResult};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Decode a SQLite row into an entity.
pub trait FromSqlRow: Sized {
    /// Table the entity is read from
    const TABLE_NAME: &'static str;

    /// Column used when no other order is requested
    const DEFAULT_SORT: &'static str = "id";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// SQL value for parameterized queries
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl SqlValue {
    /// Bind this value to a sqlx query
    pub fn bind_to_query<'q>(
        &'q self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        match self {
            SqlValue::String(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Bool(b) => query.bind(if *b { 1i32 } else { 0i32 }),
            SqlValue::Null => query.bind(None::<String>),
        }
    }
}

impl TryFrom<&Value> for SqlValue {
    type Error = String;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(SqlValue::Null),
            Value::Bool(b) => Ok(SqlValue::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(SqlValue::Int)
                .or_else(|| n.as_f64().map(SqlValue::Float))
                .ok_or_else(|| format!("Unsupported number {}", n)),
            Value::String(s) => Ok(SqlValue::String(s.clone())),
            Value::Array(_) | Value::Object(_) => Err("must be a scalar value".to_string()),
        }
    }
}

/// One `column = value` term of the conjunction
#[derive(Debug, Clone, PartialEq)]
struct Condition {
    column: String,
    value: SqlValue,
}

/// Query builder for `WHERE` clauses made only of ANDed equalities.
#[derive(Debug, Clone)]
pub struct EqualityQuery {
    table: &'static str,
    conditions: Vec<Condition>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl EqualityQuery {
    /// Create a query with no conditions.
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            conditions: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Build a query from a filter mapping. Every pair becomes one equality.
    pub fn from_filter(table: &'static str, filter: &Map<String, Value>) -> AppResult<Self> {
        filter
            .iter()
            .try_fold(Self::new(table), |query, (key, value)| query.where_eq(key, value))
    }

    /// Add one `column = value` condition.
    pub fn where_eq(mut self, column: &str, value: &Value) -> AppResult<Self> {
        if !IDENTIFIER.is_match(column) {
            return Err(AppError::validation(format!(
                "The filter field '{}' is not a valid column name.",
                column
            )));
        }

        let value = SqlValue::try_from(value).map_err(|e| {
            AppError::validation(format!("The filter field '{}' {}.", column, e))
        })?;

        self.conditions.push(Condition {
            column: column.to_string(),
            value,
        });
        Ok(self)
    }

    /// Set limit directly.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set offset directly.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Column names in condition order
    pub fn columns(&self) -> Vec<&str> {
        self.conditions.iter().map(|c| c.column.as_str()).collect()
    }

    /// Values that will be bound, in placeholder order
    pub fn values(&self) -> Vec<&SqlValue> {
        self.conditions
            .iter()
            .filter(|c| c.value != SqlValue::Null)
            .map(|c| &c.value)
            .collect()
    }

    fn where_sql(&self) -> String {
        let mut param = 0;
        let terms: Vec<String> = self
            .conditions
            .iter()
            .map(|c| match c.value {
                SqlValue::Null => format!("\"{}\" IS NULL", c.column),
                _ => {
                    param += 1;
                    format!("\"{}\" = ?{}", c.column, param)
                }
            })
            .collect();

        if terms.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", terms.join(" AND "))
        }
    }

    /// Build the SELECT statement.
    pub fn build_sql(&self, default_sort: &str) -> String {
        let mut sql = format!("SELECT * FROM {}{}", self.table, self.where_sql());
        sql.push_str(&format!(" ORDER BY {}", default_sort));

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset
            && offset > 0
        {
            if self.limit.is_none() {
                sql.push_str(" LIMIT -1");
            }
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        sql
    }

    /// Execute the query and decode every row.
    pub async fn fetch_all<E: FromSqlRow>(&self, pool: &SqlitePool) -> AppResult<Vec<E>> {
        let sql = self.build_sql(E::DEFAULT_SORT);
        tracing::debug!(sql = %sql, "Executing filter query");

        let mut query = sqlx::query(&sql);
        for value in self.values() {
            query = value.bind_to_query(query);
        }

        let rows = query.fetch_all(pool).await?;
        rows.iter()
            .map(E::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::from)
    }
}
