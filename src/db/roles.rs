//! Roles repository
//!
//! Roles are only read by the admin operations; `create` exists for seeding.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sqlite_helpers::{json_to_vec, now_iso8601, vec_to_json};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// `all` or `custom`
    pub permission_type: String,
    pub permissions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateRole {
    pub name: String,
    pub description: Option<String>,
    pub permission_type: String,
    pub permissions: Vec<String>,
}

type RoleRow = (i64, String, Option<String>, String, String, String, String);

fn row_to_record(r: RoleRow) -> RoleRecord {
    RoleRecord {
        id: r.0,
        name: r.1,
        description: r.2,
        permission_type: r.3,
        permissions: json_to_vec(&r.4),
        created_at: r.5,
        updated_at: r.6,
    }
}

const SELECT_ROLE: &str =
    "SELECT id, name, description, permission_type, permissions, created_at, updated_at FROM roles";

pub struct RolesRepository {
    pool: SqlitePool,
}

impl RolesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get role by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<RoleRecord>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!("{} WHERE id = ?", SELECT_ROLE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(row_to_record))
    }

    /// Get role by name (case-insensitive)
    pub async fn get_by_name(&self, name: &str) -> Result<Option<RoleRecord>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "{} WHERE name = ? COLLATE NOCASE",
            SELECT_ROLE
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// List all roles
    pub async fn list_all(&self) -> Result<Vec<RoleRecord>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!("{} ORDER BY id", SELECT_ROLE))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Create a new role
    pub async fn create(&self, role: CreateRole) -> Result<RoleRecord> {
        let now = now_iso8601();

        let result = sqlx::query(
            r#"
            INSERT INTO roles (name, description, permission_type, permissions, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&role.name)
        .bind(&role.description)
        .bind(&role.permission_type)
        .bind(vec_to_json(&role.permissions))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create role"))
    }
}
