//! Admins repository
//!
//! Email uniqueness is enforced by the `UNIQUE COLLATE NOCASE` column
//! constraint as well as by the service-level check, and the last-admin guard
//! is folded into the DELETE statement itself.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sqlite_helpers::{bool_to_int, int_to_bool, now_iso8601};

// ============================================================================
// Admin Records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub status: bool,
    pub role_id: i64,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateAdmin {
    pub name: String,
    pub email: String,
    /// Already hashed
    pub password: Option<String>,
    pub api_token: Option<String>,
    pub status: bool,
    pub role_id: i64,
}

#[derive(Debug, Clone)]
pub struct UpdateAdmin {
    pub name: String,
    pub email: String,
    /// Already hashed; `None` keeps the stored password
    pub password: Option<String>,
    pub status: bool,
    pub role_id: i64,
}

/// Result of [`AdminsRepository::delete_unless_last`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    LastRemaining,
}

type AdminRow = (
    i64,
    String,
    String,
    Option<String>,
    Option<String>,
    i64,
    i64,
    Option<String>,
    String,
    String,
);

fn row_to_record(r: AdminRow) -> AdminRecord {
    AdminRecord {
        id: r.0,
        name: r.1,
        email: r.2,
        password: r.3,
        api_token: r.4,
        status: int_to_bool(r.5),
        role_id: r.6,
        image: r.7,
        created_at: r.8,
        updated_at: r.9,
    }
}

const SELECT_ADMIN: &str = "SELECT id, name, email, password, api_token, status, role_id, image, created_at, updated_at FROM admins";

// ============================================================================
// Repository
// ============================================================================

pub struct AdminsRepository {
    pool: SqlitePool,
}

impl AdminsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get admin by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<AdminRecord>> {
        let row = sqlx::query_as::<_, AdminRow>(&format!("{} WHERE id = ?", SELECT_ADMIN))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(row_to_record))
    }

    /// Get admin by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<AdminRecord>> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "{} WHERE email = ? COLLATE NOCASE",
            SELECT_ADMIN
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// Whether another admin already uses this email. `except_id` excludes the
    /// admin being updated.
    pub async fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM admins WHERE email = ? COLLATE NOCASE AND (? IS NULL OR id <> ?)",
        )
        .bind(email)
        .bind(except_id)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// List all admins
    pub async fn list_all(&self) -> Result<Vec<AdminRecord>> {
        let rows = sqlx::query_as::<_, AdminRow>(&format!("{} ORDER BY id", SELECT_ADMIN))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Count admins, active or not
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a new admin
    pub async fn create(&self, admin: CreateAdmin) -> Result<AdminRecord> {
        let now = now_iso8601();

        let result = sqlx::query(
            r#"
            INSERT INTO admins (name, email, password, api_token, status, role_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password)
        .bind(&admin.api_token)
        .bind(bool_to_int(admin.status))
        .bind(admin.role_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create admin"))
    }

    /// Update an admin in place. Returns `None` when the id does not exist.
    pub async fn update(&self, id: i64, update: UpdateAdmin) -> Result<Option<AdminRecord>> {
        let now = now_iso8601();

        let result = match update.password {
            Some(password) => {
                sqlx::query(
                    "UPDATE admins SET name = ?, email = ?, password = ?, status = ?, role_id = ?, updated_at = ? WHERE id = ?",
                )
                .bind(&update.name)
                .bind(&update.email)
                .bind(password)
                .bind(bool_to_int(update.status))
                .bind(update.role_id)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE admins SET name = ?, email = ?, status = ?, role_id = ?, updated_at = ? WHERE id = ?",
                )
                .bind(&update.name)
                .bind(&update.email)
                .bind(bool_to_int(update.status))
                .bind(update.role_id)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Store (or clear) the image path of an admin
    pub async fn set_image(&self, id: i64, image: Option<&str>) -> Result<Option<AdminRecord>> {
        let now = now_iso8601();
        let result = sqlx::query("UPDATE admins SET image = ?, updated_at = ? WHERE id = ?")
            .bind(image)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete an admin unless it is the only one left.
    ///
    /// The count check and the delete run as one statement, so two concurrent
    /// deletes can never remove the last two admins.
    pub async fn delete_unless_last(&self, id: i64) -> Result<DeleteOutcome> {
        let result = sqlx::query(
            "DELETE FROM admins WHERE id = ? AND (SELECT COUNT(*) FROM admins) > 1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(DeleteOutcome::Deleted);
        }

        if self.get_by_id(id).await?.is_some() {
            Ok(DeleteOutcome::LastRemaining)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}
