//! Persistence seams used by the services
//!
//! The services only see these traits; [`Database`] implements both on top of
//! the sqlx repositories.

use async_trait::async_trait;

use crate::db::sqlite_helpers::is_unique_violation;
use crate::db::{AdminRecord, CreateAdmin, Database, DeleteOutcome, RoleRecord, UpdateAdmin};
use crate::error::{AppError, AppResult, ValidationErrors};
use crate::services::validation::unique_message;

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_admin(&self, id: i64) -> AppResult<Option<AdminRecord>>;

    async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<AdminRecord>>;

    /// Whether an admin other than `except_id` uses `email`
    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> AppResult<bool>;

    async fn list_admins(&self) -> AppResult<Vec<AdminRecord>>;

    async fn count_admins(&self) -> AppResult<i64>;

    async fn create_admin(&self, admin: CreateAdmin) -> AppResult<AdminRecord>;

    async fn update_admin(&self, id: i64, update: UpdateAdmin) -> AppResult<Option<AdminRecord>>;

    async fn set_admin_image(&self, id: i64, image: Option<&str>)
    -> AppResult<Option<AdminRecord>>;

    /// Delete unless it is the last admin; the check and the delete are atomic.
    async fn delete_admin_unless_last(&self, id: i64) -> AppResult<DeleteOutcome>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn find_role(&self, id: i64) -> AppResult<Option<RoleRecord>>;

    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>>;
}

/// A UNIQUE violation on write means another request took the email between
/// our check and the insert; report it the same way the check would have.
fn map_write_error(err: anyhow::Error) -> AppError {
    if err
        .downcast_ref::<sqlx::Error>()
        .is_some_and(is_unique_violation)
    {
        let mut errors = ValidationErrors::new();
        errors.add("email", unique_message("email"));
        return AppError::Validation(errors);
    }
    AppError::from(err)
}

#[async_trait]
impl AdminStore for Database {
    async fn find_admin(&self, id: i64) -> AppResult<Option<AdminRecord>> {
        Ok(self.admins().get_by_id(id).await?)
    }

    async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<AdminRecord>> {
        Ok(self.admins().get_by_email(email).await?)
    }

    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> AppResult<bool> {
        Ok(self.admins().email_taken(email, except_id).await?)
    }

    async fn list_admins(&self) -> AppResult<Vec<AdminRecord>> {
        Ok(self.admins().list_all().await?)
    }

    async fn count_admins(&self) -> AppResult<i64> {
        Ok(self.admins().count().await?)
    }

    async fn create_admin(&self, admin: CreateAdmin) -> AppResult<AdminRecord> {
        self.admins().create(admin).await.map_err(map_write_error)
    }

    async fn update_admin(&self, id: i64, update: UpdateAdmin) -> AppResult<Option<AdminRecord>> {
        self.admins()
            .update(id, update)
            .await
            .map_err(map_write_error)
    }

    async fn set_admin_image(
        &self,
        id: i64,
        image: Option<&str>,
    ) -> AppResult<Option<AdminRecord>> {
        Ok(self.admins().set_image(id, image).await?)
    }

    async fn delete_admin_unless_last(&self, id: i64) -> AppResult<DeleteOutcome> {
        Ok(self.admins().delete_unless_last(id).await?)
    }
}

#[async_trait]
impl RoleStore for Database {
    async fn find_role(&self, id: i64) -> AppResult<Option<RoleRecord>> {
        Ok(self.roles().get_by_id(id).await?)
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        Ok(self.roles().list_all().await?)
    }
}
