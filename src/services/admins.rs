//! Admin account management
//!
//! Create, update and delete admin accounts. Every mutation validates its
//! input, resolves the referenced role and loads any image source before it
//! writes. Lifecycle events surround the storage write, and the loaded image
//! is handed to the [`ImageStore`] once the row exists.

use std::sync::Arc;

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{debug, info, warn};

use crate::db::{AdminRecord, CreateAdmin, DeleteOutcome, RoleRecord, UpdateAdmin};
use crate::error::{AppError, AppResult};
use crate::messages::{Message, Translator};
use crate::services::events::{AdminEvent, LifecycleNotifier};
use crate::services::images::{ImageOwner, ImageStore, ImageUpload};
use crate::services::store::{AdminStore, RoleStore};
use crate::services::validation::{Validator, filled};

/// Directory prefix for admin images inside the image store
pub const IMAGE_PREFIX: &str = "admins/";
const IMAGE_FIELD: &str = "image";
const API_TOKEN_LENGTH: usize = 80;

/// Create/update payload as received from the API
#[derive(Debug, Clone, Default)]
pub struct AdminInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub role_id: Option<i64>,
    pub status: Option<bool>,
    /// Remote URL or data URI
    pub image: Option<String>,
}

impl AdminInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.password_confirmation.is_none()
            && self.role_id.is_none()
            && self.status.is_none()
            && self.image.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct AdminMutationResult {
    pub message: String,
    pub admin: AdminRecord,
}

/// Validated fields shared by create and update
struct ValidAdmin {
    name: String,
    email: String,
    password: Option<String>,
    role_id: i64,
}

fn random_api_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(API_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub struct AdminService {
    admins: Arc<dyn AdminStore>,
    roles: Arc<dyn RoleStore>,
    notifier: Arc<dyn LifecycleNotifier>,
    images: Arc<dyn ImageStore>,
    translator: Arc<Translator>,
    bcrypt_cost: u32,
}

impl AdminService {
    pub fn new(
        admins: Arc<dyn AdminStore>,
        roles: Arc<dyn RoleStore>,
        notifier: Arc<dyn LifecycleNotifier>,
        images: Arc<dyn ImageStore>,
        translator: Arc<Translator>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            admins,
            roles,
            notifier,
            images,
            translator,
            bcrypt_cost,
        }
    }

    fn invalid_parameter(&self) -> AppError {
        AppError::validation(self.translator.trans(Message::InvalidParameter))
    }

    fn not_found(&self, message: Message) -> AppError {
        AppError::NotFound(self.translator.trans(message))
    }

    /// Run the field rules. `except_id` is the admin being updated, whose own
    /// email does not count as taken.
    async fn validate(
        &self,
        input: &AdminInput,
        except_id: Option<i64>,
        password_min: Option<usize>,
    ) -> AppResult<ValidAdmin> {
        let mut v = Validator::new();

        let name = v.required("name", input.name.as_deref());
        let email = v.required("email", input.email.as_deref()).map(str::trim);
        if let Some(email) = email {
            if v.email("email", email) {
                let taken = self.admins.email_taken(email, except_id).await?;
                v.unique("email", taken);
            }
        }

        let password = filled(input.password.as_deref());
        if let (Some(password), Some(min)) = (password, password_min) {
            v.min_length("password", password, min);
        }
        v.confirmed(
            "password_confirmation",
            input.password_confirmation.as_deref(),
            "password",
            password,
        );
        let role_id = v.required_value("role_id", input.role_id);

        v.finish()?;

        match (name, email, role_id) {
            (Some(name), Some(email), Some(role_id)) => Ok(ValidAdmin {
                name: name.to_string(),
                email: email.to_string(),
                password: password.map(str::to_string),
                role_id,
            }),
            _ => Err(self.invalid_parameter()),
        }
    }

    async fn require_role(&self, role_id: i64) -> AppResult<RoleRecord> {
        self.roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| self.not_found(Message::RoleNotFound))
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    /// Fetch and check an image source before anything is written. Absent or
    /// blank sources yield `None`.
    async fn load_image(&self, source: Option<&str>) -> AppResult<Option<ImageUpload>> {
        match filled(source) {
            Some(source) => self.images.load(source).await,
            None => Ok(None),
        }
    }

    /// Store a loaded image for a freshly written admin.
    async fn attach_image(
        &self,
        admin: AdminRecord,
        image: Option<ImageUpload>,
    ) -> AppResult<AdminRecord> {
        let Some(image) = image else {
            return Ok(admin);
        };

        let owner = ImageOwner {
            kind: "admin",
            id: admin.id,
        };
        let stored = self
            .images
            .attach(owner, image, IMAGE_PREFIX, IMAGE_FIELD)
            .await?;

        debug!(admin_id = admin.id, field = %stored.field, path = %stored.path, "Admin image attached");
        self.admins
            .set_admin_image(admin.id, Some(&stored.path))
            .await?
            .ok_or_else(|| self.not_found(Message::UserNotFound))
    }

    /// Create an admin.
    pub async fn create(&self, input: Option<AdminInput>) -> AppResult<AdminMutationResult> {
        let Some(input) = input.filter(|i| !i.is_empty()) else {
            return Err(self.invalid_parameter());
        };

        let valid = self.validate(&input, None, Some(6)).await?;
        let role = self.require_role(valid.role_id).await?;
        let image = self.load_image(input.image.as_deref()).await?;

        let (password, api_token) = match valid.password.as_deref() {
            Some(password) => (Some(self.hash_password(password)?), Some(random_api_token())),
            None => (None, None),
        };

        self.notifier.notify(AdminEvent::CreateBefore);

        let admin = self
            .admins
            .create_admin(CreateAdmin {
                name: valid.name,
                email: valid.email,
                password,
                api_token,
                status: input.status.unwrap_or(false),
                role_id: role.id,
            })
            .await?;

        let admin = self.attach_image(admin, image).await?;

        self.notifier.notify(AdminEvent::CreateAfter(admin.clone()));
        info!(admin_id = admin.id, role_id = role.id, "Admin created");

        Ok(AdminMutationResult {
            message: self.translator.trans(Message::CreateSuccess),
            admin,
        })
    }

    /// Update an admin. A missing `status` deactivates the account.
    pub async fn update(
        &self,
        id: Option<i64>,
        input: Option<AdminInput>,
    ) -> AppResult<AdminMutationResult> {
        let (Some(id), Some(input)) = (id, input.filter(|i| !i.is_empty())) else {
            return Err(self.invalid_parameter());
        };

        let valid = self.validate(&input, Some(id), None).await?;

        if self.admins.find_admin(id).await?.is_none() {
            return Err(self.not_found(Message::UserNotFound));
        }
        let role = self.require_role(valid.role_id).await?;
        let image = self.load_image(input.image.as_deref()).await?;

        let password = valid
            .password
            .as_deref()
            .map(|p| self.hash_password(p))
            .transpose()?;
        let password_changed = password.is_some();

        self.notifier.notify(AdminEvent::UpdateBefore(id));

        let admin = self
            .admins
            .update_admin(
                id,
                UpdateAdmin {
                    name: valid.name,
                    email: valid.email,
                    password,
                    status: input.status.unwrap_or(false),
                    role_id: role.id,
                },
            )
            .await?
            .ok_or_else(|| self.not_found(Message::UserNotFound))?;

        let admin = self.attach_image(admin, image).await?;

        if password_changed {
            self.notifier.notify(AdminEvent::UpdatePassword(admin.clone()));
        }
        self.notifier.notify(AdminEvent::UpdateAfter(admin.clone()));
        info!(admin_id = admin.id, password_changed, "Admin updated");

        Ok(AdminMutationResult {
            message: self.translator.trans(Message::UpdateSuccess),
            admin,
        })
    }

    /// Delete an admin. The last remaining admin can never be deleted.
    pub async fn delete(&self, id: Option<i64>) -> AppResult<String> {
        let Some(id) = id else {
            return Err(self.invalid_parameter());
        };

        if self.admins.find_admin(id).await?.is_none() {
            return Err(self.not_found(Message::UserNotFound));
        }

        if self.admins.count_admins().await? == 1 {
            warn!(admin_id = id, "Refusing to delete the last admin");
            return Err(AppError::Invariant(
                self.translator.trans(Message::LastDeleteError),
            ));
        }

        self.notifier.notify(AdminEvent::DeleteBefore(id));

        match self.admins.delete_admin_unless_last(id).await? {
            DeleteOutcome::Deleted => {}
            DeleteOutcome::NotFound => return Err(self.not_found(Message::UserNotFound)),
            DeleteOutcome::LastRemaining => {
                warn!(admin_id = id, "Concurrent delete left one admin, aborting");
                return Err(AppError::Invariant(
                    self.translator.trans(Message::LastDeleteError),
                ));
            }
        }

        self.notifier.notify(AdminEvent::DeleteAfter(id));
        info!(admin_id = id, "Admin deleted");

        Ok(self.translator.trans(Message::DeleteSuccess))
    }

    pub async fn find(&self, id: i64) -> AppResult<AdminRecord> {
        self.admins
            .find_admin(id)
            .await?
            .ok_or_else(|| self.not_found(Message::UserNotFound))
    }

    pub async fn list(&self) -> AppResult<Vec<AdminRecord>> {
        self.admins.list_admins().await
    }

    pub async fn roles(&self) -> AppResult<Vec<RoleRecord>> {
        self.roles.list_roles().await
    }

    pub async fn find_role(&self, id: i64) -> AppResult<Option<RoleRecord>> {
        self.roles.find_role(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_token_shape() {
        let token = random_api_token();
        assert_eq!(token.len(), 80);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, random_api_token());
    }

    #[test]
    fn test_default_input_is_empty() {
        assert!(AdminInput::default().is_empty());
        assert!(
            !AdminInput {
                status: Some(true),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
