//! User-facing message catalog
//!
//! Every message shown to API clients is looked up by a fixed identifier.
//! English defaults are built in; a JSON file mapping identifiers to text can
//! override any of them (see `LOCALE_FILE`).

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    LoginError,
    ActivateWarning,
    LoginSuccess,
    LogoutSuccess,
    InvalidParameter,
    UserNotFound,
    RoleNotFound,
    LastDeleteError,
    CreateSuccess,
    UpdateSuccess,
    DeleteSuccess,
    Unauthenticated,
}

impl Message {
    pub const ALL: [Message; 12] = [
        Message::LoginError,
        Message::ActivateWarning,
        Message::LoginSuccess,
        Message::LogoutSuccess,
        Message::InvalidParameter,
        Message::UserNotFound,
        Message::RoleNotFound,
        Message::LastDeleteError,
        Message::CreateSuccess,
        Message::UpdateSuccess,
        Message::DeleteSuccess,
        Message::Unauthenticated,
    ];

    /// Catalog identifier
    pub fn key(self) -> &'static str {
        match self {
            Message::LoginError => "admin.settings.users.login-error",
            Message::ActivateWarning => "admin.settings.users.activate-warning",
            Message::LoginSuccess => "admin.settings.users.success-login",
            Message::LogoutSuccess => "admin.settings.users.success-logout",
            Message::InvalidParameter => "admin.response.error.invalid-parameter",
            Message::UserNotFound => "admin.settings.users.not-found",
            Message::RoleNotFound => "admin.settings.roles.not-found",
            Message::LastDeleteError => "admin.settings.users.last-delete-error",
            Message::CreateSuccess => "admin.settings.users.create-success",
            Message::UpdateSuccess => "admin.settings.users.update-success",
            Message::DeleteSuccess => "admin.settings.users.delete-success",
            Message::Unauthenticated => "admin.response.error.unauthenticated",
        }
    }

    fn default_text(self) -> &'static str {
        match self {
            Message::LoginError => "Please check your credentials and try again.",
            Message::ActivateWarning => {
                "Your account is yet to be activated, please contact administrator."
            }
            Message::LoginSuccess => "Logged in successfully.",
            Message::LogoutSuccess => "Logged out successfully.",
            Message::InvalidParameter => "Invalid parameters provided.",
            Message::UserNotFound => "User not found.",
            Message::RoleNotFound => "Role not found.",
            Message::LastDeleteError => "At least one admin is required.",
            Message::CreateSuccess => "User created successfully.",
            Message::UpdateSuccess => "User updated successfully.",
            Message::DeleteSuccess => "User deleted successfully.",
            Message::Unauthenticated => "Authentication required.",
        }
    }
}

/// Resolves [`Message`] identifiers to text.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    overrides: HashMap<String, String>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Load overrides from a flat JSON object (`{"identifier": "text"}`).
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read locale file {}", path.display()))?;
        let overrides: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid locale file {}", path.display()))?;

        let unknown: Vec<&String> = overrides
            .keys()
            .filter(|k| !Message::ALL.iter().any(|m| m.key() == k.as_str()))
            .collect();
        if !unknown.is_empty() {
            tracing::warn!(keys = ?unknown, "Locale file contains unknown message identifiers");
        }

        Ok(Self { overrides })
    }

    pub fn trans(&self, message: Message) -> String {
        self.overrides
            .get(message.key())
            .cloned()
            .unwrap_or_else(|| message.default_text().to_string())
    }
}
