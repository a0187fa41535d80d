//! Admin services and their collaborators

pub mod admins;
pub mod auth;
pub mod events;
pub mod filters;
pub mod images;
pub mod logging;
pub mod store;
pub mod validation;

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::db::Database;
use crate::messages::Translator;

pub use admins::{AdminInput, AdminMutationResult, AdminService};
pub use auth::{
    AuthService, AuthSession, CredentialVerifier, IssuedToken, JwtTokenIssuer, LoginResult,
    LogoutResult, PasswordVerifier, TokenConfig, TokenIssuer,
};
pub use events::{AdminEvent, BroadcastNotifier, LifecycleNotifier};
pub use filters::{CatalogRuleFilter, FilterArgs, FilterTranslator, TransactionFilter};
pub use images::{ImageOwner, ImageStore, ImageUpload, LocalImageStore, StoredImage};
pub use store::{AdminStore, RoleStore};

/// Everything the GraphQL layer needs, wired once at start-up.
#[derive(Clone)]
pub struct Services {
    pub db: Database,
    pub auth: Arc<AuthService>,
    pub admins: Arc<AdminService>,
    pub events: Arc<BroadcastNotifier>,
    pub translator: Arc<Translator>,
}

impl Services {
    /// Wire the production collaborators: SQLite stores, bcrypt credentials,
    /// JWT sessions, broadcast events and local image storage.
    pub fn from_config(config: &Config, db: Database) -> Result<Self> {
        let translator = Arc::new(match &config.locale_file {
            Some(path) => Translator::from_file(path)?,
            None => Translator::new(),
        });

        let store = Arc::new(db.clone());
        let events = Arc::new(BroadcastNotifier::default());
        let tokens = Arc::new(JwtTokenIssuer::new(TokenConfig {
            secret: config.jwt_secret.clone(),
            ttl_seconds: config.jwt_ttl_seconds()?,
            remember_ttl_seconds: config.jwt_remember_ttl_seconds()?,
        }));

        let auth = AuthService::new(
            Arc::new(PasswordVerifier::new(store.clone())),
            tokens,
            store.clone(),
            translator.clone(),
        );
        let admins = AdminService::new(
            store.clone(),
            store,
            events.clone(),
            Arc::new(LocalImageStore::new(&config.image_storage_path)),
            translator.clone(),
            config.bcrypt_cost,
        );

        Ok(Self {
            db,
            auth: Arc::new(auth),
            admins: Arc::new(admins),
            events,
            translator,
        })
    }
}
