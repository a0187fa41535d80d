//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use storefront_admin::db::seed::run_seeds;
use storefront_admin::db::{AdminRecord, CreateAdmin, Database, RoleRecord};
use storefront_admin::error::{AppError, AppResult};
use storefront_admin::messages::Translator;
use storefront_admin::services::{
    AdminEvent, AdminService, AuthService, AuthSession, ImageOwner, ImageStore, ImageUpload,
    IssuedToken, JwtTokenIssuer, LifecycleNotifier, PasswordVerifier, StoredImage, TokenConfig,
    TokenIssuer,
};

pub const BCRYPT_COST: u32 = 4;

/// Notifier that keeps every event it receives
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<AdminEvent>>,
}

impl RecordingNotifier {
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(AdminEvent::name).collect()
    }

    pub fn events(&self) -> Vec<AdminEvent> {
        self.events.lock().clone()
    }
}

impl LifecycleNotifier for RecordingNotifier {
    fn notify(&self, event: AdminEvent) {
        self.events.lock().push(event);
    }
}

/// One recorded `ImageStore::attach` call
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCall {
    pub owner_id: i64,
    pub source: String,
    pub prefix: String,
    pub field: String,
}

/// Image store that records calls and pretends to store the file.
/// Sources starting with `data:text/` are rejected as non-images.
#[derive(Default)]
pub struct RecordingImages {
    calls: Mutex<Vec<ImageCall>>,
}

impl RecordingImages {
    pub fn calls(&self) -> Vec<ImageCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImages {
    async fn load(&self, source: &str) -> AppResult<Option<ImageUpload>> {
        if source.trim().is_empty() {
            return Ok(None);
        }
        if source.starts_with("data:text/") {
            return Err(AppError::validation("The image must be an image."));
        }
        Ok(Some(ImageUpload {
            bytes: source.as_bytes().to_vec(),
            extension: "png",
        }))
    }

    async fn attach(
        &self,
        owner: ImageOwner<'_>,
        image: ImageUpload,
        prefix: &str,
        field: &str,
    ) -> AppResult<StoredImage> {
        self.calls.lock().push(ImageCall {
            owner_id: owner.id,
            source: String::from_utf8_lossy(&image.bytes).into_owned(),
            prefix: prefix.to_string(),
            field: field.to_string(),
        });
        Ok(StoredImage {
            field: field.to_string(),
            path: format!("{}{}/avatar.{}", prefix, owner.id, image.extension),
        })
    }
}

/// Token issuer that remembers every session it hands out
pub struct RecordingTokens {
    inner: JwtTokenIssuer,
    issued: Mutex<Vec<AuthSession>>,
}

impl RecordingTokens {
    pub fn new() -> Self {
        Self {
            inner: JwtTokenIssuer::new(TokenConfig {
                secret: "integration-secret".to_string(),
                ttl_seconds: 3600,
                remember_ttl_seconds: 7 * 24 * 3600,
            }),
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn issued(&self) -> Vec<AuthSession> {
        self.issued.lock().clone()
    }
}

impl TokenIssuer for RecordingTokens {
    fn issue(&self, admin: &AdminRecord, remember: bool) -> AppResult<IssuedToken> {
        let issued = self.inner.issue(admin, remember)?;
        self.issued.lock().push(issued.session.clone());
        Ok(issued)
    }

    fn verify(&self, token: &str) -> AppResult<AuthSession> {
        self.inner.verify(token)
    }

    fn revoke(&self, session: &AuthSession) {
        self.inner.revoke(session)
    }

    fn is_revoked(&self, session_id: &str) -> bool {
        self.inner.is_revoked(session_id)
    }
}

pub struct Harness {
    pub db: Database,
    pub role: RoleRecord,
    pub notifier: Arc<RecordingNotifier>,
    pub images: Arc<RecordingImages>,
    pub tokens: Arc<RecordingTokens>,
    pub admins: AdminService,
    pub auth: AuthService,
}

impl Harness {
    /// In-memory database with the Administrator role and no admins.
    pub async fn new() -> Self {
        let db = Database::connect_and_migrate("sqlite::memory:", 1)
            .await
            .unwrap();
        run_seeds(&db, None, BCRYPT_COST).await.unwrap();
        let role = db.roles().list_all().await.unwrap().remove(0);

        let store = Arc::new(db.clone());
        let translator = Arc::new(Translator::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let images = Arc::new(RecordingImages::default());
        let tokens = Arc::new(RecordingTokens::new());

        let admins = AdminService::new(
            store.clone(),
            store.clone(),
            notifier.clone(),
            images.clone(),
            translator.clone(),
            BCRYPT_COST,
        );
        let auth = AuthService::new(
            Arc::new(PasswordVerifier::new(store.clone())),
            tokens.clone(),
            store,
            translator,
        );

        Self {
            db,
            role,
            notifier,
            images,
            tokens,
            admins,
            auth,
        }
    }

    /// Insert an admin directly, bypassing the service and its events.
    pub async fn insert_admin(&self, email: &str, password: &str, status: bool) -> AdminRecord {
        self.db
            .admins()
            .create(CreateAdmin {
                name: "Existing".to_string(),
                email: email.to_string(),
                password: Some(bcrypt::hash(password, BCRYPT_COST).unwrap()),
                api_token: None,
                status,
                role_id: self.role.id,
            })
            .await
            .unwrap()
    }

    pub async fn admin_count(&self) -> i64 {
        self.db.admins().count().await.unwrap()
    }
}
