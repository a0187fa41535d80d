//! Admin authentication and session handling
//!
//! Provides:
//! - Credential checks against bcrypt password hashes
//! - JWT access tokens carrying a session id (`jti`)
//! - In-memory session revocation for logout and inactive accounts

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::AdminRecord;
use crate::error::{AppError, AppResult};
use crate::messages::{Message, Translator};
use crate::services::store::AdminStore;
use crate::services::validation::Validator;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims structure for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Admin ID (subject)
    pub sub: String,
    /// Session id, used for revocation
    pub jti: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

// ============================================================================
// Auth Types
// ============================================================================

/// An authenticated session, threaded through resolvers in the request data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub admin_id: i64,
    pub session_id: String,
    /// Unix timestamp
    pub expires_at: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub session: AuthSession,
    /// Seconds until expiry
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub message: String,
    /// `Bearer <jwt>`
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: AdminRecord,
    pub session: AuthSession,
}

#[derive(Debug, Clone)]
pub struct LogoutResult {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Collaborators
// ============================================================================

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// The matching admin when the credentials are right, whatever its status.
    async fn attempt(&self, email: &str, password: &str) -> AppResult<Option<AdminRecord>>;
}

pub trait TokenIssuer: Send + Sync {
    fn issue(&self, admin: &AdminRecord, remember: bool) -> AppResult<IssuedToken>;

    fn verify(&self, token: &str) -> AppResult<AuthSession>;

    fn revoke(&self, session: &AuthSession);

    fn is_revoked(&self, session_id: &str) -> bool;
}

/// Checks passwords against the bcrypt hash stored on the admin.
pub struct PasswordVerifier {
    admins: Arc<dyn AdminStore>,
}

impl PasswordVerifier {
    pub fn new(admins: Arc<dyn AdminStore>) -> Self {
        Self { admins }
    }
}

#[async_trait]
impl CredentialVerifier for PasswordVerifier {
    async fn attempt(&self, email: &str, password: &str) -> AppResult<Option<AdminRecord>> {
        let Some(admin) = self.admins.find_admin_by_email(email).await? else {
            return Ok(None);
        };

        let Some(hash) = admin.password.as_deref() else {
            debug!(admin_id = admin.id, "Admin has no password set");
            return Ok(None);
        };

        if bcrypt::verify(password, hash)? {
            Ok(Some(admin))
        } else {
            Ok(None)
        }
    }
}

/// Token lifetimes and signing secret
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_seconds: i64,
    /// Used when the client asks to be remembered
    pub remember_ttl_seconds: i64,
}

/// HS256 JWT issuer with an in-memory revocation list.
pub struct JwtTokenIssuer {
    config: TokenConfig,
    /// jti -> exp, so entries can be dropped once the token is dead anyway
    revoked: RwLock<HashMap<String, i64>>,
}

impl JwtTokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        Self {
            config,
            revoked: RwLock::new(HashMap::new()),
        }
    }

    fn prune(&self, now: i64) {
        self.revoked.write().retain(|_, exp| *exp > now);
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, admin: &AdminRecord, remember: bool) -> AppResult<IssuedToken> {
        let seconds = if remember {
            self.config.remember_ttl_seconds
        } else {
            self.config.ttl_seconds
        };
        let ttl = Duration::try_seconds(seconds)
            .filter(|d| *d > Duration::zero())
            .ok_or_else(|| AppError::Internal(format!("Invalid token lifetime: {}s", seconds)))?;
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal(format!("Invalid token lifetime: {}s", seconds)))?;

        let claims = AccessTokenClaims {
            sub: admin.id.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )?;

        Ok(IssuedToken {
            token,
            session: AuthSession {
                admin_id: admin.id,
                session_id: claims.jti,
                expires_at: claims.exp,
            },
            expires_in: ttl.num_seconds(),
        })
    }

    fn verify(&self, token: &str) -> AppResult<AuthSession> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let claims = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))?
        .claims;

        if claims.token_type != "access" {
            return Err(AppError::Auth("Invalid token type".to_string()));
        }
        if self.is_revoked(&claims.jti) {
            return Err(AppError::Auth("Session has been revoked".to_string()));
        }

        let admin_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Auth("Invalid token subject".to_string()))?;

        Ok(AuthSession {
            admin_id,
            session_id: claims.jti,
            expires_at: claims.exp,
        })
    }

    fn revoke(&self, session: &AuthSession) {
        self.prune(Utc::now().timestamp());
        self.revoked
            .write()
            .insert(session.session_id.clone(), session.expires_at);
    }

    fn is_revoked(&self, session_id: &str) -> bool {
        self.revoked.read().contains_key(session_id)
    }
}

// ============================================================================
// Auth Service
// ============================================================================

pub struct AuthService {
    credentials: Arc<dyn CredentialVerifier>,
    tokens: Arc<dyn TokenIssuer>,
    admins: Arc<dyn AdminStore>,
    translator: Arc<Translator>,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialVerifier>,
        tokens: Arc<dyn TokenIssuer>,
        admins: Arc<dyn AdminStore>,
        translator: Arc<Translator>,
    ) -> Self {
        Self {
            credentials,
            tokens,
            admins,
            translator,
        }
    }

    /// Log an admin in.
    ///
    /// Correct credentials on an inactive account still fail: the session is
    /// issued, revoked straight away, and an auth error is returned.
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        remember: bool,
    ) -> AppResult<LoginResult> {
        let mut v = Validator::new();
        let email = v.required("email", email).map(str::trim);
        if let Some(email) = email {
            v.email("email", email);
        }
        let password = v.required("password", password);
        if let Some(password) = password {
            v.min_length("password", password, 6);
        }
        v.finish()?;

        let (Some(email), Some(password)) = (email, password) else {
            return Err(AppError::validation(
                self.translator.trans(Message::InvalidParameter),
            ));
        };

        let Some(admin) = self.credentials.attempt(email, password).await? else {
            info!(email = %email, "Admin login failed");
            return Err(AppError::Auth(self.translator.trans(Message::LoginError)));
        };

        let issued = self.tokens.issue(&admin, remember)?;

        if !admin.status {
            self.tokens.revoke(&issued.session);
            warn!(admin_id = admin.id, "Inactive admin attempted to log in");
            return Err(AppError::Auth(
                self.translator.trans(Message::ActivateWarning),
            ));
        }

        info!(admin_id = admin.id, remember, "Admin logged in");

        Ok(LoginResult {
            message: self.translator.trans(Message::LoginSuccess),
            access_token: format!("Bearer {}", issued.token),
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            user: admin,
            session: issued.session,
        })
    }

    /// Revoke the current session, if any. Always succeeds.
    pub fn logout(&self, session: Option<&AuthSession>) -> LogoutResult {
        if let Some(session) = session {
            self.tokens.revoke(session);
            info!(admin_id = session.admin_id, "Admin logged out");
        }

        LogoutResult {
            success: true,
            message: self.translator.trans(Message::LogoutSuccess),
        }
    }

    /// Resolve a bearer token (with or without the `Bearer ` prefix) into a
    /// session whose admin still exists and is active.
    pub async fn authenticate(&self, token: &str) -> AppResult<AuthSession> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        let session = self.tokens.verify(token)?;
        self.current_admin(&session).await?;
        Ok(session)
    }

    /// The admin behind a session; fails if it has been deleted or
    /// deactivated since the token was issued.
    pub async fn current_admin(&self, session: &AuthSession) -> AppResult<AdminRecord> {
        let unauthenticated = || AppError::Auth(self.translator.trans(Message::Unauthenticated));

        let Some(admin) = self.admins.find_admin(session.admin_id).await? else {
            debug!(admin_id = session.admin_id, "Session admin no longer exists");
            return Err(unauthenticated());
        };
        if !admin.status {
            debug!(admin_id = admin.id, "Session admin has been deactivated");
            return Err(unauthenticated());
        }

        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::new(TokenConfig {
            secret: "test-secret".to_string(),
            ttl_seconds: 3600,
            remember_ttl_seconds: 86_400,
        })
    }

    fn admin(id: i64) -> AdminRecord {
        AdminRecord {
            id,
            name: "Example".to_string(),
            email: "admin@example.com".to_string(),
            password: None,
            api_token: None,
            status: true,
            role_id: 1,
            image: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_issued_token_verifies() {
        let issuer = issuer();
        let issued = issuer.issue(&admin(4), false).unwrap();

        assert_eq!(issued.expires_in, 3600);
        let session = issuer.verify(&issued.token).unwrap();
        assert_eq!(session, issued.session);
        assert_eq!(session.admin_id, 4);
    }

    #[test]
    fn test_remember_uses_longer_ttl() {
        let issued = issuer().issue(&admin(1), true).unwrap();
        assert_eq!(issued.expires_in, 86_400);
    }

    #[test]
    fn test_revoked_session_is_rejected() {
        let issuer = issuer();
        let issued = issuer.issue(&admin(1), false).unwrap();

        issuer.revoke(&issued.session);

        assert!(issuer.is_revoked(&issued.session.session_id));
        assert_matches!(issuer.verify(&issued.token), Err(AppError::Auth(_)));
    }

    #[test]
    fn test_revocation_is_per_session() {
        let issuer = issuer();
        let first = issuer.issue(&admin(1), false).unwrap();
        let second = issuer.issue(&admin(1), false).unwrap();

        issuer.revoke(&first.session);

        assert!(issuer.verify(&second.token).is_ok());
    }

    #[test]
    fn test_non_positive_lifetime_is_an_error() {
        let issuer = JwtTokenIssuer::new(TokenConfig {
            secret: "test-secret".to_string(),
            ttl_seconds: 0,
            remember_ttl_seconds: 60,
        });

        assert_matches!(issuer.issue(&admin(1), false), Err(AppError::Internal(_)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = issuer().issue(&admin(1), false).unwrap();
        let other = JwtTokenIssuer::new(TokenConfig {
            secret: "another-secret".to_string(),
            ttl_seconds: 60,
            remember_ttl_seconds: 60,
        });

        assert_matches!(other.verify(&issued.token), Err(AppError::Auth(_)));
    }
}
