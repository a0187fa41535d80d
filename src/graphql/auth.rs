//! GraphQL authentication
//!
//! The HTTP layer resolves the bearer token into an [`AuthSession`] and puts
//! it in the request data. Resolvers read it back through [`AuthExt`]; use
//! `#[graphql(guard = "AuthGuard")]` to require it. The guard also checks
//! that the session's admin still exists and is active.

use async_graphql::{Context, ErrorExtensions, Result};

use crate::error::AppError;
use crate::messages::{Message, Translator};
use crate::services::{AuthSession, Services};

/// Extension trait to get the authenticated session from GraphQL context
pub trait AuthExt {
    /// Get the session, or return an error if not authenticated
    fn auth_session(&self) -> Result<&AuthSession>;

    fn try_auth_session(&self) -> Option<&AuthSession>;
}

impl<'a> AuthExt for Context<'a> {
    fn auth_session(&self) -> Result<&AuthSession> {
        self.data_opt::<AuthSession>().ok_or_else(|| {
            let message = self
                .data_opt::<Services>()
                .map(|s| s.translator.trans(Message::Unauthenticated))
                .unwrap_or_else(|| Translator::new().trans(Message::Unauthenticated));
            AppError::Auth(message).extend()
        })
    }

    fn try_auth_session(&self) -> Option<&AuthSession> {
        self.data_opt::<AuthSession>()
    }
}

/// Guard that requires an authenticated admin session.
pub struct AuthGuard;

impl async_graphql::Guard for AuthGuard {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        let session = ctx.auth_session()?;
        ctx.data_unchecked::<Services>()
            .auth
            .current_admin(session)
            .await
            .map_err(|e| e.extend())?;
        Ok(())
    }
}
