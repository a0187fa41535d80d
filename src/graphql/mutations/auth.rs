//! Admin login and logout
//!
//! Neither mutation requires an authenticated session. Logout revokes the
//! current session when there is one and succeeds either way.

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Log in with email and password.
    ///
    /// Fails for unknown credentials and for inactive accounts.
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<LoginPayload> {
        let services = ctx.data_unchecked::<Services>();

        let result = services
            .auth
            .login(
                input.email.as_deref(),
                input.password.as_deref(),
                input.remember,
            )
            .await
            .map_err(|e| app_error("login", e))?;

        Ok(LoginPayload {
            success: true,
            message: result.message,
            access_token: result.access_token,
            token_type: result.token_type,
            expires_in: result.expires_in,
            user: result.user.into(),
        })
    }

    /// End the current session.
    async fn logout(&self, ctx: &Context<'_>) -> Result<LogoutPayload> {
        let services = ctx.data_unchecked::<Services>();
        let result = services.auth.logout(ctx.try_auth_session());

        Ok(LogoutPayload {
            success: result.success,
            message: result.message,
        })
    }
}
