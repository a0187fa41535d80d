use super::prelude::*;
use crate::error::AppError;
use crate::messages::Message;

#[derive(Default)]
pub struct AdminQueries;

#[Object]
impl AdminQueries {
    /// The admin behind the current session
    async fn me(&self, ctx: &Context<'_>) -> Result<Admin> {
        let session = ctx.auth_session()?;
        let services = ctx.data_unchecked::<Services>();

        let admin = services
            .auth
            .current_admin(session)
            .await
            .map_err(|e| app_error("me", e))?;
        Ok(admin.into())
    }

    /// Get an admin by ID
    #[graphql(guard = "AuthGuard")]
    async fn admin(&self, ctx: &Context<'_>, id: ID) -> Result<Admin> {
        let services = ctx.data_unchecked::<Services>();

        let Some(id) = parse_id(Some(&id)) else {
            let err = AppError::validation(services.translator.trans(Message::InvalidParameter));
            return Err(app_error("admin", err));
        };

        let admin = services
            .admins
            .find(id)
            .await
            .map_err(|e| app_error("admin", e))?;
        Ok(admin.into())
    }

    /// List all admins
    #[graphql(guard = "AuthGuard")]
    async fn admins(&self, ctx: &Context<'_>) -> Result<Vec<Admin>> {
        let services = ctx.data_unchecked::<Services>();

        let admins = services
            .admins
            .list()
            .await
            .map_err(|e| app_error("admins", e))?;
        Ok(admins.into_iter().map(Admin::from).collect())
    }
}
