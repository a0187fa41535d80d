//! Admin account mutations

use super::prelude::*;

#[derive(Default)]
pub struct AdminMutations;

#[Object]
impl AdminMutations {
    /// Create an admin account
    #[graphql(guard = "AuthGuard")]
    async fn create_admin(
        &self,
        ctx: &Context<'_>,
        input: Option<AdminInputObject>,
    ) -> Result<AdminPayload> {
        let services = ctx.data_unchecked::<Services>();

        let result = services
            .admins
            .create(input.map(Into::into))
            .await
            .map_err(|e| app_error("createAdmin", e))?;

        Ok(AdminPayload {
            success: true,
            message: result.message,
            admin: result.admin.into(),
        })
    }

    /// Update an admin account. Omitting `status` deactivates the account.
    #[graphql(guard = "AuthGuard")]
    async fn update_admin(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        input: Option<AdminInputObject>,
    ) -> Result<AdminPayload> {
        let services = ctx.data_unchecked::<Services>();

        let result = services
            .admins
            .update(parse_id(id.as_ref()), input.map(Into::into))
            .await
            .map_err(|e| app_error("updateAdmin", e))?;

        Ok(AdminPayload {
            success: true,
            message: result.message,
            admin: result.admin.into(),
        })
    }

    /// Delete an admin account. The last admin cannot be deleted.
    #[graphql(guard = "AuthGuard")]
    async fn delete_admin(&self, ctx: &Context<'_>, id: Option<ID>) -> Result<DeletePayload> {
        let services = ctx.data_unchecked::<Services>();
        let session = ctx.auth_session()?;

        tracing::debug!(by_admin = session.admin_id, target = ?id, "Deleting admin");

        let message = services
            .admins
            .delete(parse_id(id.as_ref()))
            .await
            .map_err(|e| app_error("deleteAdmin", e))?;

        Ok(DeletePayload {
            success: true,
            message,
        })
    }
}
