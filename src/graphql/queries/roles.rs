use super::prelude::*;

#[derive(Default)]
pub struct RoleQueries;

#[Object]
impl RoleQueries {
    /// List all roles
    #[graphql(guard = "AuthGuard")]
    async fn roles(&self, ctx: &Context<'_>) -> Result<Vec<Role>> {
        let services = ctx.data_unchecked::<Services>();

        let roles = services
            .admins
            .roles()
            .await
            .map_err(|e| app_error("roles", e))?;
        Ok(roles.into_iter().map(Role::from).collect())
    }
}
