//! Catalog (promotion) rule queries

use super::prelude::*;
use crate::services::CatalogRuleFilter;

#[derive(Default)]
pub struct CatalogRuleQueries;

#[Object]
impl CatalogRuleQueries {
    /// Catalog rules matching every given filter field
    #[graphql(guard = "AuthGuard")]
    async fn catalog_rules(
        &self,
        ctx: &Context<'_>,
        filter: Option<CatalogRuleFilterInput>,
        page: Option<PageInput>,
    ) -> Result<Vec<CatalogRule>> {
        let services = ctx.data_unchecked::<Services>();
        let args = filter.map(FilterArgs::from).unwrap_or_default();

        let query = CatalogRuleFilter
            .query(args)
            .map_err(|e| app_error("catalogRules", e))?;
        let rules = services
            .db
            .catalog_rules()
            .filter(&paginate(query, page))
            .await
            .map_err(|e| app_error("catalogRules", e))?;

        Ok(rules.into_iter().map(CatalogRule::from).collect())
    }
}
