pub mod admins;
pub mod catalog_rules;
pub mod roles;
pub mod transactions;

pub use admins::AdminQueries;
pub use catalog_rules::CatalogRuleQueries;
pub use roles::RoleQueries;
pub use transactions::TransactionQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ID, Object, Result};

    pub(crate) use crate::db::EqualityQuery;
    pub(crate) use crate::graphql::auth::{AuthExt, AuthGuard};
    pub(crate) use crate::graphql::filters::*;
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::{FilterArgs, FilterTranslator, Services};

    /// Apply optional offset pagination to a filter query.
    pub(crate) fn paginate(query: EqualityQuery, page: Option<PageInput>) -> EqualityQuery {
        let page = page.unwrap_or_default();
        let query = match page.limit {
            Some(limit) => query.limit(limit.max(0)),
            None => query,
        };
        match page.offset {
            Some(offset) => query.offset(offset.max(0)),
            None => query,
        }
    }
}
