//! GraphQL schema definition
//!
//! Query and mutation roots are merged from the per-domain resolvers in
//! `queries/` and `mutations/`. All operations except `login` and `logout`
//! require an authenticated admin.

use async_graphql::{MergedObject, Schema};

use crate::services::Services;

use super::mutations::{AdminMutations, AuthMutations};
use super::queries::{AdminQueries, CatalogRuleQueries, RoleQueries, TransactionQueries};
use super::subscriptions::SubscriptionRoot;

/// The GraphQL schema type
pub type AdminSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(AdminQueries, RoleQueries, CatalogRuleQueries, TransactionQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutations, AdminMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(services: Services) -> AdminSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), SubscriptionRoot)
        .data(services)
        .finish()
}
