//! GraphQL API for storefront administration
//!
//! Queries, mutations and subscriptions are served by async-graphql. Each
//! domain lives in its own file under `queries/` or `mutations/` with a
//! `#[derive(Default)]` struct and an `#[Object]` impl, merged into the roots
//! in `schema.rs`.

pub mod auth;
pub mod filters;
pub mod helpers;
pub mod mutations;
pub mod queries;
mod schema;
mod subscriptions;
pub mod types;

pub use auth::{AuthExt, AuthGuard};
pub use schema::{AdminSchema, MutationRoot, QueryRoot, build_schema};
pub use subscriptions::SubscriptionRoot;
