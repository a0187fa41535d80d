//! HTTP route handlers
//!
//! The API is GraphQL at /graphql; health checks live next to it.

pub mod graphql;
pub mod health;
