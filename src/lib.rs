//! Storefront admin backend
//!
//! Admin authentication, admin account management and filtered catalog-rule
//! and transaction listings, served over GraphQL.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod messages;
pub mod services;

pub use app::{AppState, build_app};
pub use error::{AppError, AppResult};
