//! Shared helpers for resolvers

use async_graphql::{ErrorExtensions, ID};

use crate::error::AppError;

/// Parse a GraphQL `ID` into a row id. Anything that is not an integer is
/// treated like a missing id.
pub fn parse_id(id: Option<&ID>) -> Option<i64> {
    id.and_then(|id| id.parse::<i64>().ok())
}

/// Log a service failure and turn it into the client-facing error.
pub fn app_error(operation: &'static str, err: AppError) -> async_graphql::Error {
    match &err {
        AppError::Internal(_) => {
            tracing::error!(operation, kind = err.kind(), error = %err, "Operation failed")
        }
        _ => tracing::warn!(operation, kind = err.kind(), error = %err, "Operation rejected"),
    }
    err.extend()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Some(&ID::from("42"))), Some(42));
        assert_eq!(parse_id(Some(&ID::from("abc"))), None);
        assert_eq!(parse_id(Some(&ID::from(""))), None);
        assert_eq!(parse_id(None), None);
    }
}
