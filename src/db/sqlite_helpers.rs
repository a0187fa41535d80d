//! SQLite helper utilities for type conversion
//!
//! SQLite has no native boolean, array or timestamp types. Booleans are stored
//! as INTEGER 0/1, arrays as JSON strings, timestamps as RFC 3339 TEXT.

use serde::{Serialize, de::DeserializeOwned};

// ============================================================================
// Array/Vec Helpers (stored as JSON strings in SQLite)
// ============================================================================

/// Serialize a Vec to a JSON string for SQLite storage
#[inline]
pub fn vec_to_json<T: Serialize>(v: &[T]) -> String {
    serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string())
}

/// Deserialize a JSON string from SQLite to a Vec
#[inline]
pub fn json_to_vec<T: DeserializeOwned>(s: &str) -> Vec<T> {
    serde_json::from_str(s).unwrap_or_default()
}

// ============================================================================
// Timestamp Helpers (stored as ISO8601 TEXT in SQLite)
// ============================================================================

use chrono::Utc;

/// Get current UTC timestamp as ISO8601 string for SQLite
#[inline]
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

// ============================================================================
// Boolean Helpers
// ============================================================================

#[inline]
pub fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

#[inline]
pub fn int_to_bool(value: i64) -> bool {
    value != 0
}

/// True when the error is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_vec_roundtrip_tolerates_garbage() {
        let stored = vec_to_json(&["catalog.rules", "sales.transactions"]);
        assert_eq!(
            json_to_vec::<String>(&stored),
            vec!["catalog.rules".to_string(), "sales.transactions".to_string()]
        );
        assert!(json_to_vec::<String>("not json").is_empty());
    }

    #[test]
    fn test_bool_conversion() {
        assert_eq!(bool_to_int(true), 1);
        assert!(!int_to_bool(0));
        assert!(int_to_bool(2));
    }
}
