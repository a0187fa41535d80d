//! Filter translators for list queries
//!
//! API clients filter with their own field names; each translator renames the
//! ones that differ from the column names and turns the result into an
//! equality-conjunction query.

use serde_json::{Map, Value};

use crate::db::{CatalogRuleRecord, EqualityQuery, FromSqlRow, TransactionRecord};
use crate::error::AppResult;

/// Flat `field -> value` mapping as sent by the client
pub type FilterArgs = Map<String, Value>;

pub trait FilterTranslator {
    /// Table the translated filter applies to
    const TABLE: &'static str;

    /// `(external, internal)` field renames
    fn renames(&self) -> &'static [(&'static str, &'static str)];

    /// Apply the renames. Unknown keys pass through verbatim, and a renamed key
    /// is removed so the value never appears twice.
    fn translate(&self, mut args: FilterArgs) -> FilterArgs {
        for (from, to) in self.renames() {
            if let Some(value) = args.remove(*from) {
                args.insert((*to).to_string(), value);
            }
        }
        args
    }

    fn query(&self, args: FilterArgs) -> AppResult<EqualityQuery> {
        EqualityQuery::from_filter(Self::TABLE, &self.translate(args))
    }
}

/// Catalog (promotion) rules: `start`, `end` and `priority` have different
/// column names.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogRuleFilter;

impl FilterTranslator for CatalogRuleFilter {
    const TABLE: &'static str = CatalogRuleRecord::TABLE_NAME;

    fn renames(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("start", "starts_from"),
            ("end", "ends_till"),
            ("priority", "sort_order"),
        ]
    }
}

/// Order transactions use the column names as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter;

impl FilterTranslator for TransactionFilter {
    const TABLE: &'static str = TransactionRecord::TABLE_NAME;

    fn renames(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }
}
