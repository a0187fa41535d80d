//! GraphQL filter inputs for list queries
//!
//! Every field is an equality match. A field set to `null` matches rows where
//! the column is NULL; an omitted field does not filter. Field names are the
//! client-facing ones; translation to column names happens in
//! [`crate::services::filters`].

use async_graphql::{InputObject, MaybeUndefined};
use serde_json::Value;

use crate::services::FilterArgs;

fn put<T: Into<Value>>(args: &mut FilterArgs, key: &str, value: MaybeUndefined<T>) {
    match value {
        MaybeUndefined::Undefined => {}
        MaybeUndefined::Null => {
            args.insert(key.to_string(), Value::Null);
        }
        MaybeUndefined::Value(v) => {
            args.insert(key.to_string(), v.into());
        }
    }
}

/// Filter for catalog (promotion) rules
#[derive(InputObject, Default, Debug)]
pub struct CatalogRuleFilterInput {
    pub id: MaybeUndefined<i64>,
    pub name: MaybeUndefined<String>,
    /// Start date of the rule
    pub start: MaybeUndefined<String>,
    /// End date of the rule
    pub end: MaybeUndefined<String>,
    pub priority: MaybeUndefined<i64>,
    pub status: MaybeUndefined<bool>,
    pub condition_type: MaybeUndefined<i64>,
    pub end_other_rules: MaybeUndefined<bool>,
    pub action_type: MaybeUndefined<String>,
    pub discount_amount: MaybeUndefined<f64>,
}

impl From<CatalogRuleFilterInput> for FilterArgs {
    fn from(f: CatalogRuleFilterInput) -> Self {
        let mut args = FilterArgs::new();
        put(&mut args, "id", f.id);
        put(&mut args, "name", f.name);
        put(&mut args, "start", f.start);
        put(&mut args, "end", f.end);
        put(&mut args, "priority", f.priority);
        put(&mut args, "status", f.status);
        put(&mut args, "condition_type", f.condition_type);
        put(&mut args, "end_other_rules", f.end_other_rules);
        put(&mut args, "action_type", f.action_type);
        put(&mut args, "discount_amount", f.discount_amount);
        args
    }
}

/// Filter for order transactions
#[derive(InputObject, Default, Debug)]
pub struct TransactionFilterInput {
    pub id: MaybeUndefined<i64>,
    pub transaction_id: MaybeUndefined<String>,
    pub status: MaybeUndefined<String>,
    #[graphql(name = "type")]
    pub transaction_type: MaybeUndefined<String>,
    pub payment_method: MaybeUndefined<String>,
    pub invoice_id: MaybeUndefined<i64>,
    pub order_id: MaybeUndefined<i64>,
}

impl From<TransactionFilterInput> for FilterArgs {
    fn from(f: TransactionFilterInput) -> Self {
        let mut args = FilterArgs::new();
        put(&mut args, "id", f.id);
        put(&mut args, "transaction_id", f.transaction_id);
        put(&mut args, "status", f.status);
        put(&mut args, "type", f.transaction_type);
        put(&mut args, "payment_method", f.payment_method);
        put(&mut args, "invoice_id", f.invoice_id);
        put(&mut args, "order_id", f.order_id);
        args
    }
}

/// Offset pagination
#[derive(InputObject, Default, Debug, Clone, Copy)]
pub struct PageInput {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_omitted_fields_do_not_filter() {
        let args = FilterArgs::from(CatalogRuleFilterInput {
            priority: MaybeUndefined::Value(5),
            ..Default::default()
        });
        assert_eq!(args.len(), 1);
        assert_eq!(args.get("priority"), Some(&json!(5)));
    }

    #[test]
    fn test_null_is_kept() {
        let args = FilterArgs::from(TransactionFilterInput {
            invoice_id: MaybeUndefined::Null,
            ..Default::default()
        });
        assert_eq!(args.get("invoice_id"), Some(&Value::Null));
    }

    #[test]
    fn test_type_field_uses_column_name() {
        let args = FilterArgs::from(TransactionFilterInput {
            transaction_type: MaybeUndefined::Value("capture".to_string()),
            ..Default::default()
        });
        assert_eq!(args.get("type"), Some(&json!("capture")));
    }
}
