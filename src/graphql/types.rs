//! GraphQL object types

use async_graphql::{ComplexObject, Context, ID, InputObject, Result, SimpleObject};

use crate::db::{AdminRecord, CatalogRuleRecord, RoleRecord, TransactionRecord};
use crate::services::{AdminEvent, AdminInput, Services};

use super::helpers::app_error;

// ============================================================================
// Admins & Roles
// ============================================================================

/// An admin account. Password and API token are never exposed.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Admin {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub status: bool,
    pub role_id: i64,
    /// Path of the stored image, relative to the image storage root
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[ComplexObject]
impl Admin {
    /// The role assigned to this admin
    async fn role(&self, ctx: &Context<'_>) -> Result<Option<Role>> {
        let services = ctx.data_unchecked::<Services>();
        let role = services
            .admins
            .find_role(self.role_id)
            .await
            .map_err(|e| app_error("admin.role", e))?;
        Ok(role.map(Role::from))
    }
}

impl From<AdminRecord> for Admin {
    fn from(r: AdminRecord) -> Self {
        Self {
            id: ID::from(r.id.to_string()),
            name: r.name,
            email: r.email,
            status: r.status,
            role_id: r.role_id,
            image: r.image,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Role {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    /// `all` or `custom`
    pub permission_type: String,
    pub permissions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RoleRecord> for Role {
    fn from(r: RoleRecord) -> Self {
        Self {
            id: ID::from(r.id.to_string()),
            name: r.name,
            description: r.description,
            permission_type: r.permission_type,
            permissions: r.permissions,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Input for creating or updating an admin
#[derive(Debug, Default, InputObject)]
#[graphql(name = "AdminInput")]
pub struct AdminInputObject {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub role_id: Option<i64>,
    pub status: Option<bool>,
    /// Remote `http(s)` URL or `data:` URI; empty leaves the image as is
    pub image: Option<String>,
}

impl From<AdminInputObject> for AdminInput {
    fn from(input: AdminInputObject) -> Self {
        Self {
            name: input.name,
            email: input.email,
            password: input.password,
            password_confirmation: input.password_confirmation,
            role_id: input.role_id,
            status: input.status,
            image: input.image,
        }
    }
}

// ============================================================================
// Mutation payloads
// ============================================================================

#[derive(Debug, InputObject)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Issue a long-lived token
    #[graphql(default)]
    pub remember: bool,
}

#[derive(Debug, SimpleObject)]
pub struct LoginPayload {
    pub success: bool,
    pub message: String,
    /// `Bearer <jwt>`
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: Admin,
}

#[derive(Debug, SimpleObject)]
pub struct LogoutPayload {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, SimpleObject)]
pub struct AdminPayload {
    pub success: bool,
    pub message: String,
    pub admin: Admin,
}

#[derive(Debug, SimpleObject)]
pub struct DeletePayload {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Promotions & Transactions
// ============================================================================

#[derive(Debug, Clone, SimpleObject)]
pub struct CatalogRule {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    /// Exposed as `start` in filters
    pub starts_from: Option<String>,
    /// Exposed as `end` in filters
    pub ends_till: Option<String>,
    pub status: bool,
    pub condition_type: i64,
    pub end_other_rules: bool,
    pub action_type: Option<String>,
    pub discount_amount: f64,
    /// Exposed as `priority` in filters
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CatalogRuleRecord> for CatalogRule {
    fn from(r: CatalogRuleRecord) -> Self {
        Self {
            id: ID::from(r.id.to_string()),
            name: r.name,
            description: r.description,
            starts_from: r.starts_from,
            ends_till: r.ends_till,
            status: r.status,
            condition_type: r.condition_type,
            end_other_rules: r.end_other_rules,
            action_type: r.action_type,
            discount_amount: r.discount_amount,
            sort_order: r.sort_order,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Transaction {
    pub id: ID,
    pub transaction_id: String,
    pub status: Option<String>,
    #[graphql(name = "type")]
    pub transaction_type: Option<String>,
    pub payment_method: Option<String>,
    pub amount: Option<f64>,
    pub invoice_id: Option<i64>,
    pub order_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TransactionRecord> for Transaction {
    fn from(r: TransactionRecord) -> Self {
        Self {
            id: ID::from(r.id.to_string()),
            transaction_id: r.transaction_id,
            status: r.status,
            transaction_type: r.transaction_type,
            payment_method: r.payment_method,
            amount: r.amount,
            invoice_id: r.invoice_id,
            order_id: r.order_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ============================================================================
// Subscription events
// ============================================================================

/// Admin lifecycle event pushed to subscribers
#[derive(Debug, Clone, SimpleObject)]
pub struct AdminLifecycleEvent {
    /// Dotted event name, e.g. `user.admin.create.after`
    pub name: String,
    pub admin_id: Option<ID>,
    /// Present on events that carry the full admin
    pub admin: Option<Admin>,
}

impl From<AdminEvent> for AdminLifecycleEvent {
    fn from(event: AdminEvent) -> Self {
        let name = event.name().to_string();
        let admin_id = event.admin_id().map(|id| ID::from(id.to_string()));
        let admin = match event {
            AdminEvent::CreateAfter(admin)
            | AdminEvent::UpdatePassword(admin)
            | AdminEvent::UpdateAfter(admin) => Some(Admin::from(admin)),
            _ => None,
        };
        Self {
            name,
            admin_id,
            admin,
        }
    }
}
