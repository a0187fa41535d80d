//! Pre-seed data for initial database setup.
//!
//! Inserts the `Administrator` role and, when the admins table is empty, the
//! seed admin from configuration. Re-runs are idempotent: existing rows are
//! preserved.

use anyhow::Result;
use tracing::{debug, info};

use super::{CreateAdmin, CreateRole, Database, RoleRecord};
use crate::config::SeedAdmin;

pub const ADMINISTRATOR_ROLE: &str = "Administrator";

/// Result of running seed operations.
#[derive(Debug, Default)]
pub struct SeedResult {
    pub role_created: bool,
    pub admin_created: bool,
}

async fn seed_administrator_role(db: &Database) -> Result<(RoleRecord, bool)> {
    let roles = db.roles();
    if let Some(role) = roles.get_by_name(ADMINISTRATOR_ROLE).await? {
        debug!(role_id = role.id, "Administrator role already present");
        return Ok((role, false));
    }

    let role = roles
        .create(CreateRole {
            name: ADMINISTRATOR_ROLE.to_string(),
            description: Some("This role users will have all the access".to_string()),
            permission_type: "all".to_string(),
            permissions: Vec::new(),
        })
        .await?;
    info!(role_id = role.id, "Seeded Administrator role");
    Ok((role, true))
}

/// Run all seeds.
pub async fn run_seeds(
    db: &Database,
    seed_admin: Option<&SeedAdmin>,
    bcrypt_cost: u32,
) -> Result<SeedResult> {
    let mut result = SeedResult::default();

    let (role, role_created) = seed_administrator_role(db).await?;
    result.role_created = role_created;

    let admins = db.admins();
    if admins.count().await? > 0 {
        return Ok(result);
    }

    let Some(seed) = seed_admin else {
        tracing::warn!("No admins exist and ADMIN_SEED_EMAIL/ADMIN_SEED_PASSWORD are not set");
        return Ok(result);
    };

    let password = bcrypt::hash(&seed.password, bcrypt_cost)?;
    let admin = admins
        .create(CreateAdmin {
            name: seed.name.clone(),
            email: seed.email.clone(),
            password: Some(password),
            api_token: None,
            status: true,
            role_id: role.id,
        })
        .await?;
    info!(admin_id = admin.id, email = %admin.email, "Seeded initial admin");
    result.admin_created = true;

    Ok(result)
}
