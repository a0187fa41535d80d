//! Application configuration management

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Upper bound for token lifetimes (ten years)
pub const MAX_TTL_MINUTES: i64 = 10 * 365 * 24 * 60;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// SQLite connection URL (e.g. `sqlite://data/storefront.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum pool size
    pub database_max_connections: u32,

    /// JWT signing secret
    pub jwt_secret: String,

    /// Lifetime of a normal login session in minutes
    pub jwt_ttl_minutes: i64,

    /// Lifetime of a "remember me" session in minutes
    pub jwt_remember_ttl_minutes: i64,

    /// Bcrypt cost factor
    pub bcrypt_cost: u32,

    /// Root directory for uploaded admin images
    pub image_storage_path: PathBuf,

    /// Optional JSON file overriding user-facing messages
    pub locale_file: Option<PathBuf>,

    /// Admin created on first start when the admins table is empty
    pub seed_admin: Option<SeedAdmin>,
}

#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            database_url: "sqlite://data/storefront.db?mode=rwc".to_string(),
            database_max_connections: 10,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_ttl_minutes: 60,
            jwt_remember_ttl_minutes: 60 * 24 * 30,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            image_storage_path: PathBuf::from("./data/storage"),
            locale_file: None,
            seed_admin: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using an insecure development secret");
            defaults.jwt_secret.clone()
        });

        let seed_admin = match (env::var("ADMIN_SEED_EMAIL"), env::var("ADMIN_SEED_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(SeedAdmin {
                name: env::var("ADMIN_SEED_NAME").unwrap_or_else(|_| "Example".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.database_max_connections),

            jwt_secret,

            jwt_ttl_minutes: validate_ttl(
                "JWT_TTL_MINUTES",
                parse_or("JWT_TTL_MINUTES", defaults.jwt_ttl_minutes)?,
            )?,

            jwt_remember_ttl_minutes: validate_ttl(
                "JWT_REMEMBER_TTL_MINUTES",
                parse_or("JWT_REMEMBER_TTL_MINUTES", defaults.jwt_remember_ttl_minutes)?,
            )?,

            bcrypt_cost: parse_or("BCRYPT_COST", defaults.bcrypt_cost)?,

            image_storage_path: env::var("IMAGE_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.image_storage_path),

            locale_file: env::var("LOCALE_FILE").ok().map(PathBuf::from),

            seed_admin,
        })
    }

    /// Normal session lifetime in seconds
    pub fn jwt_ttl_seconds(&self) -> Result<i64> {
        ttl_seconds("JWT_TTL_MINUTES", self.jwt_ttl_minutes)
    }

    /// "Remember me" session lifetime in seconds
    pub fn jwt_remember_ttl_seconds(&self) -> Result<i64> {
        ttl_seconds("JWT_REMEMBER_TTL_MINUTES", self.jwt_remember_ttl_minutes)
    }
}

fn validate_ttl(key: &str, minutes: i64) -> Result<i64> {
    if minutes <= 0 {
        bail!("{} must be positive, got {}", key, minutes);
    }
    if minutes > MAX_TTL_MINUTES {
        bail!("{} must be at most {}, got {}", key, MAX_TTL_MINUTES, minutes);
    }
    Ok(minutes)
}

fn ttl_seconds(key: &str, minutes: i64) -> Result<i64> {
    validate_ttl(key, minutes)?
        .checked_mul(60)
        .with_context(|| format!("{} is out of range", key))
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", key)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls_are_valid() {
        let config = Config::default();
        assert_eq!(config.jwt_ttl_seconds().unwrap(), 3600);
        assert_eq!(config.jwt_remember_ttl_seconds().unwrap(), 30 * 24 * 3600);
    }

    #[test]
    fn test_non_positive_ttl_is_rejected() {
        assert!(validate_ttl("JWT_TTL_MINUTES", 0).is_err());
        assert!(validate_ttl("JWT_TTL_MINUTES", -5).is_err());
        assert_eq!(validate_ttl("JWT_TTL_MINUTES", 1).unwrap(), 1);
    }

    #[test]
    fn test_huge_ttl_is_rejected_without_overflow() {
        let config = Config {
            jwt_ttl_minutes: i64::MAX,
            ..Config::default()
        };
        assert!(config.jwt_ttl_seconds().is_err());
        assert!(validate_ttl("JWT_TTL_MINUTES", MAX_TTL_MINUTES + 1).is_err());
    }
}
