/**
 * Server Configuration
 *
 * This module builds the process-wide auth configuration once at startup and
 * opens the optional PostgreSQL connection pool.
 *
 * # Configuration Sources
 *
 * `AuthConfig::from_env` reads (after loading `.env` if present):
 * - `JWT_SECRET` - required signing secret
 * - `POLKA_KEY` - optional webhook API key
 * - `BCRYPT_COST` - optional password hashing work factor
 * - `DATABASE_URL` - optional connection string
 *
 * Token lifetimes are policy constants, not environment settings.
 *
 * # Error Handling
 *
 * A missing signing secret is a `ConfigError`; callers treat it as fatal.
 */

use sqlx::PgPool;
use thiserror::Error;

use crate::backend::auth::password::{MAX_COST, MIN_COST};

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Auth configuration, fixed for the life of the process
#[derive(Clone)]
pub struct AuthConfig {
    /// Symmetric key for access token signatures
    pub jwt_secret: String,
    /// Webhook API key; API-key authorization fails when unset
    pub polka_key: Option<String>,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// PostgreSQL connection string
    pub database_url: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("polka_key", &self.polka_key.as_ref().map(|_| "<redacted>"))
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AuthConfig {
    /// Create a new AuthConfigBuilder
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Load configuration from the environment
    ///
    /// Loads `.env` first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut builder = Self::builder();
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            builder = builder.jwt_secret(secret);
        }
        if let Some(key) = non_empty_var("POLKA_KEY") {
            builder = builder.polka_key(key);
        }
        if let Some(cost) = non_empty_var("BCRYPT_COST") {
            let cost = cost.parse::<u32>().map_err(|e| ConfigError::InvalidValue {
                name: "BCRYPT_COST",
                reason: e.to_string(),
            })?;
            builder = builder.bcrypt_cost(cost);
        }
        if let Some(url) = non_empty_var("DATABASE_URL") {
            builder = builder.database_url(url);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if !(MIN_COST..=MAX_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: "BCRYPT_COST",
                reason: format!("must be within {}..={}", MIN_COST, MAX_COST),
            });
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Builder for AuthConfig
#[derive(Debug)]
pub struct AuthConfigBuilder {
    jwt_secret: Option<String>,
    polka_key: Option<String>,
    bcrypt_cost: u32,
    database_url: Option<String>,
}

impl Default for AuthConfigBuilder {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            polka_key: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            database_url: None,
        }
    }
}

impl AuthConfigBuilder {
    /// Set the signing secret
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    /// Set the webhook API key
    pub fn polka_key(mut self, key: impl Into<String>) -> Self {
        self.polka_key = Some(key.into());
        self
    }

    /// Set the bcrypt work factor
    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Set the database URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AuthConfig, ConfigError> {
        let config = AuthConfig {
            jwt_secret: self
                .jwt_secret
                .ok_or(ConfigError::MissingValue("JWT_SECRET"))?,
            polka_key: self.polka_key,
            bcrypt_cost: self.bcrypt_cost,
            database_url: self.database_url,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Open a connection pool and apply migrations
///
/// # Errors
///
/// Connection and migration failures are returned to the caller, which
/// decides whether they are fatal.
pub async fn load_database(database_url: &str) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url).await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}
