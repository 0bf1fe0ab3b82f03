//! Server Module
//!
//! Startup configuration and the shared application state.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - AuthConfig loading and database setup
//! └── state.rs        - AppState and FromRef implementations
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `AuthConfig::from_env` reads `.env` and the environment
//! 2. **Store Selection**: PostgreSQL when `DATABASE_URL` is set, in-memory otherwise
//! 3. **State Creation**: one `AuthSessionService` wrapped in `AppState`
//!
//! # Example
//!
//! ```rust,no_run
//! use chirpy_auth::backend::server::{AppState, AuthConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig::from_env()?;
//! let state = AppState::from_config(&config).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod state;

pub use config::{load_database, AuthConfig, AuthConfigBuilder, ConfigError};
pub use state::AppState;
