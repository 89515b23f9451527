//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::{anyhow, bail, Result};
use std::env;
use std::fmt;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_DB_HOST: &str = "localhost:5432";
const DEFAULT_DB_NAME: &str = "devConnectBdDB";

/// Log filter used when `RUST_LOG` is unset. The global `info` level covers
/// targets outside the workspace crates, including the `server` binary.
pub const DEFAULT_LOG_FILTER: &str = "info,devconnect=debug,tower_http=info";

/// Which document store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// How the one-application-per-applicant rule is enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplicationUniqueness {
    /// Look for an existing application, then insert. Two concurrent
    /// identical submissions can both pass the lookup.
    #[default]
    CheckThenInsert,
    /// Let the store reject the second insert atomically
    StoreEnforced,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone)]
pub struct Config {
    /// Postgres connection URL; only required for the Postgres store
    pub database_url: Option<String>,

    /// HS256 secret used to sign session tokens
    pub access_token_secret: String,

    /// Origin allowed to make credentialed cross-site requests
    pub cors_origin: String,

    pub store: StoreBackend,
    pub application_uniqueness: ApplicationUniqueness,

    /// Runtime configuration
    pub log_format: LogFormat,
    pub rust_log: String,
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("access_token_secret", &"[REDACTED]")
            .field("cors_origin", &self.cors_origin)
            .field("store", &self.store)
            .field("application_uniqueness", &self.application_uniqueness)
            .field("log_format", &self.log_format)
            .field("rust_log", &self.rust_log)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match var("JOB_STORE").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("JOB_STORE must be 'postgres' or 'memory', got '{other}'"),
        };

        let application_uniqueness = match var("APPLICATION_UNIQUENESS").as_deref() {
            None | Some("check-then-insert") => ApplicationUniqueness::CheckThenInsert,
            Some("store") => ApplicationUniqueness::StoreEnforced,
            Some(other) => bail!(
                "APPLICATION_UNIQUENESS must be 'check-then-insert' or 'store', got '{other}'"
            ),
        };

        let log_format = match var("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let database_url = var("DATABASE_URL").or_else(|| {
            let user = var("DB_USER")?;
            let pass = var("DB_PASS")?;
            let host = var("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string());
            let name = var("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
            Some(format!("postgres://{user}:{pass}@{host}/{name}"))
        });

        if store == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL (or DB_USER and DB_PASS) is required for the postgres store");
        }

        let config = Self {
            database_url,
            access_token_secret: var("ACCESS_TOKEN_SECRET")
                .filter(|s| !s.is_empty())
                .ok_or_else(|| anyhow!("ACCESS_TOKEN_SECRET is required"))?,
            cors_origin: var("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            store,
            application_uniqueness,
            log_format,
            rust_log: var("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        };

        Ok(config)
    }
}
