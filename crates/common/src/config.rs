//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Token and client settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Cross-origin settings.
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Bearer token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign tokens. Generated at load time when empty.
    #[serde(default)]
    pub jwt_secret: String,
    /// Signing algorithm name (`HS256`, `HS384` or `HS512`).
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,
    /// Lifetime of issued tokens in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins.
    #[serde(default = "default_origins")]
    pub origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_algorithm: default_jwt_algorithm(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_origins(),
        }
    }
}

impl AuthConfig {
    /// Fill in a random secret if none was configured.
    ///
    /// Returns `true` when a secret had to be generated.
    pub fn ensure_secret(&mut self) -> bool {
        if !self.jwt_secret.is_empty() {
            return false;
        }
        let bytes: [u8; 32] = rand::random();
        self.jwt_secret = hex::encode(bytes);
        true
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    1
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

const fn default_token_ttl_secs() -> i64 {
    7 * 24 * 60 * 60
}

fn default_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:8080".to_string(),
    ]
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, exported into the environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `REPOST_ENV`)
    /// 4. Environment variables with `REPOST_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("REPOST_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(environment())
            .build()?;

        config.try_deserialize::<Self>().map(Self::finish)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        config.try_deserialize::<Self>().map(Self::finish)
    }

    fn finish(mut self) -> Self {
        if self.auth.ensure_secret() {
            tracing::warn!("No jwt_secret configured, generated a random one; tokens will not survive a restart");
        }
        self
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("REPOST")
        .separator("__")
        .list_separator(";")
        .with_list_parse_key("cors.origins")
        .try_parsing(true)
}
