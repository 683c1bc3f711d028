use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Environment prefix for the Weibo application settings.
pub const WEIBO_PREFIX: &str = "LINKS_WEIBO_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} must be a valid number, got {value:?}")]
    Invalid { key: String, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub server_host: String,
    pub server_port: u16,
    pub rust_log: String,
    pub app_env: String,
    pub jwt_secret: String,
    pub weibo: ProviderConfig,
}

/// Client registration for one OAuth2 provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    pub client_id: String,
    pub response_type: String,
    pub redirect_uri: String,
    pub scope: String,
    pub client_secret: String,
    pub grant_type: String,
    /// Overrides the provider's API host, e.g. for a staging or test server.
    pub api_base: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            response_type: "code".to_string(),
            redirect_uri: String::new(),
            scope: String::new(),
            client_secret: String::new(),
            grant_type: "authorization_code".to_string(),
            api_base: None,
        }
    }
}

impl ProviderConfig {
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str, default: String| {
            lookup(&format!("{prefix}{name}")).unwrap_or(default)
        };

        Self {
            client_id: get("CLIENT_ID", defaults.client_id),
            response_type: get("RESPONSE_TYPE", defaults.response_type),
            redirect_uri: get("REDIRECT_URI", defaults.redirect_uri),
            scope: get("SCOPE", defaults.scope),
            client_secret: get("CLIENT_SECRET", defaults.client_secret),
            grant_type: get("GRANT_TYPE", defaults.grant_type),
            api_base: lookup(&format!("{prefix}API_BASE")).filter(|v| !v.is_empty()),
        }
    }
}

impl Config {
    pub fn init() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| "dev".to_string());
        let is_dev = app_env == "dev";

        // The in-memory store is used in dev, so no database is required there
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None if is_dev => String::new(),
            None => return Err(ConfigError::Missing("DATABASE_URL")),
        };
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if is_dev => "dev_secret_change_me".to_string(),
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 100)?,
            database_min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 5)?,
            database_connect_timeout: parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT", 8)?,
            database_idle_timeout: parse_or(&lookup, "DATABASE_IDLE_TIMEOUT", 8)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 3000)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            app_env,
            jwt_secret,
            weibo: ProviderConfig::from_lookup(WEIBO_PREFIX, &lookup),
        })
    }

    pub fn is_dev(&self) -> bool {
        self.app_env == "dev"
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.parse::<T>().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
