use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; `None` until DATABASE_URL or the DB_* parts are provided
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
    /// Upper bound for a single statement, expiry is reported as a server error
    pub query_timeout_ms: u64,
    pub enable_query_logging: bool,
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub token_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (process env in production, maps in tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database overrides
        self.database.url = lookup("DATABASE_URL").or_else(|| database_url_from_parts(lookup));
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs = v.parse().unwrap_or(self.database.connection_timeout_secs);
        }
        if let Some(v) = lookup("DATABASE_QUERY_TIMEOUT_MS") {
            self.database.query_timeout_ms = v.parse().unwrap_or(self.database.query_timeout_ms);
        }
        if let Some(v) = lookup("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }
        if let Some(v) = lookup("DATABASE_SLOW_QUERY_THRESHOLD_MS") {
            self.database.slow_query_threshold_ms = v.parse().unwrap_or(self.database.slow_query_threshold_ms);
        }

        // API overrides
        if let Some(v) = lookup("APP_PORT").or_else(|| lookup("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("SECURITY_TOKEN_EXPIRY_HOURS") {
            self.security.token_expiry_hours = v.parse().unwrap_or(self.security.token_expiry_hours);
        }
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    /// Settings that must be present before the server may accept requests
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        Ok(())
    }

    /// Connection URL for the relational store
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        let raw = self
            .database
            .url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        url::Url::parse(raw).map_err(|e| ConfigError::InvalidDatabaseUrl(e.to_string()))?;
        Ok(raw)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout_secs: 30,
                query_timeout_ms: 30_000,
                enable_query_logging: true,
                slow_query_threshold_ms: 100,
            },
            api: ApiConfig {
                port: 4000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_expiry_hours: 24 * 7, // 1 week
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout_secs: 10,
                query_timeout_ms: 10_000,
                enable_query_logging: true,
                slow_query_threshold_ms: 500,
            },
            api: ApiConfig {
                port: 4000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout_secs: 5,
                query_timeout_ms: 5_000,
                enable_query_logging: false,
                slow_query_threshold_ms: 1000,
            },
            api: ApiConfig {
                port: 4000,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_expiry_hours: 4,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

/// Assemble a postgres URL from the discrete DB_HOST / DB_PORT / DB_USER / DB_PASSWORD / DATABASE vars
fn database_url_from_parts<F>(lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("DB_HOST")?;
    let mut url = url::Url::parse(&format!("postgres://{}", host)).ok()?;

    if let Some(port) = lookup("DB_PORT").and_then(|p| p.parse::<u16>().ok()) {
        url.set_port(Some(port)).ok()?;
    }
    if let Some(user) = lookup("DB_USER") {
        url.set_username(&user).ok()?;
    }
    if let Some(password) = lookup("DB_PASSWORD") {
        url.set_password(Some(&password)).ok()?;
    }
    if let Some(database) = lookup("DATABASE") {
        url.set_path(&format!("/{}", database));
    }

    Some(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.api.port, 4000);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::from_lookup(lookup_from(&[("APP_ENV", "prod")]));
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.database.enable_query_logging);
        assert_eq!(config.database.query_timeout_ms, 5_000);
    }

    #[test]
    fn env_overrides_apply_on_top_of_preset() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("APP_PORT", "8081"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_QUERY_TIMEOUT_MS", "250"),
            ("SECURITY_CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]));
        assert_eq!(config.api.port, 8081);
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.database.query_timeout_ms, 250);
        assert_eq!(config.security.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn unparseable_override_keeps_preset_value() {
        let config = AppConfig::from_lookup(lookup_from(&[("APP_PORT", "not-a-port")]));
        assert_eq!(config.api.port, 4000);
    }

    #[test]
    fn database_url_is_assembled_from_parts() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "5433"),
            ("DB_USER", "reader"),
            ("DB_PASSWORD", "pw"),
            ("DATABASE", "markets"),
        ]));
        assert_eq!(
            config.database_url().unwrap(),
            "postgres://reader:pw@db.internal:5433/markets"
        );
    }

    #[test]
    fn explicit_database_url_wins_over_parts() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://u@localhost/main"),
            ("DB_HOST", "ignored"),
        ]));
        assert_eq!(config.database_url().unwrap(), "postgres://u@localhost/main");
    }

    #[test]
    fn validate_requires_jwt_secret() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(config.validate(), Err(ConfigError::Missing("JWT_SECRET"))));

        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x")]));
        assert!(config.validate().is_ok());
    }
}
