use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Admin key used when `ADMIN_SEED_KEY` is not set. Rejected in prod.
pub const DEV_ADMIN_SEED_KEY: &str = "dev-secret-key";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.server.env == Environment::Prod
    }
}

/// Deployment environment selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub env: Environment,
    /// Request body limit applied to every route
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            env: Environment::default(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1 MB
}

/// Relational store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Insert the demo manga when the catalog is empty at startup
    #[serde(default = "default_seed_demo")]
    pub seed_demo: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            seed_demo: default_seed_demo(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://data/otaku.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_seed_demo() -> bool {
    true
}

/// Admin surface configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    /// Shared secret for `POST /admin/seed` (loaded from environment, not from config file)
    #[serde(skip, default = "default_seed_key")]
    pub seed_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            seed_key: default_seed_key(),
        }
    }
}

fn default_seed_key() -> String {
    DEV_ADMIN_SEED_KEY.to_string()
}

/// Cross-origin request configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` allows any origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8000");
        assert_eq!(config.server.env, Environment::Dev);
        assert_eq!(config.server.max_body_bytes, 1024 * 1024);
        assert_eq!(config.database.url, "sqlite://data/otaku.db");
        assert_eq!(config.admin.seed_key, DEV_ADMIN_SEED_KEY);
        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert!(!config.is_production());
    }

    #[test]
    fn test_wildcard_origin() {
        let cors = CorsConfig {
            allowed_origins: vec!["*".to_string()],
        };
        assert!(cors.allows_any());
        assert!(!CorsConfig::default().allows_any());
    }
}
