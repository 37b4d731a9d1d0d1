use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "OTAKU_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/otaku.toml";
const ENV_PREFIX: &str = "OTAKU";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;

    load_secrets(&mut config);

    Ok(config)
}

/// Load secrets from environment variables into config
/// Secrets are never stored in TOML files, only in environment
fn load_secrets(config: &mut Config) {
    if let Ok(seed_key) = env::var("ADMIN_SEED_KEY") {
        config.admin.seed_key = seed_key;
    }

    // Connection strings may carry credentials
    if let Ok(url) = env::var("DATABASE_URL") {
        config.database.url = url;
    } else if let Ok(url) = env::var("DB_URL") {
        config.database.url = url;
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // OTAKU__SERVER__ENV -> server.env
    // OTAKU__CORS__ALLOWED_ORIGINS=a,b -> cors.allowed_origins
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .list_separator(",")
            .with_list_parse_key("cors.allowed_origins")
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::super::models::Environment as DeployEnv;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8000");
        assert!(config.database.seed_demo);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9000"
env = "prod"
max_body_bytes = 2048

[database]
url = "sqlite://tmp/test.db"
max_connections = 2
seed_demo = false

[cors]
allowed_origins = ["https://manga.example"]
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.server.env, DeployEnv::Prod);
        assert_eq!(config.server.max_body_bytes, 2048);
        assert_eq!(config.database.url, "sqlite://tmp/test.db");
        assert_eq!(config.database.max_connections, 2);
        assert!(!config.database.seed_demo);
        assert_eq!(config.cors.allowed_origins, vec!["https://manga.example"]);
    }

    #[test]
    fn test_seed_key_not_read_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[admin]
seed_key = "leaked-into-file"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.admin.seed_key, super::super::models::DEV_ADMIN_SEED_KEY);
    }

    // Environment overrides mutate process state and are not exercised here
}
