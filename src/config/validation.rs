use super::models::{Config, DEV_ADMIN_SEED_KEY};
use axum::http::HeaderValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("database.url must not be empty")]
    MissingDatabaseUrl,

    #[error("database.max_connections must be at least 1")]
    InvalidMaxConnections,

    #[error("server.max_body_bytes must be at least 1")]
    InvalidBodyLimit,

    #[error("ADMIN_SEED_KEY must be set to a non-default value in prod")]
    InsecureAdminKey,

    #[error("Wildcard CORS origin is not allowed in prod")]
    WildcardOriginInProduction,

    #[error("Invalid CORS origin '{origin}'")]
    InvalidOrigin { origin: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_database(config)?;
    validate_server(config)?;
    validate_admin(config)?;
    validate_cors(config)?;
    Ok(())
}

fn validate_database(config: &Config) -> Result<(), ValidationError> {
    if config.database.url.trim().is_empty() {
        return Err(ValidationError::MissingDatabaseUrl);
    }

    if config.database.max_connections == 0 {
        return Err(ValidationError::InvalidMaxConnections);
    }

    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_body_bytes == 0 {
        return Err(ValidationError::InvalidBodyLimit);
    }

    Ok(())
}

/// The dev default key is public knowledge; prod must override it
fn validate_admin(config: &Config) -> Result<(), ValidationError> {
    if config.is_production() {
        let key = config.admin.seed_key.trim();
        if key.is_empty() || key == DEV_ADMIN_SEED_KEY {
            return Err(ValidationError::InsecureAdminKey);
        }
    }

    Ok(())
}

/// Origins end up in `Access-Control-Allow-Origin`, so they must be valid header values
fn validate_cors(config: &Config) -> Result<(), ValidationError> {
    if config.is_production() && config.cors.allows_any() {
        return Err(ValidationError::WildcardOriginInProduction);
    }

    for origin in &config.cors.allowed_origins {
        if origin == "*" {
            continue;
        }

        if origin.is_empty() || HeaderValue::from_str(origin).is_err() {
            return Err(ValidationError::InvalidOrigin {
                origin: origin.clone(),
            });
        }
    }

    Ok(())
}
