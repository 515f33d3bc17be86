use crate::app_config::{AppConfig, Backend, Environment};
use crate::search::DEFAULT_SEARCH_RADIUS_METERS;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from the variables already in the process,
/// without reading `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty values count as unset.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("STOREFINDER_ENV", "development"))?;
    let backend = parse_backend(&or_default("STOREFINDER_BACKEND", "memory"))?;

    let database_url = optional("DATABASE_URL");
    if backend == Backend::Postgres && database_url.is_none() {
        return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    let bind_addr = parse_addr("STOREFINDER_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("STOREFINDER_LOG_LEVEL", "info");
    let seed_path = optional("STOREFINDER_SEED_PATH").map(PathBuf::from);

    let radius_var = "STOREFINDER_DEFAULT_RADIUS_METERS";
    let default_radius_meters = match optional(radius_var) {
        None => DEFAULT_SEARCH_RADIUS_METERS,
        Some(raw) => {
            let meters = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| invalid(radius_var, e.to_string()))?;
            if !meters.is_finite() || meters <= 0.0 {
                return Err(invalid(
                    radius_var,
                    format!("must be a positive number of meters, got {raw}"),
                ));
            }
            meters
        }
    };

    let db_max_connections = parse_u32("STOREFINDER_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("STOREFINDER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("STOREFINDER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(invalid(
            "STOREFINDER_DB_MIN_CONNECTIONS",
            format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        ));
    }

    Ok(AppConfig {
        env,
        backend,
        database_url,
        bind_addr,
        log_level,
        seed_path,
        default_radius_meters,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_ENV".to_string(),
            reason: format!("expected development, test or production, got {other:?}"),
        }),
    }
}

fn parse_backend(s: &str) -> Result<Backend, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "memory" => Ok(Backend::Memory),
        "postgres" => Ok(Backend::Postgres),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_BACKEND".to_string(),
            reason: format!("expected memory or postgres, got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
