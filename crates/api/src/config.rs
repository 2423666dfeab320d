use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;

use crate::auth::jwt::{JwtConfig, DEFAULT_EXPIRY_HOURS, MAX_EXPIRY_HOURS};
use crate::auth::password::{PasswordConfig, MIN_ITERATIONS, MIN_MEMORY_KIB};

/// Password given to the `admin` account when bootstrap creates it.
pub const DEFAULT_ADMIN_BOOTSTRAP_PASSWORD: &str = "ch4ngeme333!!!";

/// Largest accepted template upload (10 MiB) unless overridden.
pub const DEFAULT_TEMPLATE_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Error raised while loading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid ('{value}'): {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except `JWT_SECRET` has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub environment: Environment,
    /// Token signing secret and lifetime.
    pub jwt: JwtConfig,
    /// Argon2id cost parameters for new password hashes.
    pub password: PasswordConfig,
    /// Directory holding the proposal document templates.
    pub template_dir: PathBuf,
    pub template_max_upload_bytes: usize,
    /// Password for the `admin` account if bootstrap has to create it.
    pub admin_bootstrap_password: String,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                     | Default                   |
    /// |-----------------------------|---------------------------|
    /// | `HOST`                      | `0.0.0.0`                 |
    /// | `PORT`                      | `3000`                    |
    /// | `CORS_ORIGINS`              | `http://localhost:8080`   |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                      |
    /// | `APP_ENV`                   | `development`             |
    /// | `JWT_SECRET`                | required                  |
    /// | `JWT_EXPIRY_HOURS`          | `24`                      |
    /// | `ARGON2_MEMORY_KIB`         | `19456` (also the floor)  |
    /// | `ARGON2_ITERATIONS`         | `2` (also the floor)      |
    /// | `TEMPLATE_DIR`              | `templates`               |
    /// | `TEMPLATE_MAX_UPLOAD_BYTES` | `10485760`                |
    /// | `ADMIN_BOOTSTRAP_PASSWORD`  | `ch4ngeme333!!!`          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:8080".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                name: "CORS_ORIGINS",
                value: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;
        let environment = parse_or(&lookup, "APP_ENV", Environment::Development)?;

        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let expiry_hours: i64 = parse_or(&lookup, "JWT_EXPIRY_HOURS", DEFAULT_EXPIRY_HOURS)?;
        if !(1..=MAX_EXPIRY_HOURS).contains(&expiry_hours) {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRY_HOURS",
                value: expiry_hours.to_string(),
                reason: format!("must be between 1 and {MAX_EXPIRY_HOURS}"),
            });
        }

        let memory_kib: u32 = parse_or(&lookup, "ARGON2_MEMORY_KIB", MIN_MEMORY_KIB)?;
        if memory_kib < MIN_MEMORY_KIB {
            return Err(ConfigError::Invalid {
                name: "ARGON2_MEMORY_KIB",
                value: memory_kib.to_string(),
                reason: format!("must be at least {MIN_MEMORY_KIB}"),
            });
        }
        let iterations: u32 = parse_or(&lookup, "ARGON2_ITERATIONS", MIN_ITERATIONS)?;
        if iterations < MIN_ITERATIONS {
            return Err(ConfigError::Invalid {
                name: "ARGON2_ITERATIONS",
                value: iterations.to_string(),
                reason: format!("must be at least {MIN_ITERATIONS}"),
            });
        }

        let template_dir = lookup("TEMPLATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("templates"));
        let template_max_upload_bytes = parse_or(
            &lookup,
            "TEMPLATE_MAX_UPLOAD_BYTES",
            DEFAULT_TEMPLATE_MAX_UPLOAD_BYTES,
        )?;

        let admin_bootstrap_password = lookup("ADMIN_BOOTSTRAP_PASSWORD")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_BOOTSTRAP_PASSWORD.into());

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            environment,
            jwt: JwtConfig {
                secret,
                expiry_hours,
            },
            password: PasswordConfig {
                memory_kib,
                iterations,
            },
            template_dir,
            template_max_upload_bytes,
            admin_bootstrap_password,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:8080"]);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.jwt.expiry_hours, 24);
        assert_eq!(config.password, PasswordConfig::default());
        assert_eq!(config.template_dir, PathBuf::from("templates"));
        assert_eq!(config.template_max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.admin_bootstrap_password, "ch4ngeme333!!!");
    }

    #[test]
    fn missing_secret_is_fatal() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("JWT_SECRET")));
        assert_matches!(
            load(&[("JWT_SECRET", "")]),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "8081"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("APP_ENV", "production"),
            ("JWT_EXPIRY_HOURS", "2"),
            ("ARGON2_MEMORY_KIB", "65536"),
            ("ARGON2_ITERATIONS", "3"),
        ])
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.environment.is_production());
        assert_eq!(config.jwt.expiry_secs(), 7200);
        assert_eq!(config.password.memory_kib, 65536);
        assert_eq!(config.password.iterations, 3);
    }

    #[test]
    fn argon2_costs_below_floor_rejected() {
        assert_matches!(
            load(&[("JWT_SECRET", "s"), ("ARGON2_MEMORY_KIB", "1024")]),
            Err(ConfigError::Invalid { name: "ARGON2_MEMORY_KIB", .. })
        );
        assert_matches!(
            load(&[("JWT_SECRET", "s"), ("ARGON2_ITERATIONS", "1")]),
            Err(ConfigError::Invalid { name: "ARGON2_ITERATIONS", .. })
        );
    }

    #[test]
    fn malformed_values_rejected() {
        assert_matches!(
            load(&[("JWT_SECRET", "s"), ("PORT", "eighty")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        );
        assert_matches!(
            load(&[("JWT_SECRET", "s"), ("APP_ENV", "staging")]),
            Err(ConfigError::Invalid { name: "APP_ENV", .. })
        );
        assert_matches!(
            load(&[("JWT_SECRET", "s"), ("JWT_EXPIRY_HOURS", "0")]),
            Err(ConfigError::Invalid { name: "JWT_EXPIRY_HOURS", .. })
        );
        assert_matches!(
            load(&[("JWT_SECRET", "s"), ("JWT_EXPIRY_HOURS", "8761")]),
            Err(ConfigError::Invalid { name: "JWT_EXPIRY_HOURS", .. })
        );
        assert_matches!(
            load(&[("JWT_SECRET", "s"), ("JWT_EXPIRY_HOURS", "9223372036854775807")]),
            Err(ConfigError::Invalid { name: "JWT_EXPIRY_HOURS", .. })
        );
        let longest = load(&[("JWT_SECRET", "s"), ("JWT_EXPIRY_HOURS", "8760")]).unwrap();
        assert_eq!(longest.jwt.expiry_secs(), 8760 * 3600);
    }
}
