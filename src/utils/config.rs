use std::env;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub cors_origin: Option<String>,
    pub json_limit_bytes: usize,
    pub admin_credentials: Option<(String, String)>,
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Config, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: String::from("must not be empty"),
            });
        }

        let admin_credentials = match (optional("ADMIN_USERNAME"), optional("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some((username, password)),
            (None, None) => None,
            _ => {
                log::warn!("ADMIN_USERNAME and ADMIN_PASSWORD must be set together, skipping admin bootstrap");
                None
            }
        };

        Ok(Config {
            database_url: optional("DATABASE_URL")
                .unwrap_or_else(|| String::from("sqlite://db/fyp_portal.db")),
            bind_address: optional("BIND_ADDRESS").unwrap_or_else(|| String::from("127.0.0.1:8000")),
            jwt_secret,
            token_ttl_hours: check_token_ttl(parse_or("TOKEN_TTL_HOURS", 24)?)?,
            bcrypt_cost: check_bcrypt_cost(parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?)?,
            cors_origin: optional("CORS_ORIGIN"),
            json_limit_bytes: parse_or("JSON_LIMIT_BYTES", 10 * 1024 * 1024)?,
            admin_credentials,
        })
    }

    /// Filesystem path of a `sqlite://` url, if it points at a file.
    pub fn database_path(&self) -> Option<&str> {
        self.database_url
            .strip_prefix("sqlite://")
            .filter(|path| !path.is_empty() && !path.starts_with(':'))
    }
}

/// One hour up to one year.
const TOKEN_TTL_HOURS: std::ops::RangeInclusive<i64> = 1..=8760;
const BCRYPT_COST: std::ops::RangeInclusive<u32> = 4..=31;

fn check_token_ttl(hours: i64) -> Result<i64, ConfigError> {
    if TOKEN_TTL_HOURS.contains(&hours) {
        Ok(hours)
    } else {
        Err(ConfigError::Invalid {
            key: "TOKEN_TTL_HOURS",
            reason: format!("must be between 1 and 8760, got {}", hours),
        })
    }
}

fn check_bcrypt_cost(cost: u32) -> Result<u32, ConfigError> {
    if BCRYPT_COST.contains(&cost) {
        Ok(cost)
    } else {
        Err(ConfigError::Invalid {
            key: "BCRYPT_COST",
            reason: format!("must be between 4 and 31, got {}", cost),
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => {
            log::info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
