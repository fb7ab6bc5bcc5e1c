//! Server configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).
//! Invalid values stop the server before it binds.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::{AuthConfig, Environment, TokenSecret};
use platform::password::HashCost;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_FRONTEND_ORIGINS: &str =
    "http://localhost:5173,http://127.0.0.1:5173,http://localhost:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TOKEN_TTL_HOURS: u64 = 72;

#[derive(Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match var("APP_ENV") {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let token_secret = TokenSecret::resolve(var("JWT_SECRET").as_deref(), environment)?;

        let ttl_hours: u64 = parse_or(
            "TOKEN_TTL_HOURS",
            var("TOKEN_TTL_HOURS"),
            DEFAULT_TOKEN_TTL_HOURS,
        )?;
        if ttl_hours == 0 {
            bail!("TOKEN_TTL_HOURS must be positive");
        }

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_or(
                "PASSWORD_HASH_MEMORY_KIB",
                var("PASSWORD_HASH_MEMORY_KIB"),
                defaults.memory_kib,
            )?,
            iterations: parse_or(
                "PASSWORD_HASH_ITERATIONS",
                var("PASSWORD_HASH_ITERATIONS"),
                defaults.iterations,
            )?,
            parallelism: parse_or(
                "PASSWORD_HASH_PARALLELISM",
                var("PASSWORD_HASH_PARALLELISM"),
                defaults.parallelism,
            )?,
        };
        hash_cost
            .validate()
            .context("PASSWORD_HASH_* parameters are out of range")?;

        let ttl_secs = ttl_hours
            .checked_mul(3600)
            .context("TOKEN_TTL_HOURS is too large")?;

        let auth = AuthConfig {
            token_ttl: Duration::from_secs(ttl_secs),
            hash_cost,
            password_pepper: var("PASSWORD_PEPPER").map(String::into_bytes),
            ..AuthConfig::new(token_secret)
        };

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let database_max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            var("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?;

        Ok(Self {
            environment,
            database_url,
            database_max_connections,
            bind_addr,
            frontend_origins,
            auth,
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value `{raw}`")),
        None => Ok(default),
    }
}
