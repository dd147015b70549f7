use std::{env, str::FromStr};

use fx_common::{parse_boolean_flag, Secret};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::errors::ServerError;

const DEFAULT_FX_HOST: &str = "127.0.0.1";
const DEFAULT_FX_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/fx_market.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_TOKEN_EXPIRY: u64 = 60 * 60 * 24;
const RANDOM_SECRET_LENGTH: usize = 48;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The maximum number of connections held in the SQLite pool.
    pub max_connections: u32,
    pub auth: AuthConfig,
    /// If true, pending schema migrations are applied before the server starts listening.
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FX_HOST.to_string(),
            port: DEFAULT_FX_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            auth: AuthConfig::default(),
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("FX_HOST").ok().unwrap_or_else(|| DEFAULT_FX_HOST.into());
        let port = parse_env_or("FX_PORT", DEFAULT_FX_PORT);
        let database_url = env::var("FX_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ FX_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let max_connections = parse_env_or("FX_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let run_migrations = parse_boolean_flag(env::var("FX_RUN_MIGRATIONS").ok(), true);
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!("🪛️ Could not load the authentication configuration from the environment. {e}");
            AuthConfig { token_expiry: parse_env_or("FX_TOKEN_EXPIRY", DEFAULT_TOKEN_EXPIRY), ..Default::default() }
        });
        Self { host, port, database_url, max_connections, auth, run_migrations }
    }
}

/// Reads and parses `name` from the environment. Missing values fall back to `default` quietly; values that do not
/// parse fall back to `default` with an error in the log.
fn parse_env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to sign and verify access tokens (HS256).
    pub jwt_secret: Secret<String>,
    /// How long, in seconds, an access token stays valid after it is issued.
    pub token_expiry: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. All tokens issued \
             by this instance become invalid when it restarts. Set FX_JWT_SECRET in production. 🚨️🚨️🚨️"
        );
        let secret: String =
            thread_rng().sample_iter(&Alphanumeric).take(RANDOM_SECRET_LENGTH).map(char::from).collect();
        Self { jwt_secret: Secret::new(secret), token_expiry: DEFAULT_TOKEN_EXPIRY }
    }
}

impl AuthConfig {
    pub fn new<S: Into<String>>(secret: S, token_expiry: u64) -> Self {
        Self { jwt_secret: Secret::new(secret.into()), token_expiry }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("FX_JWT_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [FX_JWT_SECRET]")))?;
        if secret.trim().is_empty() {
            return Err(ServerError::ConfigurationError("FX_JWT_SECRET is empty".to_string()));
        }
        let token_expiry = parse_env_or("FX_TOKEN_EXPIRY", DEFAULT_TOKEN_EXPIRY);
        Ok(Self::new(secret, token_expiry))
    }
}
