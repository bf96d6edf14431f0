//! Server Configuration
//!
//! `.env` is loaded by `main` before [`AppConfig::from_env`]; everything but
//! the database DSN and the token key has a default.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use auth::AuthConfig;
use blog::BlogConfig;
use thiserror::Error;

/// Token key length required by AES-256-GCM
pub const TOKEN_KEY_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Runtime configuration of the API binary
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub token_symmetric_key: Vec<u8>,
    pub access_token_duration: Duration,
    pub refresh_token_duration: Duration,
    pub http_addr: SocketAddr,
    pub grpc_addr: SocketAddr,
    /// Root directory of uploaded files
    pub public_path: PathBuf,
    /// Avatar directory under `public_path`, also the URL prefix
    pub avatar_path: String,
    /// Post image directory under `public_path`, also the URL prefix
    pub post_path: String,
    pub default_avatar: String,
    pub default_cover: String,
    pub frontend_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &'static str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let token_symmetric_key = get("TOKEN_SYMMETRIC_KEY")
            .ok_or(ConfigError::Missing("TOKEN_SYMMETRIC_KEY"))?
            .into_bytes();
        if token_symmetric_key.len() != TOKEN_KEY_LENGTH {
            return Err(ConfigError::Invalid {
                name: "TOKEN_SYMMETRIC_KEY",
                reason: format!("must be exactly {TOKEN_KEY_LENGTH} bytes"),
            });
        }

        let avatar_path = trim_slashes(&var("AVATAR_PATH", "avatar"));
        let post_path = trim_slashes(&var("POST_PATH", "post"));

        Ok(Self {
            database_url,
            db_max_connections: parse(&get, "DB_MAX_CONNECTIONS", 5)?,
            token_symmetric_key,
            access_token_duration: Duration::from_secs(parse(&get, "ACCESS_TOKEN_DURATION_SECS", 15 * 60)?),
            refresh_token_duration: Duration::from_secs(parse(
                &get,
                "REFRESH_TOKEN_DURATION_SECS",
                7 * 24 * 3600,
            )?),
            http_addr: parse(&get, "HTTP_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?,
            grpc_addr: parse(&get, "GRPC_ADDR", SocketAddr::from(([0, 0, 0, 0], 9090)))?,
            public_path: PathBuf::from(var("PUBLIC_PATH", "public")),
            default_avatar: var("DEFAULT_AVATAR", &format!("/{avatar_path}/default.png")),
            default_cover: var("DEFAULT_COVER", &format!("/{post_path}/default.png")),
            avatar_path,
            post_path,
            frontend_origins: var("FRONTEND_ORIGINS", "http://localhost:3000,http://127.0.0.1:3000")
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            request_timeout: Duration::from_secs(parse(&get, "REQUEST_TIMEOUT_SECS", 30)?),
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            access_token_duration: self.access_token_duration,
            refresh_token_duration: self.refresh_token_duration,
            default_avatar: self.default_avatar.clone(),
        }
    }

    pub fn blog_config(&self) -> BlogConfig {
        BlogConfig {
            default_cover: self.default_cover.clone(),
            ..BlogConfig::default()
        }
    }
}

fn parse<T>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

fn trim_slashes(path: &str) -> String {
    path.trim_matches('/').to_string()
}
