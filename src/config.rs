/*
 * Responsibility
 * - Read environment variables / .env for the demo server (PORT, APP_ENV)
 * - Assemble the security headers configuration tree: optional JSON file,
 *   then `SecurityHeaders__*` environment overrides
 */
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

use security_headers::{ConfigError, ConfigTree, DEFAULT_SECTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub security_headers: ConfigTree,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::invalid("PORT", port.as_str()))?;

        let app_env = AppEnv::from_env();

        // SECURITY_HEADERS_FILE: JSON document holding a `SecurityHeaders` section.
        let file = std::env::var("SECURITY_HEADERS_FILE")
            .ok()
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty());
        let security_headers = ConfigTree::load(file.as_deref().map(Path::new), DEFAULT_SECTION)?;

        Ok(Self {
            addr,
            app_env,
            security_headers,
        })
    }
}
