//! Application configuration

use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON catalog with the system default points, organization overrides
    /// and level thresholds. Built-in values are used when unset.
    pub points_config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| match p.parse() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        warn!("Ignoring invalid PORT value {:?}", p);
                        None
                    }
                })
                .unwrap_or(3000),
            points_config_path: env::var("POINTS_CONFIG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}
