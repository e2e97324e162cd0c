//! Configuration management for the calculator site server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with KALK_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Built page bundle
    pub site: SiteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory holding the built page bundle
    pub static_dir: PathBuf,

    /// Entry page served for every calculator route
    pub index_file: String,
}

impl SiteConfig {
    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("KALK_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("site.static_dir", "dist")?
            .set_default("site.index_file", "index.html")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (KALK_ prefix)
            .add_source(
                Environment::with_prefix("KALK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration serving the bundle in `static_dir`, for tests and tools
    pub fn for_static_dir(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            site: SiteConfig {
                static_dir: static_dir.into(),
                index_file: "index.html".to_string(),
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("dist"),
            index_file: "index.html".to_string(),
        }
    }
}
