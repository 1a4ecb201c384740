//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The file path
//! defaults to `config.yaml` and can be set with the `-f` flag or the `ANIMALPICS_CONFIG`
//! environment variable. A missing file is not an error: every field has a default.
//!
//! ## Loading Priority
//!
//! Later sources override earlier ones:
//!
//! 1. **YAML config file**
//! 2. **Environment variables** prefixed with `ANIMALPICS_`; nested keys use double underscores,
//!    e.g. `ANIMALPICS_SOURCES__DOG__FALLBACK_URL=https://example.com/dog.jpg`
//! 3. **DATABASE_URL**, which overrides `database.url`
//!
//! ## Example
//!
//! ```yaml
//! host: 127.0.0.1
//! port: 3000
//! request_timeout: 10s
//! database:
//!   url: sqlite://animal_pictures.db
//! batch:
//!   max_count: 10
//! sources:
//!   cat:
//!     primary_url: https://api.thecatapi.com/v1/images/search
//!     fallback_url: https://cataas.com/cat
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::Error;
use crate::types::AnimalType;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "ANIMALPICS_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Set from the `DATABASE_URL` environment variable; folded into `database.url` on load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    pub database: DatabaseConfig,
    /// Upstream image sources, one per animal type
    pub sources: SourcesConfig,
    /// Timeout applied to every upstream request (URL resolution and image download)
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub batch: BatchConfig,
    pub cors: CorsConfig,
    /// Enable Prometheus metrics endpoint at `/internal/metrics`
    pub enable_metrics: bool,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

/// SQLite database settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite connection string; the file is created if missing
    pub url: String,
    pub pool: PoolSettings,
}

/// Connection pool parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
    /// How long a writer waits on a locked database before failing (seconds)
    pub busy_timeout_secs: u64,
}

/// Primary endpoint and fallback image for one animal type
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSource {
    /// JSON API that returns a picture URL
    pub primary_url: Url,
    /// Direct image endpoint used whenever the primary cannot be resolved
    pub fallback_url: Url,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
    pub cat: UpstreamSource,
    pub dog: UpstreamSource,
    pub bear: UpstreamSource,
}

impl SourcesConfig {
    pub fn get(&self, animal_type: AnimalType) -> &UpstreamSource {
        match animal_type {
            AnimalType::Cat => &self.cat,
            AnimalType::Dog => &self.dog,
            AnimalType::Bear => &self.bear,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Upper bound on `count` accepted by the save endpoint
    pub max_count: u32,
}

/// CORS origin entry: either the wildcard `*` or a concrete URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub allowed_origins: Vec<CorsOrigin>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            database: DatabaseConfig::default(),
            sources: SourcesConfig::default(),
            request_timeout: Duration::from_secs(10),
            batch: BatchConfig::default(),
            cors: CorsConfig::default(),
            enable_metrics: true,
            enable_otel_export: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://animal_pictures.db".to_string(),
            pool: PoolSettings::default(),
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout_secs: 30,
            busy_timeout_secs: 5,
        }
    }
}

impl UpstreamSource {
    fn from_static(primary_url: &str, fallback_url: &str) -> Self {
        Self {
            primary_url: Url::parse(primary_url).expect("static primary url"),
            fallback_url: Url::parse(fallback_url).expect("static fallback url"),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            cat: UpstreamSource::from_static("https://api.thecatapi.com/v1/images/search", "https://cataas.com/cat"),
            dog: UpstreamSource::from_static("https://dog.ceo/api/breeds/image/random", "https://placedog.net/500"),
            bear: UpstreamSource::from_static(
                "https://api.unsplash.com/photos/random?query=bear&client_id=demo",
                "https://placebear.com/500/500",
            ),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_count: 10 }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        if let Some(url) = config.database_url.take() {
            config.database.url = url;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), Error> {
        if self.batch.max_count == 0 {
            return Err(Error::Internal {
                operation: "validate config: batch.max_count must be at least 1".to_string(),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Internal {
                operation: "validate config: request_timeout must be greater than zero".to_string(),
            });
        }

        if self.database.pool.max_connections == 0 {
            return Err(Error::Internal {
                operation: "validate config: database.pool.max_connections must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("ANIMALPICS_").ignore(&["CONFIG"]).split("__"))
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
