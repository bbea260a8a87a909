//! Runtime server configuration
//!
//! Config is the single source of truth for what the running process uses.
//! It is read from the environment once at startup and never mutated.
//!
//! # Environment Variables
//!
//! - `EVENTLY_DB_PATH` (required): database file location; absence is fatal
//! - `EVENTLY_PORT`: listen port (default 3001)
//! - `EVENTLY_MEDIA_UPLOAD_URL`: media host upload endpoint (optional; when
//!   unset, posted binary images are rejected as an infrastructure failure)
//! - `EVENTLY_MEDIA_API_KEY`: bearer token for the media host (optional)

use std::env;
use std::path::PathBuf;

/// Media host settings for image uploads
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub upload_url: String,
    pub api_key: Option<String>,
}

/// Runtime server configuration - immutable for the process lifetime
#[derive(Debug, Clone)]
pub struct Config {
    /// Database endpoint; the connection itself is established lazily
    pub db_path: PathBuf,

    /// HTTP listen port
    pub port: u16,

    /// Optional media host for hosted image uploads
    pub media: Option<MediaConfig>,
}

impl Config {
    /// Build runtime config from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when `EVENTLY_DB_PATH` is not set - a fatal startup
    /// condition.
    pub fn from_env() -> anyhow::Result<Self> {
        let db_path = env::var("EVENTLY_DB_PATH")
            .map(PathBuf::from)
            .map_err(|_| {
                anyhow::anyhow!("Please define the EVENTLY_DB_PATH environment variable")
            })?;

        let port = env::var("EVENTLY_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3001);

        let media = env::var("EVENTLY_MEDIA_UPLOAD_URL")
            .ok()
            .map(|upload_url| MediaConfig {
                upload_url,
                api_key: env::var("EVENTLY_MEDIA_API_KEY").ok(),
            });

        Ok(Config {
            db_path,
            port,
            media,
        })
    }
}
