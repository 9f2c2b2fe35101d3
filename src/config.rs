//! Configuration module for the engine endpoint and the catalog service
//!
//! The engine config is read from the same `DOCKER_*` variables the docker CLI
//! uses. Command-line flags override both configs.

use crate::error::{PusherError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";
/// Engine API version the client speaks unless told otherwise
pub const DEFAULT_API_VERSION: &str = "1.41";

/// Where the engine API listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineHost {
    Unix(PathBuf),
    Http(Url),
}

impl EngineHost {
    /// Parse a `DOCKER_HOST` style address. `tcp://` maps to `http://`, or to
    /// `https://` when `tls` is set.
    pub fn parse(address: &str, tls: bool) -> Result<Self> {
        if let Some(path) = address.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(PusherError::Configuration(format!(
                    "Invalid engine host '{}': missing socket path",
                    address
                )));
            }
            return Ok(EngineHost::Unix(PathBuf::from(path)));
        }

        let normalized = if let Some(rest) = address.strip_prefix("tcp://") {
            let scheme = if tls { "https" } else { "http" };
            format!("{}://{}", scheme, rest)
        } else {
            address.to_string()
        };

        let url = Url::parse(&normalized)?;
        match url.scheme() {
            "http" | "https" => Ok(EngineHost::Http(url)),
            other => Err(PusherError::Configuration(format!(
                "Unsupported engine host scheme '{}' in '{}'",
                other, address
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub host: EngineHost,
    pub api_version: String,
    /// Request timeout, only set from the command line
    pub timeout: Option<Duration>,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tls = lookup("DOCKER_TLS_VERIFY").is_some_and(|v| !v.is_empty());
        let host = lookup("DOCKER_HOST")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DOCKER_HOST.to_string());
        let api_version = lookup("DOCKER_API_VERSION")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        Ok(EngineConfig {
            host: EngineHost::parse(&host, tls)?,
            api_version,
            timeout: None,
        })
    }
}

#[derive(Clone)]
pub struct CatalogConfig {
    pub url: Url,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

// Keys stay out of debug output.
impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("url", &self.url.as_str())
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl CatalogConfig {
    pub fn new(url: &str, access_key: Option<String>, secret_key: Option<String>) -> Result<Self> {
        // A trailing slash keeps Url::join from dropping the last path segment.
        let url = if url.ends_with('/') {
            Url::parse(url)?
        } else {
            Url::parse(&format!("{}/", url))?
        };

        Ok(CatalogConfig {
            url,
            access_key,
            secret_key,
        })
    }

    pub fn has_auth(&self) -> bool {
        self.access_key.is_some() && self.secret_key.is_some()
    }
}
