//! Command-line argument parsing

use crate::error::{PusherError, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "registry-auth-pusher")]
#[command(about = "Push a local image using the registry credential stored in the catalog")]
#[command(version)]
pub struct Args {
    /// Image reference to push
    #[arg(help = "Image reference, e.g. registry.example.com:5000/team/app:1.0")]
    pub image: String,

    /// Catalog API base URL
    #[arg(
        long = "catalog-url",
        env = "CATTLE_URL",
        help = "Base URL of the registry catalog API"
    )]
    pub catalog_url: String,

    #[arg(
        long = "access-key",
        env = "CATTLE_ACCESS_KEY",
        help = "Access key for the catalog API"
    )]
    pub access_key: Option<String>,

    #[arg(
        long = "secret-key",
        env = "CATTLE_SECRET_KEY",
        hide_env_values = true,
        help = "Secret key for the catalog API"
    )]
    pub secret_key: Option<String>,

    /// Engine address, overrides DOCKER_HOST
    #[arg(
        long = "docker-host",
        short = 'H',
        help = "Engine address (unix:///path, tcp://host:port, http(s)://host:port)"
    )]
    pub docker_host: Option<String>,

    /// Timeout in seconds for engine requests
    #[arg(
        long = "timeout",
        short = 't',
        help = "Timeout for engine requests in seconds (no timeout by default)"
    )]
    pub timeout: Option<u64>,

    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long = "quiet", short = 'q', help = "Only print warnings and errors")]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if self.image.trim().is_empty() {
            return Err(PusherError::Configuration("Image reference cannot be empty".to_string()));
        }
        if self.image.chars().any(char::is_whitespace) {
            return Err(PusherError::Configuration(format!(
                "Image reference '{}' contains whitespace",
                self.image
            )));
        }
        if self.verbose && self.quiet {
            return Err(PusherError::Configuration(
                "--verbose and --quiet cannot be used together".to_string(),
            ));
        }
        if self.access_key.is_some() != self.secret_key.is_some() {
            return Err(PusherError::Configuration(
                "--access-key and --secret-key must be given together".to_string(),
            ));
        }
        if self.timeout == Some(0) {
            return Err(PusherError::Configuration("Timeout must be greater than 0".to_string()));
        }
        Ok(())
    }
}
