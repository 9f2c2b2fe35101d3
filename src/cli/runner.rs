//! Runner wiring the command line to the pusher

use crate::cli::args::Args;
use crate::config::{CatalogConfig, EngineConfig, EngineHost};
use crate::engine::{EngineConnector, PushReport};
use crate::error::Result;
use crate::output::OutputManager;
use crate::pusher::ImagePusher;
use crate::registry::RancherCatalog;
use std::env;
use std::time::{Duration, Instant};

pub struct Runner {
    args: Args,
    output: OutputManager,
}

impl Runner {
    pub fn new(args: Args) -> Result<Self> {
        args.validate()?;

        let output = if args.quiet {
            OutputManager::new_quiet()
        } else {
            OutputManager::new(args.verbose)
        };

        Ok(Self { args, output })
    }

    pub async fn run(&self) -> Result<PushReport> {
        let start_time = Instant::now();

        let catalog_config = CatalogConfig::new(
            &self.args.catalog_url,
            self.args.access_key.clone(),
            self.args.secret_key.clone(),
        )?;
        if !catalog_config.has_auth() {
            self.output
                .verbose("No catalog access key configured, listing anonymously");
        }
        let catalog = RancherCatalog::new(catalog_config, self.output.clone())?;

        let engine_config = self.engine_config()?;
        let connector = EngineConnector::new(engine_config, self.output.clone());

        let pusher = ImagePusher::new(catalog, connector, self.output.clone());
        let report = pusher.push(&self.args.image).await?;

        if let Some(digest) = &report.digest {
            self.output.verbose(&format!("Digest: {}", digest));
        }
        self.output.verbose(&format!(
            "Finished in {}",
            self.output.format_duration(start_time.elapsed())
        ));
        Ok(report)
    }

    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::from_env()?;
        if let Some(host) = &self.args.docker_host {
            let tls = env::var("DOCKER_TLS_VERIFY").is_ok_and(|v| !v.is_empty());
            config.host = EngineHost::parse(host, tls)?;
        }
        if let Some(secs) = self.args.timeout {
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn output(&self) -> &OutputManager {
        &self.output
    }
}
