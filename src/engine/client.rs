//! Engine API client
//!
//! [`RuntimeApi`] is the slice of the container engine the pusher needs: a
//! version ping and the push call. [`EngineClient`] implements it over HTTP,
//! either on a Unix socket or a TCP address.

use crate::config::{EngineConfig, EngineHost};
use crate::engine::stream::ByteStream;
use crate::engine::version::ApiVersion;
use crate::error::{PusherError, Result};
use crate::image::ImageReference;
use crate::output::OutputManager;
use crate::registry::AuthToken;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use url::Url;

pub const REGISTRY_AUTH_HEADER: &str = "X-Registry-Auth";
pub const API_VERSION_HEADER: &str = "API-Version";

/// What the engine reported on `/_ping`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PingInfo {
    pub api_version: Option<String>,
    pub os_type: Option<String>,
}

#[async_trait]
pub trait RuntimeApi: Send + Sync {
    /// Version the client speaks when the engine allows it
    fn client_version(&self) -> ApiVersion;

    async fn ping(&self) -> Result<PingInfo>;

    /// Start pushing `image`. The returned body carries the status records.
    async fn push(&self, version: ApiVersion, image: &ImageReference, token: &AuthToken) -> Result<ByteStream>;
}

/// Opens a fresh engine handle for every push.
pub trait RuntimeConnector: Send + Sync {
    type Api: RuntimeApi;

    fn connect(&self) -> Result<Self::Api>;
}

#[derive(Debug, Deserialize)]
struct EngineErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct EngineClient {
    client: Client,
    base_url: Url,
    version: ApiVersion,
    output: OutputManager,
}

impl EngineClient {
    pub fn connect(config: &EngineConfig, output: OutputManager) -> Result<Self> {
        let version: ApiVersion = config.api_version.parse().map_err(|_| {
            PusherError::Configuration(format!("Invalid engine API version '{}'", config.api_version))
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let base_url = match &config.host {
            EngineHost::Http(url) => url.clone(),
            EngineHost::Unix(path) => {
                if !path.exists() {
                    return Err(PusherError::Connection(format!(
                        "Engine socket {} does not exist",
                        path.display()
                    )));
                }
                builder = with_unix_socket(builder, path)?;
                Url::parse("http://localhost/")?
            }
        };

        let client = builder
            .build()
            .map_err(|e| PusherError::Connection(format!("Failed to create engine client: {}", e)))?;

        output.detail(&format!("Engine endpoint: {:?} (client API {})", config.host, version));

        Ok(Self {
            client,
            base_url,
            version,
            output,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

#[cfg(unix)]
fn with_unix_socket(builder: ClientBuilder, path: &std::path::Path) -> Result<ClientBuilder> {
    Ok(builder.unix_socket(path.to_path_buf()))
}

#[cfg(not(unix))]
fn with_unix_socket(_builder: ClientBuilder, path: &std::path::Path) -> Result<ClientBuilder> {
    Err(PusherError::Connection(format!(
        "Unix socket {} is not supported on this platform",
        path.display()
    )))
}

#[async_trait]
impl RuntimeApi for EngineClient {
    fn client_version(&self) -> ApiVersion {
        self.version
    }

    async fn ping(&self) -> Result<PingInfo> {
        let url = self.endpoint("_ping")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PusherError::VersionNegotiation(format!("Failed to ping engine: {}", e)))?;

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let info = PingInfo {
            api_version: header(API_VERSION_HEADER),
            os_type: header("OSType"),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(PusherError::VersionNegotiation(format!(
                "Engine ping failed with status {}",
                status
            )));
        }

        self.output.detail(&format!("Engine ping: {:?}", info));
        Ok(info)
    }

    async fn push(&self, version: ApiVersion, image: &ImageReference, token: &AuthToken) -> Result<ByteStream> {
        let (repository, tag) = image.push_target()?;
        let mut url = self.endpoint(&format!("v{}/images/{}/push", version, repository))?;
        url.query_pairs_mut().append_pair("tag", &tag);

        self.output.detail(&format!("POST {}", url));

        let response = self
            .client
            .post(url)
            .header(REGISTRY_AUTH_HEADER, token.as_str())
            .send()
            .await
            .map_err(|e| PusherError::PushInitiation(format!("Failed to start push of '{}': {}", image, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<EngineErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| body.trim().to_string());
            return Err(PusherError::PushInitiation(format!(
                "Engine rejected push of '{}' ({}): {}",
                image, status, message
            )));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()).map_err(PusherError::from))
            .boxed())
    }
}

/// Connects to the engine described by an [`EngineConfig`]
#[derive(Debug, Clone)]
pub struct EngineConnector {
    config: EngineConfig,
    output: OutputManager,
}

impl EngineConnector {
    pub fn new(config: EngineConfig, output: OutputManager) -> Self {
        Self { config, output }
    }
}

impl RuntimeConnector for EngineConnector {
    type Api = EngineClient;

    fn connect(&self) -> Result<EngineClient> {
        EngineClient::connect(&self.config, self.output.clone())
    }
}
