//! Push initiation against the engine

use crate::engine::client::{RuntimeApi, RuntimeConnector};
use crate::engine::stream::StatusStream;
use crate::engine::version::ApiVersion;
use crate::error::Result;
use crate::image::ImageReference;
use crate::output::OutputManager;
use crate::registry::AuthToken;

/// Ping the engine and settle on the API version to use for the push.
pub async fn negotiate_version<A>(api: &A, output: &OutputManager) -> Result<ApiVersion>
where
    A: RuntimeApi + ?Sized,
{
    let ping = api.ping().await?;
    let client = api.client_version();
    let version = ApiVersion::negotiate(ping.api_version.as_deref(), client)?;

    if version < client {
        output.verbose(&format!(
            "Engine API version {} is older than client version {}, downgrading",
            version, client
        ));
    }
    Ok(version)
}

pub struct PushDriver<'a, R: ?Sized> {
    connector: &'a R,
    output: &'a OutputManager,
}

impl<'a, R> PushDriver<'a, R>
where
    R: RuntimeConnector + ?Sized,
{
    pub fn new(connector: &'a R, output: &'a OutputManager) -> Self {
        Self { connector, output }
    }

    /// Open an engine handle, negotiate the version and start the push.
    /// References the engine cannot push are rejected before connecting.
    pub async fn push(&self, image: &ImageReference, token: &AuthToken) -> Result<StatusStream> {
        let (repository, tag) = image.push_target()?;
        let api = self.connector.connect()?;
        let version = negotiate_version(&api, self.output).await?;

        self.output.verbose(&format!(
            "Pushing {}:{} with engine API {}",
            repository, tag, version
        ));
        let body = api.push(version, image, token).await?;
        Ok(StatusStream::new(body))
    }
}
