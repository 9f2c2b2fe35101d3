//! Credential lookup plus push, end to end

use crate::engine::{PushDriver, PushReport, RuntimeConnector, interpret};
use crate::error::Result;
use crate::image::ImageReference;
use crate::output::OutputManager;
use crate::registry::{AuthToken, Catalog, resolve_credentials};

/// Find the registry credential for `image` and push it through the engine.
///
/// Succeeds only when the engine's status stream ends without an error
/// record. Nothing is retried.
pub async fn auth_and_push<C, R>(catalog: &C, connector: &R, image: &str, output: &OutputManager) -> Result<PushReport>
where
    C: Catalog + ?Sized,
    R: RuntimeConnector + ?Sized,
{
    let credentials = resolve_credentials(catalog, image, output).await?;
    let token = AuthToken::encode(&credentials)?;
    drop(credentials);

    let reference = ImageReference::parse(image);
    let stream = PushDriver::new(connector, output).push(&reference, &token).await?;
    drop(token);

    interpret(stream, image, output).await
}

/// Catalog and engine connector bundled for repeated pushes
pub struct ImagePusher<C, R> {
    catalog: C,
    connector: R,
    output: OutputManager,
}

impl<C, R> ImagePusher<C, R>
where
    C: Catalog,
    R: RuntimeConnector,
{
    pub fn new(catalog: C, connector: R, output: OutputManager) -> Self {
        Self {
            catalog,
            connector,
            output,
        }
    }

    pub async fn push(&self, image: &str) -> Result<PushReport> {
        self.output.section(&format!("Pushing {}", image));
        auth_and_push(&self.catalog, &self.connector, image, &self.output).await
    }
}
