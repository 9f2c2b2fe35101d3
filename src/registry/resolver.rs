//! Credential lookup for an image reference

use crate::error::Result;
use crate::image::split_host_name;
use crate::output::OutputManager;
use crate::registry::auth::Credentials;
use crate::registry::catalog::Catalog;

/// Find the stored credential for the registry `image` is pushed to.
///
/// An image whose registry, or whose registry's credential, is missing from
/// the catalog resolves to anonymous credentials after a warning. Listing
/// failures are returned as they are.
pub async fn resolve_credentials<C>(catalog: &C, image: &str, output: &OutputManager) -> Result<Credentials>
where
    C: Catalog + ?Sized,
{
    let registries = catalog.list_registries().await?;

    let (host, _) = split_host_name(image);
    output.detail(&format!("Registry host for '{}': {}", image, host));

    let Some(registry) = registries.iter().find(|r| r.server_address == host) else {
        warn_missing(image, output);
        return Ok(Credentials::anonymous());
    };

    let credentials = catalog.list_credentials().await?;
    match credentials.into_iter().find(|c| c.registry_id == registry.id) {
        Some(credential) => {
            output.verbose(&format!(
                "Using credential '{}' of registry {} for '{}'",
                credential.public_value, registry.id, image
            ));
            Ok(Credentials::new(credential.public_value, credential.secret_value))
        }
        None => {
            warn_missing(image, output);
            Ok(Credentials::anonymous())
        }
    }
}

fn warn_missing(image: &str, output: &OutputManager) {
    output.warning(&format!(
        "Cannot find registry credential for '{}', You probably need to add it in registries configuration.",
        image
    ));
}
