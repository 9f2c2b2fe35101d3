//! Registry and credential catalogs
//!
//! The catalogs are owned by an external service. The pusher only ever lists
//! them, through the [`RegistryCatalog`] and [`CredentialCatalog`] traits.
//! [`RancherCatalog`] is the HTTP implementation for a Rancher style API.

use crate::config::CatalogConfig;
use crate::error::{PusherError, Result};
use crate::output::OutputManager;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use url::Url;

/// One known registry endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub id: String,
    #[serde(default)]
    pub server_address: String,
}

/// A stored credential for one registry
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEntry {
    pub registry_id: String,
    #[serde(default)]
    pub public_value: String,
    #[serde(default)]
    pub secret_value: String,
}

impl std::fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("registry_id", &self.registry_id)
            .field("public_value", &self.public_value)
            .field("secret_value", &"***")
            .finish()
    }
}

#[async_trait]
pub trait RegistryCatalog: Send + Sync {
    async fn list_registries(&self) -> Result<Vec<RegistryEntry>>;
}

#[async_trait]
pub trait CredentialCatalog: Send + Sync {
    async fn list_credentials(&self) -> Result<Vec<CredentialEntry>>;
}

/// Both catalogs, as served by one API client
pub trait Catalog: RegistryCatalog + CredentialCatalog {}

impl<T: RegistryCatalog + CredentialCatalog + ?Sized> Catalog for T {}

#[derive(Debug, Deserialize)]
struct Collection<T> {
    data: Vec<T>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    next: Option<String>,
}

/// Catalog backed by the `/registries` and `/registrycredentials` collections
pub struct RancherCatalog {
    client: Client,
    config: CatalogConfig,
    output: OutputManager,
}

impl RancherCatalog {
    pub fn new(config: CatalogConfig, output: OutputManager) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| PusherError::Catalog(format!("Failed to create catalog client: {}", e)))?;

        Ok(Self {
            client,
            config,
            output,
        })
    }

    async fn list_collection<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let mut url = self.config.url.join(collection)?;
        let mut items = Vec::new();
        let mut visited = HashSet::new();

        loop {
            visited.insert(url.clone());
            self.output.detail(&format!("Listing {}", url));

            let mut request = self.client.get(url.clone());
            if let (Some(access), Some(secret)) = (&self.config.access_key, &self.config.secret_key) {
                request = request.basic_auth(access, Some(secret));
            }

            let response = request.send().await.map_err(|e| {
                PusherError::Catalog(format!("Failed to list {}: {}", collection, e))
            })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(PusherError::Catalog(format!(
                    "Listing {} failed with status {}: {}",
                    collection,
                    status,
                    body.trim()
                )));
            }

            let page: Collection<T> = response.json().await.map_err(|e| {
                PusherError::Catalog(format!("Failed to parse {} collection: {}", collection, e))
            })?;
            items.extend(page.data);

            match page.pagination.and_then(|p| p.next) {
                Some(next) => {
                    let next = Url::parse(&next)?;
                    if visited.contains(&next) {
                        self.output
                            .warning(&format!("Catalog pagination for {} loops back to {}, stopping", collection, next));
                        break;
                    }
                    url = next;
                }
                None => break,
            }
        }

        self.output
            .debug(&format!("Catalog returned {} {}", items.len(), collection));
        Ok(items)
    }
}

#[async_trait]
impl RegistryCatalog for RancherCatalog {
    async fn list_registries(&self) -> Result<Vec<RegistryEntry>> {
        self.list_collection("registries").await
    }
}

#[async_trait]
impl CredentialCatalog for RancherCatalog {
    async fn list_credentials(&self) -> Result<Vec<CredentialEntry>> {
        self.list_collection("registrycredentials").await
    }
}
