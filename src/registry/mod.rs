//! Registry credential handling
//!
//! Catalog access, credential resolution for an image, and encoding of the
//! resolved credentials into the token the engine forwards to the registry.

pub mod auth;
pub mod catalog;
pub mod resolver;

pub use auth::{AuthToken, Credentials};
pub use catalog::{Catalog, CredentialCatalog, CredentialEntry, RancherCatalog, RegistryCatalog, RegistryEntry};
pub use resolver::resolve_credentials;
