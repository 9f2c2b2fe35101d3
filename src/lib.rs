//! Registry-auth image pusher
//!
//! Looks up the credential for an image's registry in a catalog service and
//! pushes the image through the local container engine, following the
//! engine's status stream until the push succeeds or fails.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod image;
pub mod output;
pub mod pusher;
pub mod registry;

pub use error::{PusherError, Result};
pub use output::OutputManager;
pub use pusher::{ImagePusher, auth_and_push};
