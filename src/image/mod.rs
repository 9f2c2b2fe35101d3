//! Image reference handling
//!
//! Turns the image strings handed to the pusher into the registry host used for
//! credential lookup and the repository/tag pair the engine push call needs.

pub mod reference;

pub use reference::{DEFAULT_REGISTRY, DEFAULT_TAG, ImageReference, split_host_name};
