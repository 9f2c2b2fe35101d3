//! Command line interface module
//!
//! Argument parsing and validation, and the runner that builds the catalog and
//! engine adapters for a single push.

pub mod args;
pub mod runner;

pub use args::Args;
pub use runner::Runner;
