//! Container engine interaction
//!
//! Version negotiation, the push request itself, and decoding plus
//! interpretation of the status stream the engine sends back while pushing.

pub mod client;
pub mod driver;
pub mod interpreter;
pub mod stream;
pub mod version;

pub use client::{EngineClient, EngineConnector, PingInfo, RuntimeApi, RuntimeConnector};
pub use driver::{PushDriver, negotiate_version};
pub use interpreter::{PushReport, interpret};
pub use stream::{ByteStream, StatusRecord, StatusStream};
pub use version::{ApiVersion, LEGACY_API_VERSION};
