//! Engine API version handling

use crate::error::{PusherError, Result};
use std::fmt;
use std::str::FromStr;

/// A `major.minor` engine API version, ordered numerically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

/// Engines older than 1.25 do not report their version on `/_ping`.
pub const LEGACY_API_VERSION: ApiVersion = ApiVersion::new(1, 24);

impl ApiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Version to speak with an engine that reported `reported` on ping.
    ///
    /// A missing report means [`LEGACY_API_VERSION`]. The client never speaks a
    /// newer version than the engine, and never goes above its own default.
    pub fn negotiate(reported: Option<&str>, client: ApiVersion) -> Result<ApiVersion> {
        let server = match reported.map(str::trim).filter(|v| !v.is_empty()) {
            Some(version) => version.parse()?,
            None => LEGACY_API_VERSION,
        };
        Ok(server.min(client))
    }
}

impl FromStr for ApiVersion {
    type Err = PusherError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PusherError::VersionNegotiation(format!("Invalid API version '{}'", s));
        let (major, minor) = s.split_once('.').unwrap_or((s, "0"));
        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;
        Ok(ApiVersion { major, minor })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
