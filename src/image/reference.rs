//! Image reference parsing
//!
//! References have the form `[host[:port]/]repository[:tag]`. The host is only
//! recognised when the first path segment looks like one, otherwise the image
//! lives on the default registry.

use crate::error::{PusherError, Result};

/// Registry used when a reference carries no host segment
pub const DEFAULT_REGISTRY: &str = "index.docker.io";

/// Split a reference into its registry host and repository path.
///
/// The first segment counts as a host when it contains `.` or `:`, or is
/// exactly `localhost`. Never fails.
pub fn split_host_name(reference: &str) -> (&str, &str) {
    match reference.find('/') {
        Some(i) => {
            let prefix = &reference[..i];
            if prefix.contains(['.', ':']) || prefix == "localhost" {
                (prefix, &reference[i + 1..])
            } else {
                (DEFAULT_REGISTRY, reference)
            }
        }
        None => (DEFAULT_REGISTRY, reference),
    }
}

/// Tag pushed when a reference names neither a tag nor a digest
pub const DEFAULT_TAG: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    raw: String,
    pub host: String,
    pub path: String,
    pub name: String,
    pub tag: Option<String>,
    pub digest: Option<String>,
}

impl ImageReference {
    pub fn parse(reference: &str) -> Self {
        let (host, path) = split_host_name(reference);
        let (rest, digest) = match path.split_once('@') {
            Some((rest, digest)) => (rest, Some(digest)),
            None => (path, None),
        };
        let (name, tag) = split_tag(rest);

        Self {
            raw: reference.to_string(),
            host: host.to_string(),
            path: path.to_string(),
            name: name.to_string(),
            tag: tag.map(str::to_string),
            digest: digest.map(str::to_string),
        }
    }

    /// The reference exactly as given
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_default_registry(&self) -> bool {
        self.path == self.raw
    }

    /// Repository (with the host as written) and the tag for an engine push
    /// request. Untagged references push `latest`. Digest references cannot
    /// be pushed.
    pub fn push_target(&self) -> Result<(String, String)> {
        if self.digest.is_some() {
            return Err(PusherError::PushInitiation(format!(
                "Cannot push a digest reference '{}'",
                self.raw
            )));
        }

        let repository = if self.is_default_registry() {
            self.name.clone()
        } else {
            format!("{}/{}", self.host, self.name)
        };
        let tag = self.tag.clone().unwrap_or_else(|| DEFAULT_TAG.to_string());
        Ok((repository, tag))
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_tag(path: &str) -> (&str, Option<&str>) {
    let last_segment = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[last_segment..].rfind(':') {
        Some(i) => {
            let at = last_segment + i;
            (&path[..at], Some(&path[at + 1..]))
        }
        None => (path, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_without_host_uses_default_registry() {
        for reference in ["myrepo/app:latest", "app", "app:1.0", "library/nginx", "a/b/c:d"] {
            assert_eq!(split_host_name(reference), (DEFAULT_REGISTRY, reference));
        }
    }

    #[test]
    fn test_split_with_host_prefix() {
        assert_eq!(
            split_host_name("registry.example.com:5000/app"),
            ("registry.example.com:5000", "app")
        );
        assert_eq!(
            split_host_name("quay.io/coreos/etcd:v3"),
            ("quay.io", "coreos/etcd:v3")
        );
        assert_eq!(split_host_name("localhost/app"), ("localhost", "app"));
        assert_eq!(split_host_name("localhost:5000/a/b"), ("localhost:5000", "a/b"));
    }

    #[test]
    fn test_localhost_must_match_exactly() {
        assert_eq!(
            split_host_name("localhosts/app"),
            (DEFAULT_REGISTRY, "localhosts/app")
        );
    }

    #[test]
    fn test_parse_splits_tag_after_last_segment() {
        let reference = ImageReference::parse("localhost:5000/team/app:v2");
        assert_eq!(reference.host, "localhost:5000");
        assert_eq!(reference.path, "team/app:v2");
        assert_eq!(reference.name, "team/app");
        assert_eq!(reference.tag.as_deref(), Some("v2"));
        assert!(!reference.is_default_registry());
        assert_eq!(
            reference.push_target().unwrap(),
            ("localhost:5000/team/app".to_string(), "v2".to_string())
        );
    }

    #[test]
    fn test_parse_port_is_not_a_tag() {
        let reference = ImageReference::parse("registry.example.com:5000/app");
        assert_eq!(reference.name, "app");
        assert_eq!(reference.tag, None);
        assert_eq!(
            reference.push_target().unwrap(),
            ("registry.example.com:5000/app".to_string(), DEFAULT_TAG.to_string())
        );
    }

    #[test]
    fn test_parse_default_registry_keeps_reference() {
        let reference = ImageReference::parse("myrepo/app:latest");
        assert!(reference.is_default_registry());
        assert_eq!(reference.host, DEFAULT_REGISTRY);
        assert_eq!(
            reference.push_target().unwrap(),
            ("myrepo/app".to_string(), "latest".to_string())
        );
        assert_eq!(reference.to_string(), "myrepo/app:latest");
    }

    #[test]
    fn test_digest_reference_is_not_pushable() {
        let reference = ImageReference::parse("quay.io/app:1.0@sha256:abcd");
        assert_eq!(reference.name, "app");
        assert_eq!(reference.tag.as_deref(), Some("1.0"));
        assert_eq!(reference.digest.as_deref(), Some("sha256:abcd"));
        assert!(matches!(
            reference.push_target(),
            Err(PusherError::PushInitiation(_))
        ));
    }
}
