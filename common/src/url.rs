use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("default URL options are not configured")]
    Unconfigured,
    #[error("default URL options have no host")]
    MissingHost,
}

/// Default URL options used to upgrade a relative blob path to an absolute
/// URL. Injected into the resolver instead of being looked up globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlContext {
    pub protocol: String,
    pub host: String,
    pub port: Option<u16>,
}

impl UrlContext {
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port,
        }
    }

    /// Joins `path` onto `protocol://host[:port]`. The port is omitted when it
    /// is the protocol's standard one (80 for http, 443 for https).
    pub fn absolute_url(&self, path: &str) -> Result<String, UrlError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(UrlError::MissingHost);
        }
        let protocol = self.protocol.trim_end_matches("://");

        let mut base = format!("{}://{}", protocol, host);
        if let Some(port) = self.port {
            if !is_standard_port(protocol, port) {
                base.push_str(&format!(":{}", port));
            }
        }

        if path.is_empty() || path.starts_with('/') {
            Ok(format!("{}{}", base, path))
        } else {
            Ok(format!("{}/{}", base, path))
        }
    }
}

fn is_standard_port(protocol: &str, port: u16) -> bool {
    matches!(
        (protocol.to_ascii_lowercase().as_str(), port),
        ("http", 80) | ("https", 443)
    )
}
