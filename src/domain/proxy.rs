// Proxy target validation and failure taxonomy
use serde::Serialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyErrorKind {
    InvalidTarget,
    Unreachable,
}

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Rejected before any network call.
    #[error("Invalid proxy target: {0}")]
    InvalidTarget(String),

    /// Connection refused, DNS failure or timeout.
    #[error("Cannot reach dashboard: {0}")]
    Unreachable(String),
}

impl ProxyError {
    pub fn kind(&self) -> ProxyErrorKind {
        match self {
            Self::InvalidTarget(_) => ProxyErrorKind::InvalidTarget,
            Self::Unreachable(_) => ProxyErrorKind::Unreachable,
        }
    }
}

/// An absolute http(s) URL the gateway is allowed to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget(Url);

impl ProxyTarget {
    pub fn parse(raw: &str) -> Result<Self, ProxyError> {
        let url = Url::parse(raw.trim())
            .map_err(|e| ProxyError::InvalidTarget(format!("{raw:?}: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ProxyError::InvalidTarget(format!(
                    "unsupported scheme {other:?}"
                )));
            }
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ProxyError::InvalidTarget(format!("{raw:?} has no host")));
        }

        Ok(Self(url))
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

/// Whether a dashboard url has to go through the gateway.
pub fn is_absolute_http(raw: &str) -> bool {
    let lower = raw.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
