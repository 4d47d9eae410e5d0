// Proxy gateway - Fetch a dashboard on the browser's behalf
use crate::domain::dashboard::Credentials;
use crate::domain::embed::{CACHE_BUST_PARAM, DASHBOARD_PARAM};
use crate::domain::proxy::{ProxyError, ProxyTarget};
use crate::infrastructure::header_policy::rewrite_response_headers;
use crate::infrastructure::http_client::{build_client, describe_error, with_credentials, ClientOptions};
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::time::Duration;
use url::{form_urlencoded, Url};

/// Query parameters consumed by the gateway and never sent upstream.
pub const RESERVED_PARAMS: &[&str] = &[DASHBOARD_PARAM, CACHE_BUST_PARAM, "username", "password"];

pub type BodyStream = BoxStream<'static, Result<Bytes, reqwest::Error>>;

/// Upstream answer with framing headers already rewritten.
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BodyStream,
}

impl std::fmt::Debug for ProxiedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxiedResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Stateless apart from the pooled client; clones share the pool.
#[derive(Debug, Clone)]
pub struct ProxyGateway {
    client: reqwest::Client,
    timeout: Duration,
}

impl ProxyGateway {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = build_client(&ClientOptions::streaming(user_agent, timeout))?;
        Ok(Self::with_client(client, timeout))
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn fetch(
        &self,
        target: &str,
        credentials: Option<&Credentials>,
    ) -> Result<ProxiedResponse, ProxyError> {
        self.fetch_with_headers(target, credentials, HeaderMap::new())
            .await
    }

    /// `forwarded` holds browser headers already filtered by the header policy.
    pub async fn fetch_with_headers(
        &self,
        target: &str,
        credentials: Option<&Credentials>,
        forwarded: HeaderMap,
    ) -> Result<ProxiedResponse, ProxyError> {
        let mut url = ProxyTarget::parse(target)?.into_url();
        strip_reserved_params(&mut url);

        let request = with_credentials(self.client.get(url.clone()).headers(forwarded), credentials);

        let started = std::time::Instant::now();
        let response = match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_builder() => {
                return Err(ProxyError::InvalidTarget(describe_error(&e)));
            }
            Ok(Err(e)) => {
                tracing::warn!("Upstream {} unreachable: {}", log_url(&url), describe_error(&e));
                return Err(ProxyError::Unreachable(describe_error(&e)));
            }
            Err(_) => {
                tracing::warn!(
                    "Upstream {} did not answer within {}s",
                    log_url(&url),
                    self.timeout.as_secs()
                );
                return Err(ProxyError::Unreachable(format!(
                    "no response within {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        let status = response.status();
        let headers = rewrite_response_headers(response.headers());
        tracing::info!(
            "Proxy {} -> {} ({} ms, auth={})",
            log_url(&url),
            status,
            started.elapsed().as_millis(),
            credentials.is_some()
        );

        let upstream = log_url(&url);
        let mut chunks = Box::pin(response.bytes_stream());
        let body = async_stream::stream! {
            let mut total = 0usize;
            while let Some(chunk) = chunks.next().await {
                match &chunk {
                    Ok(bytes) => total += bytes.len(),
                    Err(e) => tracing::warn!("Body stream from {} aborted: {}", upstream, e),
                }
                yield chunk;
            }
            tracing::debug!("Streamed {} bytes from {}", total, upstream);
        };

        Ok(ProxiedResponse {
            status,
            headers,
            body: body.boxed(),
        })
    }
}

pub fn strip_reserved_params(url: &mut Url) {
    let Some(query) = url.query() else {
        return;
    };
    let kept = retain_unreserved(query);
    url.set_query(kept.as_deref());
}

/// Drop reserved parameters from a raw query string. Every other segment is
/// kept byte-for-byte, so bare flags like `kiosk` and `%20` escapes survive.
pub fn retain_unreserved(query: &str) -> Option<String> {
    let kept: Vec<&str> = query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| {
            let name = form_urlencoded::parse(segment.as_bytes())
                .next()
                .map(|(name, _)| name.into_owned())
                .unwrap_or_default();
            !RESERVED_PARAMS.contains(&name.as_str())
        })
        .collect();

    (!kept.is_empty()).then(|| kept.join("&"))
}

// scheme, host and path only; queries may carry tokens
fn log_url(url: &Url) -> String {
    format!("{}{}", url.origin().ascii_serialization(), url.path())
}
