// Connection tester - Pre-flight reachability check for a dashboard url
use crate::domain::dashboard::Credentials;
use crate::domain::proxy::{ProxyError, ProxyTarget};
use crate::infrastructure::http_client::{build_client, with_credentials, ClientOptions};
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    pub success: bool,
    pub message: String,
}

impl TestOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            message: "Connection successful".to_string(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionTester {
    client: reqwest::Client,
    timeout: Duration,
}

impl ConnectionTester {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = build_client(&ClientOptions::bounded(user_agent, timeout))?;
        Ok(Self { client, timeout })
    }

    /// Single GET with the gateway's auth injection. The body is dropped
    /// unread, redirects count as success.
    pub async fn test(&self, url: &str, credentials: Option<&Credentials>) -> TestOutcome {
        let target = match ProxyTarget::parse(url) {
            Ok(target) => target,
            Err(ProxyError::InvalidTarget(reason) | ProxyError::Unreachable(reason)) => {
                return TestOutcome::failed(format!("Invalid URL: {reason}"));
            }
        };

        let request = with_credentials(self.client.get(target.into_url()), credentials);
        let outcome = match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(Ok(response)) => outcome_for_status(response.status()),
            Ok(Err(e)) if e.is_timeout() => self.timed_out(),
            Ok(Err(e)) => TestOutcome::failed(format!("Connection error: {}", root_cause(&e))),
            Err(_) => self.timed_out(),
        };

        tracing::info!(
            "Connection test for {} -> success={} ({})",
            url.split('?').next().unwrap_or_default(),
            outcome.success,
            outcome.message
        );
        outcome
    }

    fn timed_out(&self) -> TestOutcome {
        TestOutcome::failed(format!(
            "Connection timed out after {}s",
            self.timeout.as_secs()
        ))
    }
}

fn outcome_for_status(status: StatusCode) -> TestOutcome {
    if status.is_success() || status.is_redirection() {
        return TestOutcome::ok();
    }
    match status {
        StatusCode::UNAUTHORIZED => {
            TestOutcome::failed("Authentication required or invalid credentials")
        }
        StatusCode::FORBIDDEN => TestOutcome::failed("Access forbidden"),
        StatusCode::NOT_FOUND => TestOutcome::failed("Dashboard not found"),
        other => TestOutcome::failed(format!(
            "HTTP error {}: {}",
            other.as_u16(),
            other.canonical_reason().unwrap_or("Unknown")
        )),
    }
}

// innermost cause reads best for a form field, e.g. "Connection refused (os error 111)"
fn root_cause(error: &reqwest::Error) -> String {
    let mut cause: &dyn std::error::Error = error;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert!(outcome_for_status(StatusCode::OK).success);
        assert!(outcome_for_status(StatusCode::FOUND).success);
        assert_eq!(
            outcome_for_status(StatusCode::UNAUTHORIZED).message,
            "Authentication required or invalid credentials"
        );
        assert_eq!(outcome_for_status(StatusCode::FORBIDDEN).message, "Access forbidden");
        assert_eq!(outcome_for_status(StatusCode::NOT_FOUND).message, "Dashboard not found");
        assert_eq!(
            outcome_for_status(StatusCode::BAD_GATEWAY).message,
            "HTTP error 502: Bad Gateway"
        );
    }

    #[tokio::test]
    async fn test_invalid_url_is_reported_not_raised() {
        let tester = ConnectionTester::new("test", Duration::from_secs(1)).unwrap();
        let outcome = tester.test("grafana.local", None).await;

        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Invalid URL: "));
    }
}
