// Shared outbound HTTP client construction and auth injection.
//
// The gateway, the connection tester and the status source all talk to
// dashboards through clients built here.

use crate::domain::dashboard::Credentials;
use reqwest::redirect::Policy;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout. `None` leaves bodies unbounded for streaming.
    pub request_timeout: Option<Duration>,
    pub follow_redirects: bool,
}

impl ClientOptions {
    pub fn streaming(user_agent: &str, connect_timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            connect_timeout,
            request_timeout: None,
            follow_redirects: true,
        }
    }

    pub fn bounded(user_agent: &str, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            connect_timeout: timeout,
            request_timeout: Some(timeout),
            follow_redirects: false,
        }
    }
}

pub fn build_client(options: &ClientOptions) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(options.user_agent.clone())
        .connect_timeout(options.connect_timeout)
        .redirect(if options.follow_redirects {
            Policy::limited(10)
        } else {
            Policy::none()
        });

    if let Some(timeout) = options.request_timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

/// Attach Basic-Auth when credentials are present.
pub fn with_credentials(
    request: reqwest::RequestBuilder,
    credentials: Option<&Credentials>,
) -> reqwest::RequestBuilder {
    match credentials {
        Some(creds) => request.basic_auth(creds.username(), Some(creds.password())),
        None => request,
    }
}

/// One-line description of a transport failure including its cause chain.
pub fn describe_error(error: &reqwest::Error) -> String {
    let mut message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    };

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
