// HTTP request handlers
use crate::application::display_runtime::DisplayView;
use crate::application::display_shell::KeyEvent;
use crate::application::rotation::DisplayCommand;
use crate::domain::dashboard::Credentials;
use crate::domain::embed::{DASHBOARD_PARAM, PROXY_PREFIX};
use crate::domain::settings::SignageConfig;
use crate::domain::status::StatusReport;
use crate::infrastructure::header_policy::forwarded_request_headers;
use crate::infrastructure::http_response::streamed_response;
use crate::infrastructure::proxy_gateway::retain_unreserved;
use crate::presentation::app_state::AppState;
use crate::presentation::error::{ApiResult, AppError};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::{form_urlencoded, Url};

#[derive(Debug, Deserialize)]
pub struct TestConnectionQuery {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub dashboard: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TestConnectionResponse {
    pub success: bool,
    pub message: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub dashboard: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Everything after `/proxy/` is the target. Non-reserved query parameters
/// belong to the target; reserved ones select credentials and are dropped.
pub async fn proxy_dashboard(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let raw = uri.path().strip_prefix(PROXY_PREFIX).unwrap_or_default();
    let mut target = if raw.contains("://") {
        raw.to_string()
    } else {
        // fully percent-encoded form, e.g. /proxy/http%3A%2F%2Fhost%2F
        match urlencoding::decode(raw) {
            Ok(decoded) => decoded.into_owned(),
            Err(e) => return AppError::InvalidTarget(e.to_string()).into_response(),
        }
    };

    let params: Vec<(String, String)> = form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes())
        .into_owned()
        .collect();
    if let Some(query) = uri.query().and_then(retain_unreserved) {
        target.push(if target.contains('?') { '&' } else { '?' });
        target.push_str(&query);
    }

    let credentials = resolve_credentials(&state, &params, &target).await;
    let result = state
        .gateway
        .fetch_with_headers(&target, credentials.as_ref(), forwarded_request_headers(&headers))
        .await;

    match result {
        Ok(proxied) => match streamed_response(proxied) {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Pre-flight check used by the configuration form. Failures are reported in
/// the body, only a missing url is a client error.
pub async fn test_connection(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TestConnectionQuery>,
) -> ApiResult<Json<TestConnectionResponse>> {
    let url = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("URL is required".to_string()))?
        .to_string();

    let credentials = match Credentials::from_parts(query.username.as_deref(), query.password.as_deref()) {
        Some(credentials) => Some(credentials),
        None => match query.dashboard.as_deref() {
            Some(id) => stored_credentials(&state, id).await,
            None => None,
        },
    };

    let outcome = state.tester.test(&url, credentials.as_ref()).await;
    Ok(Json(TestConnectionResponse {
        success: outcome.success,
        message: outcome.message,
        url,
    }))
}

/// Stored configuration with passwords masked.
pub async fn get_config(State(state): State<Arc<AppState>>) -> ApiResult<Json<SignageConfig>> {
    let config = state.store.load().await?;
    Ok(Json(config.masked()))
}

pub async fn save_config(
    State(state): State<Arc<AppState>>,
    Json(incoming): Json<SignageConfig>,
) -> ApiResult<Json<SaveResponse>> {
    let stored = state.store.load().await?;
    let config = incoming.unmask(&stored);

    state.store.save(&config).await?;
    tracing::info!("Configuration saved with {} dashboards", config.dashboards.len());
    // the save has committed; a stopped display must not turn it into an error
    let message = match state.display.reconfigure(config).await {
        Ok(()) => "Configuration saved".to_string(),
        Err(e) => {
            tracing::error!("Configuration saved but display not updated: {}", e);
            format!("Configuration saved; display not updated: {e}")
        }
    };

    Ok(Json(SaveResponse {
        success: true,
        message,
    }))
}

pub async fn get_display(State(state): State<Arc<AppState>>) -> Json<DisplayView> {
    Json(state.display.view())
}

pub async fn post_display_command(
    State(state): State<Arc<AppState>>,
    Json(command): Json<DisplayCommand>,
) -> ApiResult<StatusCode> {
    tracing::debug!("Display command {:?}", command);
    state.display.send(command).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn post_display_key(
    State(state): State<Arc<AppState>>,
    Json(event): Json<KeyEvent>,
) -> ApiResult<StatusCode> {
    state.display.key(event).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Uptime Kuma summary. Problems are encoded in the report, never as an
/// HTTP error.
pub async fn uptimekuma_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Json<StatusReport> {
    let Some(base_url) = query.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        return Json(StatusReport::failure("UptimeKuma URL is required"));
    };

    let credentials = match Credentials::from_parts(query.username.as_deref(), query.password.as_deref()) {
        Some(credentials) => Some(credentials),
        None => match query.dashboard.as_deref() {
            Some(id) => stored_credentials(&state, id).await,
            None => None,
        },
    };

    Json(
        state
            .status_source
            .fetch_status(base_url, credentials.as_ref())
            .await,
    )
}

async fn load_config(state: &AppState) -> Option<SignageConfig> {
    match state.store.load().await {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::error!("Could not read stored credentials: {}", e);
            None
        }
    }
}

async fn stored_credentials(state: &AppState, dashboard_id: &str) -> Option<Credentials> {
    let config = load_config(state).await?;
    let credentials = config.find_dashboard(dashboard_id).and_then(|d| d.credentials());
    if credentials.is_none() {
        tracing::debug!("Dashboard {} has no stored credentials", dashboard_id);
    }
    credentials
}

fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Dashboard id, then legacy query credentials, then a stored dashboard on
/// the same origin. Stored credentials only ever go to their own origin.
async fn resolve_credentials(
    state: &AppState,
    params: &[(String, String)],
    target: &str,
) -> Option<Credentials> {
    let target_url = Url::parse(target).ok();

    if let (Some(id), Some(target_url)) = (param(params, DASHBOARD_PARAM), target_url.as_ref()) {
        if let Some(config) = load_config(state).await {
            match config.find_dashboard(id) {
                Some(dashboard) => match dashboard.credentials_for(target_url) {
                    Some(credentials) => return Some(credentials),
                    None if dashboard.credentials().is_some() => tracing::warn!(
                        "Dashboard {} credentials withheld from foreign origin {}",
                        id,
                        target_url.origin().ascii_serialization()
                    ),
                    None => {}
                },
                None => tracing::debug!("Unknown dashboard id {}", id),
            }
        }
    }

    if let Some(credentials) = Credentials::from_parts(param(params, "username"), param(params, "password")) {
        tracing::warn!(
            "Credentials for user {} passed in the query string (password redacted); store them on the dashboard instead",
            credentials.username()
        );
        return Some(credentials);
    }

    load_config(state).await?.credentials_for_origin(&target_url?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_lookup() {
        let params = vec![
            ("dashboard".to_string(), "abc".to_string()),
            ("_t".to_string(), "1-0".to_string()),
        ];
        assert_eq!(param(&params, "dashboard"), Some("abc"));
        assert_eq!(param(&params, "username"), None);
    }
}
