// Embed URL generation for the display frame
use super::dashboard::Dashboard;
use super::proxy::is_absolute_http;

pub const PROXY_PREFIX: &str = "/proxy/";
pub const CACHE_BUST_PARAM: &str = "_t";
pub const DASHBOARD_PARAM: &str = "dashboard";

/// Issues tokens that are unique for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct CacheBuster {
    session: i64,
    sequence: u64,
}

impl Default for CacheBuster {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBuster {
    pub fn new() -> Self {
        Self {
            session: chrono::Utc::now().timestamp_millis(),
            sequence: 0,
        }
    }

    pub fn next_token(&mut self) -> String {
        self.sequence += 1;
        format!("{}-{}", self.session, self.sequence)
    }
}

/// Frame source for a dashboard. Absolute urls are routed through the proxy
/// and name the dashboard by id so credentials are resolved server-side.
pub fn embed_url(dashboard: &Dashboard, token: &str) -> String {
    let url = dashboard.url.trim();
    if is_absolute_http(url) {
        let target = format!("{PROXY_PREFIX}{url}");
        let id = dashboard.id();
        append_params(
            &target,
            &[(DASHBOARD_PARAM, id.as_str()), (CACHE_BUST_PARAM, token)],
        )
    } else {
        append_params(url, &[(CACHE_BUST_PARAM, token)])
    }
}

fn append_params(url: &str, params: &[(&str, &str)]) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };

    let mut out = base.to_string();
    for (name, value) in params {
        out.push(if out.contains('?') { '&' } else { '?' });
        out.push_str(name);
        out.push('=');
        out.push_str(&urlencoding::encode(value));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_goes_through_proxy_without_credentials() {
        let dashboard = Dashboard::new("Grafana", "https://grafana.example.com/d/abc")
            .with_credentials("viewer", "hunter2");
        let url = embed_url(&dashboard, "42");

        assert_eq!(
            url,
            format!("/proxy/https://grafana.example.com/d/abc?dashboard={}&_t=42", dashboard.id())
        );
        assert!(!url.contains("hunter2"));
        assert!(!url.contains("viewer"));
    }

    #[test]
    fn test_existing_query_and_fragment_are_kept() {
        let dashboard = Dashboard::new("Grafana", "https://g.example.com/d/abc?orgId=1#panel-2");
        let url = embed_url(&dashboard, "7");

        assert!(url.starts_with("/proxy/https://g.example.com/d/abc?orgId=1&dashboard="));
        assert!(url.ends_with("&_t=7#panel-2"));
    }

    #[test]
    fn test_relative_url_bypasses_proxy() {
        let dashboard = Dashboard::new("Demo", "/demo/uptimekuma");
        assert_eq!(embed_url(&dashboard, "1"), "/demo/uptimekuma?_t=1");
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut buster = CacheBuster::new();
        let first = buster.next_token();
        let second = buster.next_token();
        assert_ne!(first, second);
    }
}
