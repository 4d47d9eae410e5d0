// Header rewriting rules for proxied dashboards
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    /// Drop the header entirely.
    Strip,
    /// Keep the policy but remove its `frame-ancestors` directive.
    StripFrameAncestors,
}

/// Every response header the gateway touches. Anything not listed passes
/// through untouched.
pub const HEADER_POLICY: &[(&str, HeaderAction)] = &[
    // Framing and embedding policy
    ("x-frame-options", HeaderAction::Strip),
    ("content-security-policy", HeaderAction::StripFrameAncestors),
    ("content-security-policy-report-only", HeaderAction::StripFrameAncestors),
    ("cross-origin-opener-policy", HeaderAction::Strip),
    ("cross-origin-embedder-policy", HeaderAction::Strip),
    ("cross-origin-resource-policy", HeaderAction::Strip),
    // Hop-by-hop, they describe the upstream connection only
    ("connection", HeaderAction::Strip),
    ("keep-alive", HeaderAction::Strip),
    ("transfer-encoding", HeaderAction::Strip),
    ("te", HeaderAction::Strip),
    ("trailer", HeaderAction::Strip),
    ("upgrade", HeaderAction::Strip),
    ("proxy-authenticate", HeaderAction::Strip),
    ("proxy-authorization", HeaderAction::Strip),
];

/// Browser request headers worth forwarding upstream.
pub const FORWARDED_REQUEST_HEADERS: &[&str] = &[
    "accept",
    "accept-language",
    "accept-encoding",
    "cache-control",
    "if-none-match",
    "if-modified-since",
    "range",
];

pub fn action_for(name: &HeaderName) -> Option<HeaderAction> {
    HEADER_POLICY
        .iter()
        .find(|(listed, _)| name.as_str().eq_ignore_ascii_case(listed))
        .map(|(_, action)| *action)
}

/// Apply `HEADER_POLICY` to an upstream response. A permissive CORS origin
/// is added when the upstream did not set one.
pub fn rewrite_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(upstream.len() + 1);

    for (name, value) in upstream {
        match action_for(name) {
            None => {
                out.append(name.clone(), value.clone());
            }
            Some(HeaderAction::Strip) => {}
            Some(HeaderAction::StripFrameAncestors) => {
                let rewritten = value
                    .to_str()
                    .ok()
                    .and_then(strip_frame_ancestors)
                    .and_then(|v| HeaderValue::from_str(&v).ok());
                if let Some(v) = rewritten {
                    out.append(name.clone(), v);
                }
            }
        }
    }

    if !out.contains_key(ACCESS_CONTROL_ALLOW_ORIGIN) {
        out.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
    out
}

/// Remove `frame-ancestors` from a CSP value. `None` when nothing is left.
pub fn strip_frame_ancestors(policy: &str) -> Option<String> {
    let kept: Vec<&str> = policy
        .split(';')
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .filter(|directive| {
            let name = directive.split_whitespace().next().unwrap_or_default();
            !name.eq_ignore_ascii_case("frame-ancestors")
        })
        .collect();

    (!kept.is_empty()).then(|| kept.join("; "))
}

pub fn forwarded_request_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for name in FORWARDED_REQUEST_HEADERS {
        for value in incoming.get_all(*name) {
            if let Ok(header) = HeaderName::from_bytes(name.as_bytes()) {
                out.append(header, value.clone());
            }
        }
    }
    out
}
