// Status page aggregation models (Uptime Kuma)
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub name: String,
    pub status: ServiceState,
    pub uptime: String,
    #[serde(rename = "responseTime")]
    pub response_time: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub error: bool,
    pub message: String,
    pub services: Vec<ServiceStatus>,
    pub overall_status: String,
    pub total_services: usize,
}

impl StatusReport {
    pub fn from_services(message: impl Into<String>, services: Vec<ServiceStatus>) -> Self {
        let overall_status = overall_status(&services).to_string();
        Self {
            error: false,
            message: message.into(),
            total_services: services.len(),
            services,
            overall_status,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            services: Vec::new(),
            overall_status: "Data Error".to_string(),
            total_services: 0,
        }
    }

    /// Connected, but none of the known endpoints returned monitor data.
    pub fn no_data(base_url: &str) -> Self {
        let probe = ServiceStatus {
            name: "Connection Test".to_string(),
            status: ServiceState::Down,
            uptime: "0%".to_string(),
            response_time: "N/A".to_string(),
            url: base_url.to_string(),
        };
        Self {
            error: false,
            message: "Connected to UptimeKuma but no data available".to_string(),
            services: vec![probe],
            overall_status: "Issues Detected".to_string(),
            total_services: 1,
        }
    }
}

fn overall_status(services: &[ServiceStatus]) -> &'static str {
    let up = services
        .iter()
        .filter(|s| s.status == ServiceState::Up)
        .count();
    if up == services.len() {
        "All Systems Operational"
    } else if up > 0 {
        "Partial System Outage"
    } else {
        "Major System Outage"
    }
}

/// Normalize whatever JSON shape an Uptime Kuma endpoint returned.
pub fn summarize_monitors(raw: &Value, base_url: &str) -> StatusReport {
    let monitors: Vec<&Value> = match raw {
        Value::Object(map) => {
            let listed = ["monitors", "data"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_array))
                .find(|list| !list.is_empty());
            match listed {
                Some(list) => list.iter().collect(),
                None => vec![raw],
            }
        }
        Value::Array(list) => list.iter().collect(),
        _ => Vec::new(),
    };

    let mut services: Vec<ServiceStatus> = monitors
        .into_iter()
        .filter_map(|m| m.as_object().map(|_| monitor_status(m, base_url)))
        .collect();

    if services.is_empty() {
        services.push(ServiceStatus {
            name: "UptimeKuma Instance".to_string(),
            status: ServiceState::Up,
            uptime: "100%".to_string(),
            response_time: "<100ms".to_string(),
            url: base_url.to_string(),
        });
    }

    StatusReport::from_services("Data fetched successfully", services)
}

fn monitor_status(monitor: &Value, base_url: &str) -> ServiceStatus {
    let text = |keys: &[&str]| {
        keys.iter()
            .filter_map(|k| monitor.get(*k))
            .find_map(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    };

    let status = match monitor.get("status").and_then(Value::as_i64) {
        Some(1) => ServiceState::Up,
        Some(_) => ServiceState::Down,
        None => {
            if monitor.get("active").and_then(Value::as_bool).unwrap_or(true) {
                ServiceState::Up
            } else {
                ServiceState::Down
            }
        }
    };

    ServiceStatus {
        name: text(&["name", "friendly_name"]).unwrap_or_else(|| "Unknown Service".to_string()),
        status,
        uptime: format!("{}%", text(&["uptime", "uptime_24h"]).unwrap_or_else(|| "0".to_string())),
        response_time: text(&["avg_ping", "response_time"])
            .map(|ms| format!("{ms}ms"))
            .unwrap_or_else(|| "N/A".to_string()),
        url: text(&["url", "hostname"]).unwrap_or_else(|| base_url.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_monitor_list() {
        let raw = json!({
            "monitors": [
                {"name": "Website", "status": 1, "uptime": 99.9, "avg_ping": 145, "url": "https://example.com"},
                {"friendly_name": "Database", "status": 0, "uptime_24h": 50}
            ]
        });
        let report = summarize_monitors(&raw, "http://kuma:3001");

        assert!(!report.error);
        assert_eq!(report.total_services, 2);
        assert_eq!(report.services[0].uptime, "99.9%");
        assert_eq!(report.services[0].response_time, "145ms");
        assert_eq!(report.services[1].name, "Database");
        assert_eq!(report.services[1].status, ServiceState::Down);
        assert_eq!(report.services[1].response_time, "N/A");
        assert_eq!(report.services[1].url, "http://kuma:3001");
        assert_eq!(report.overall_status, "Partial System Outage");
    }

    #[test]
    fn test_single_monitor_object() {
        let raw = json!({"name": "API", "active": true});
        let report = summarize_monitors(&raw, "http://kuma");

        assert_eq!(report.services.len(), 1);
        assert_eq!(report.services[0].name, "API");
        assert_eq!(report.overall_status, "All Systems Operational");
    }

    #[test]
    fn test_unusable_payload_reports_instance() {
        let report = summarize_monitors(&json!("ok"), "http://kuma");
        assert_eq!(report.services[0].name, "UptimeKuma Instance");
    }

    #[test]
    fn test_all_down() {
        let raw = json!({"data": [{"name": "a", "status": 0}, {"name": "b", "active": false}]});
        let report = summarize_monitors(&raw, "http://kuma");
        assert_eq!(report.overall_status, "Major System Outage");
    }
}
