// Display settings and the persisted signage configuration
use super::dashboard::{Credentials, Dashboard};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_ROTATION_INTERVAL_SECS: i64 = 30;
pub const DEFAULT_REFRESH_INTERVAL_SECS: i64 = 300;

/// Stands in for a stored password in anything sent to a browser.
pub const MASKED_PASSWORD: &str = "********";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_rotation_interval")]
    pub rotation_interval: i64,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: i64,
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
    #[serde(default = "default_true")]
    pub fullscreen: bool,
    #[serde(default = "default_true")]
    pub show_navigation: bool,
    #[serde(default = "default_true")]
    pub enable_keyboard_shortcuts: bool,
    /// Keys written by the configuration form that the display does not use.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_rotation_interval() -> i64 {
    DEFAULT_ROTATION_INTERVAL_SECS
}

fn default_refresh_interval() -> i64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

fn default_true() -> bool {
    true
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            rotation_interval: DEFAULT_ROTATION_INTERVAL_SECS,
            refresh_interval: DEFAULT_REFRESH_INTERVAL_SECS,
            auto_refresh: true,
            fullscreen: true,
            show_navigation: true,
            enable_keyboard_shortcuts: true,
            extra: serde_json::Map::new(),
        }
    }
}

impl DisplaySettings {
    /// Replace non-positive intervals with their defaults.
    pub fn coerce(mut self) -> Self {
        if self.rotation_interval < 1 {
            tracing::warn!(
                "rotation_interval {} is not positive, using {}",
                self.rotation_interval,
                DEFAULT_ROTATION_INTERVAL_SECS
            );
            self.rotation_interval = DEFAULT_ROTATION_INTERVAL_SECS;
        }
        if self.refresh_interval < 1 {
            tracing::warn!(
                "refresh_interval {} is not positive, using {}",
                self.refresh_interval,
                DEFAULT_REFRESH_INTERVAL_SECS
            );
            self.refresh_interval = DEFAULT_REFRESH_INTERVAL_SECS;
        }
        self
    }

    pub fn rotation_period(&self) -> Duration {
        Duration::from_secs(self.rotation_interval.max(1).unsigned_abs())
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_interval.max(1).unsigned_abs())
    }
}

/// Everything the credential store persists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignageConfig {
    #[serde(default)]
    pub dashboards: Vec<Dashboard>,
    #[serde(default)]
    pub settings: DisplaySettings,
}

impl SignageConfig {
    pub fn new(dashboards: Vec<Dashboard>, settings: DisplaySettings) -> Self {
        Self {
            dashboards,
            settings,
        }
    }

    pub fn coerce(mut self) -> Self {
        self.settings = self.settings.coerce();
        self
    }

    /// Checks applied before a save is accepted.
    pub fn validate(&self) -> Result<(), String> {
        if self.dashboards.is_empty() {
            return Err("At least one dashboard is required".to_string());
        }
        for (position, dashboard) in self.dashboards.iter().enumerate() {
            if dashboard.enabled
                && (dashboard.name.trim().is_empty() || dashboard.url.trim().is_empty())
            {
                return Err(format!(
                    "Dashboard #{} is enabled but has no name or url",
                    position + 1
                ));
            }
        }
        if self.settings.rotation_interval < 1 {
            return Err("rotation_interval must be at least 1 second".to_string());
        }
        if self.settings.refresh_interval < 1 {
            return Err("refresh_interval must be at least 1 second".to_string());
        }
        Ok(())
    }

    /// Dashboards eligible for rotation, in stored order.
    pub fn active_dashboards(&self) -> Vec<Dashboard> {
        self.dashboards
            .iter()
            .filter(|d| d.is_active())
            .cloned()
            .collect()
    }

    /// Copy with every stored password replaced by `MASKED_PASSWORD`.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        for dashboard in &mut copy.dashboards {
            if dashboard.password.as_deref().is_some_and(|p| !p.is_empty()) {
                dashboard.password = Some(MASKED_PASSWORD.to_string());
            }
        }
        copy
    }

    /// Put back passwords the browser only saw masked. Matches on id first,
    /// then on url.
    pub fn unmask(mut self, stored: &SignageConfig) -> Self {
        for dashboard in &mut self.dashboards {
            if dashboard.password.as_deref() != Some(MASKED_PASSWORD) {
                continue;
            }
            let id = dashboard.id();
            dashboard.password = stored
                .dashboards
                .iter()
                .find(|d| d.id() == id)
                .or_else(|| stored.dashboards.iter().find(|d| d.url == dashboard.url))
                .and_then(|d| d.password.clone());
        }
        self
    }

    pub fn find_dashboard(&self, id: &str) -> Option<&Dashboard> {
        self.dashboards.iter().find(|d| d.id() == id)
    }

    /// Credentials of the first stored dashboard served from the same origin.
    pub fn credentials_for_origin(&self, target: &Url) -> Option<Credentials> {
        self.dashboards.iter().find_map(|d| d.credentials_for(target))
    }
}
