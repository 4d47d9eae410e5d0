// Dashboard domain model
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardKind {
    #[serde(rename = "uptimekuma")]
    UptimeKuma,
    Grafana,
    #[default]
    #[serde(other)]
    Generic,
}

/// A remote monitoring page as stored in the signage configuration file.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: DashboardKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("kind", &self.kind)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Dashboard {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind: DashboardKind::Generic,
            username: None,
            password: None,
            enabled: true,
        }
    }

    pub fn with_kind(mut self, kind: DashboardKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Session-stable identifier derived from name and url.
    pub fn id(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.name.hash(&mut hasher);
        self.url.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Enabled and has both a name and a url.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.name.trim().is_empty() && !self.url.trim().is_empty()
    }

    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.username.as_deref(), self.password.as_deref())
    }

    /// Credentials, but only for a target on this dashboard's own origin.
    pub fn credentials_for(&self, target: &Url) -> Option<Credentials> {
        let own = Url::parse(self.url.trim()).ok()?;
        if own.origin() != target.origin() {
            return None;
        }
        self.credentials()
    }
}

/// Basic-Auth credentials injected by the gateway. The password stays wrapped
/// so it never reaches a `Debug` or log line.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Both parts must be non-empty, otherwise no auth is injected.
    pub fn from_parts(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some(Self {
                username: u.to_string(),
                password: SecretString::from(p.to_string()),
            }),
            _ => None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
