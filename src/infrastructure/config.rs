use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) DashboardSignage/0.1";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub proxy: ProxySettings,
    pub tester: TesterSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreSettings {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProxySettings {
    /// Upper bound on waiting for upstream response headers.
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TesterSettings {
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.server.host, self.server.port))
    }

    pub fn proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy.timeout_secs.max(1))
    }

    pub fn tester_timeout(&self) -> Duration {
        Duration::from_secs(self.tester.timeout_secs.max(1))
    }
}

/// Defaults, then `config/signage.*` if present, then `SIGNAGE__*` variables.
pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    load_server_config_from("config/signage")
}

pub fn load_server_config_from(file: &str) -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("store.path", "config.json")?
        .set_default("proxy.timeout_secs", 15)?
        .set_default("proxy.user_agent", DEFAULT_USER_AGENT)?
        .set_default("tester.timeout_secs", 5)?
        .add_source(config::File::with_name(file).required(false))
        .add_source(config::Environment::with_prefix("SIGNAGE").separator("__"))
        .build()
        .context("Failed to read server configuration")?;

    Ok(settings.try_deserialize()?)
}
