use crate::delivery::AuthScheme;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Interface the courier API binds to
    #[serde(default = "default_bind_host")]
    pub bind_host: String,

    /// First port to try; the next ten are probed when it is taken
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite file holding the persisted NAS settings
    #[serde(default = "default_settings_db")]
    pub settings_db: String,

    #[serde(default)]
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryConfig {
    /// Timeout for one delivery attempt in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Header the NAS token is sent in ("bearer" or "x-auth-token")
    #[serde(default)]
    pub auth_scheme: AuthScheme,
}

fn default_bind_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8787
}
fn default_settings_db() -> String {
    "courier.db".to_string()
}
fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            port: default_port(),
            settings_db: default_settings_db(),
            delivery: DeliveryConfig::default(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            auth_scheme: AuthScheme::default(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(cfg) = toml::from_str::<Config>(&content) {
                    return cfg;
                }
            }
        }
        Self::default()
    }
}
