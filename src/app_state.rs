//! Shared state for the Actix-web handlers
//!
//! Wrapped in `web::Data`; mutable pieces sit behind a `Mutex`.

use crate::config::Config;
use crate::delivery::{DeliveryClient, HttpTransport};
use crate::metrics::MetricsTracker;
use crate::settings::SettingsStore;
use std::sync::Mutex;

pub struct AppState {
    /// Persisted NAS settings (SQLite connections are not Sync)
    pub settings: Mutex<SettingsStore>,
    /// Shared delivery client; one reqwest pool for all sends
    pub delivery: DeliveryClient<HttpTransport>,
    pub metrics: MetricsTracker,
    pub config: Config,
}
