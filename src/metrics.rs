/// Delivery metrics per NAS endpoint
///
/// Tracks attempt counts, fallback usage and response times so the
/// `/metrics` route can report how reliable each configured endpoint is.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct EndpointMetrics {
    pub endpoint: String,
    pub total_attempts: u64,
    pub delivered: u64,
    pub failed: u64,
    /// Deliveries that only went through via the opaque fallback
    pub fallback_deliveries: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub average_response_time_ms: f64,
    total_response_time_ms: u64,
}

impl EndpointMetrics {
    fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            total_attempts: 0,
            delivered: 0,
            failed: 0,
            fallback_deliveries: 0,
            last_success: None,
            last_failure: None,
            last_error: None,
            average_response_time_ms: 0.0,
            total_response_time_ms: 0,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_attempts == 0 {
            0.0
        } else {
            (self.delivered as f64 / self.total_attempts as f64) * 100.0
        }
    }

    fn record_success(&mut self, response_time: Duration, fallback: bool) {
        self.total_attempts += 1;
        self.delivered += 1;
        if fallback {
            self.fallback_deliveries += 1;
        }
        self.last_success = Some(Utc::now());
        self.total_response_time_ms += response_time.as_millis() as u64;
        self.average_response_time_ms =
            self.total_response_time_ms as f64 / self.delivered as f64;
    }

    fn record_failure(&mut self, error: &str) {
        self.total_attempts += 1;
        self.failed += 1;
        self.last_failure = Some(Utc::now());
        self.last_error = Some(error.to_string());
    }
}

/// Thread-safe tracker shared across request handlers
#[derive(Clone, Default)]
pub struct MetricsTracker {
    inner: Arc<Mutex<HashMap<String, EndpointMetrics>>>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, endpoint: &str, response_time: Duration, fallback: bool) {
        let mut map = self.inner.lock().unwrap();
        map.entry(endpoint.to_string())
            .or_insert_with(|| EndpointMetrics::new(endpoint.to_string()))
            .record_success(response_time, fallback);
    }

    pub fn record_failure(&self, endpoint: &str, error: &str) {
        let mut map = self.inner.lock().unwrap();
        map.entry(endpoint.to_string())
            .or_insert_with(|| EndpointMetrics::new(endpoint.to_string()))
            .record_failure(error);
    }

    pub fn get_metrics(&self, endpoint: &str) -> Option<EndpointMetrics> {
        self.inner.lock().unwrap().get(endpoint).cloned()
    }

    pub fn all_metrics(&self) -> Vec<EndpointMetrics> {
        let mut all: Vec<_> = self.inner.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
        all
    }
}
