//! Delivery of a payload to the NAS intake endpoint
//!
//! One logical attempt per call: a primary POST whose response is read and
//! interpreted, and on transport-level failure (connection refused, DNS,
//! timeout) exactly one fallback POST over an opaque transport that cannot
//! report the response. HTTP error statuses are remote answers, not
//! transport failures, and never trigger the fallback. Nothing in here
//! returns an `Err`; every outcome is folded into a [`DeliveryResult`].

use crate::models::{DeliveryPayload, DeliveryResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Placeholder message for empty 2xx responses
const EMPTY_SUCCESS_MESSAGE: &str = "Request succeeded";

/// Which header carries the NAS token
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    #[default]
    Bearer,
    XAuthToken,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Readable response from the primary transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Seam between delivery logic and the actual HTTP stack, so tests can
/// simulate cross-origin-style transport failures.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// POST and read back status + body.
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
    ) -> Result<TransportResponse, TransportError>;

    /// POST without inspecting the response: succeeds or fails at the
    /// network level only.
    async fn post_opaque(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
    ) -> Result<(), TransportError>;
}

impl<T: Transport> Transport for &T {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
    ) -> Result<TransportResponse, TransportError> {
        (*self).post(url, headers, body).await
    }

    async fn post_opaque(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
    ) -> Result<(), TransportError> {
        (*self).post_opaque(url, headers, body).await
    }
}

/// Transport backed by a shared `reqwest` client
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
    ) -> Result<reqwest::Response, TransportError> {
        let mut req = self.client.post(url);
        for (name, value) in headers {
            req = req.header(name.as_str(), value.as_str());
        }
        req.body(body.to_string())
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))
    }
}

impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
    ) -> Result<TransportResponse, TransportError> {
        let resp = self.send(url, headers, body).await?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(TransportResponse { status, body })
    }

    async fn post_opaque(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
    ) -> Result<(), TransportError> {
        // Response intentionally dropped unread
        self.send(url, headers, body).await.map(|_| ())
    }
}

pub struct DeliveryClient<T: Transport> {
    transport: T,
    auth: AuthScheme,
}

impl DeliveryClient<HttpTransport> {
    pub fn new(timeout: Duration, auth: AuthScheme) -> Result<Self, reqwest::Error> {
        Ok(Self {
            transport: HttpTransport::new(timeout)?,
            auth,
        })
    }
}

impl<T: Transport> DeliveryClient<T> {
    pub fn with_transport(transport: T, auth: AuthScheme) -> Self {
        Self { transport, auth }
    }

    /// Perform one delivery. Duplicate calls race freely; de-duplication is
    /// the caller's business.
    pub async fn deliver(&self, url: &str, payload: &DeliveryPayload) -> DeliveryResult {
        let body = match serde_json::to_string(payload) {
            Ok(b) => b,
            Err(e) => return DeliveryResult::failure(format!("payload serialization failed: {}", e)),
        };
        let headers = self.build_headers(payload.token.as_deref());

        match self.transport.post(url, &headers, &body).await {
            Ok(resp) => interpret_response(resp),
            Err(primary_err) => {
                log::warn!(
                    "Primary delivery to {} failed ({}), retrying via opaque transport",
                    url,
                    primary_err
                );
                match self.transport.post_opaque(url, &headers, &body).await {
                    Ok(()) => DeliveryResult::unconfirmed_success(),
                    Err(fallback_err) => DeliveryResult::failure(format!(
                        "{} (fallback: {})",
                        primary_err, fallback_err
                    )),
                }
            }
        }
    }

    fn build_headers(&self, token: Option<&str>) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            match self.auth {
                AuthScheme::Bearer => headers.push((
                    "Authorization".to_string(),
                    format!("Bearer {}", token),
                )),
                AuthScheme::XAuthToken => {
                    headers.push(("X-Auth-Token".to_string(), token.to_string()))
                }
            }
        }
        headers
    }
}

/// Normalize a readable NAS response into the uniform result shape.
fn interpret_response(resp: TransportResponse) -> DeliveryResult {
    let parsed: Option<Value> = serde_json::from_str(&resp.body).ok();

    if (200..300).contains(&resp.status) {
        let result = parsed.unwrap_or_else(|| {
            let message = if resp.body.is_empty() {
                EMPTY_SUCCESS_MESSAGE.to_string()
            } else {
                resp.body.clone()
            };
            json!({ "message": message })
        });
        return DeliveryResult::success(resp.status, result);
    }

    let error = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            if resp.body.is_empty() {
                None
            } else {
                Some(resp.body.clone())
            }
        })
        .unwrap_or_else(|| format!("NAS responded with status {}", resp.status));
    DeliveryResult::remote_failure(resp.status, error)
}
