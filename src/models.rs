use serde::{Deserialize, Serialize};

/// Rough media classification derived from page text heuristics
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
}

/// Everything the extractor could pull out of one captured page.
///
/// All fields are best-effort; whatever could not be found stays absent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMetadata {
    pub magnet_link: Option<String>,
    /// Untouched title candidate (heading or document title), for the normalizer
    pub raw_title: String,
    /// Title candidate with the year and bracket characters stripped
    pub title: String,
    pub year: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub type_guess: MediaType,
}

/// Result of splitting a raw title into display title + release year
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct NormalizedTitle {
    pub title: String,
    pub year: Option<String>,
}

/// Body of a `POST /collect` request: one captured page
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CollectRequest {
    pub html: String,
    #[serde(default)]
    pub page_url: String,
}

/// Payload draft as submitted by the caller of `POST /send`.
///
/// Year, season and episode arrive as free-form values (text inputs on the
/// caller side), so they are accepted as JSON strings or numbers and parsed
/// during payload building.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<serde_json::Value>,
    #[serde(default)]
    pub magnet_link: String,
    #[serde(default)]
    pub nas_url: String,
    #[serde(default)]
    pub nas_token: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub season: Option<serde_json::Value>,
    #[serde(default)]
    pub episode: Option<serde_json::Value>,
}

/// Wire payload for the NAS intake endpoint.
///
/// The token rides in a request header, never in the body, which is why it
/// is skipped during serialization.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DeliveryPayload {
    pub magnet: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub folder: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

/// Uniform outcome of one delivery attempt (fallback included)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeliveryResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the fallback transport was used: the request went out but the
    /// response could not be inspected, so acceptance is unconfirmed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unconfirmed: bool,
}

impl DeliveryResult {
    pub fn success(status: u16, result: serde_json::Value) -> Self {
        Self {
            ok: true,
            status: Some(status),
            result: Some(result),
            error: None,
            unconfirmed: false,
        }
    }

    /// Fallback transport went through but the response is opaque
    pub fn unconfirmed_success() -> Self {
        Self {
            ok: true,
            status: None,
            result: None,
            error: None,
            unconfirmed: true,
        }
    }

    pub fn remote_failure(status: u16, error: String) -> Self {
        Self {
            ok: false,
            status: Some(status),
            result: None,
            error: Some(error),
            unconfirmed: false,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            ok: false,
            status: None,
            result: None,
            error: Some(error),
            unconfirmed: false,
        }
    }
}

/// Persisted collaborator values, read before every payload build
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NasSettings {
    pub nas_url: String,
    pub nas_token: String,
    pub category: String,
}
