//! Payload assembly and pre-send validation
//!
//! Turns a caller-supplied draft plus the stored NAS settings into the wire
//! payload, or refuses with a [`ValidationError`] before anything touches
//! the network.

use crate::models::{DeliveryPayload, NasSettings, SendRequest};
use serde_json::Value;
use thiserror::Error;

/// Substitute title when the caller supplied none
pub const DEFAULT_TITLE: &str = "Untitled";

/// Categories whose downloads are organized per-season on the NAS side
pub const SERIES_CATEGORIES: &[&str] = &["Series", "AnimeSeries"];

/// Fallback category when neither the draft nor the store has one
pub const DEFAULT_CATEGORY: &str = "Movies";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("NAS API URL is missing")]
    MissingUrl,
    #[error("no magnet link in request")]
    MissingMagnet,
    #[error("category {0} requires a season number")]
    MissingSeason(String),
    #[error("season must be a positive number")]
    InvalidSeason,
    #[error("episode must be a number")]
    InvalidEpisode,
}

/// A validated payload together with the endpoint it goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDelivery {
    pub url: String,
    pub payload: DeliveryPayload,
}

pub fn is_series_category(category: &str) -> bool {
    SERIES_CATEGORIES.contains(&category)
}

/// Build the outbound payload from a draft, falling back to stored settings
/// for URL, token and category. Pure; performs no I/O.
pub fn build(draft: &SendRequest, stored: &NasSettings) -> Result<ResolvedDelivery, ValidationError> {
    let url = pick(&draft.nas_url, &stored.nas_url);
    if url.is_empty() {
        return Err(ValidationError::MissingUrl);
    }

    let magnet = draft.magnet_link.trim().to_string();
    if magnet.is_empty() {
        return Err(ValidationError::MissingMagnet);
    }

    let category = {
        let c = pick(&draft.category, &stored.category);
        if c.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            c
        }
    };

    let title = {
        let t = draft.title.trim();
        if t.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            t.to_string()
        }
    };

    let year = draft.year.as_ref().and_then(parse_int::<i32>);

    let (season, episode) = if is_series_category(&category) {
        let season = match &draft.season {
            None => return Err(ValidationError::MissingSeason(category)),
            Some(v) => match parse_int::<u32>(v) {
                Some(n) if n > 0 => n,
                Some(_) => return Err(ValidationError::InvalidSeason),
                None if is_blank(v) => return Err(ValidationError::MissingSeason(category)),
                None => return Err(ValidationError::InvalidSeason),
            },
        };
        let episode = match &draft.episode {
            None => None,
            Some(v) if is_blank(v) => None,
            Some(v) => match parse_int::<u32>(v) {
                Some(n) => Some(n),
                None => return Err(ValidationError::InvalidEpisode),
            },
        };
        (Some(season), episode)
    } else {
        // Non-series categories take whatever parses and drop the rest
        (
            draft.season.as_ref().and_then(parse_int::<u32>),
            draft.episode.as_ref().and_then(parse_int::<u32>),
        )
    };

    let token = {
        let t = pick(&draft.nas_token, &stored.nas_token);
        if t.is_empty() {
            None
        } else {
            Some(t)
        }
    };

    let folder = build_folder(&title, year);

    Ok(ResolvedDelivery {
        url,
        payload: DeliveryPayload {
            magnet,
            title,
            year,
            folder,
            category,
            season,
            episode,
            token,
        },
    })
}

/// `"{title} ({year})"` when a year is known, the bare title otherwise.
pub fn build_folder(title: &str, year: Option<i32>) -> String {
    match year {
        Some(y) => format!("{} ({})", title, y),
        None => title.to_string(),
    }
}

/// Draft value wins when non-empty, stored value otherwise.
fn pick(draft_value: &str, stored_value: &str) -> String {
    let v = draft_value.trim();
    if v.is_empty() {
        stored_value.trim().to_string()
    } else {
        v.to_string()
    }
}

/// Accept integers arriving as JSON numbers or as digit strings.
fn parse_int<T: std::str::FromStr>(value: &Value) -> Option<T> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Null or whitespace-only values count as "not provided"
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_with_and_without_year() {
        assert_eq!(build_folder("Inception", Some(2010)), "Inception (2010)");
        assert_eq!(build_folder("Inception", None), "Inception");
    }

    #[test]
    fn series_categories_recognized() {
        assert!(is_series_category("Series"));
        assert!(is_series_category("AnimeSeries"));
        assert!(!is_series_category("Movies"));
        assert!(!is_series_category("AnimeMovies"));
    }
}
