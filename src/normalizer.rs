//! Title cleanup: split a raw release string into display title + year
//!
//! # Examples
//!
//! ```
//! use magnet_courier::normalizer::extract_title_and_year;
//!
//! let cleaned = extract_title_and_year("Movie.Title.2021.1080p.WEB", None);
//! assert_eq!(cleaned.title, "Movie Title");
//! assert_eq!(cleaned.year.as_deref(), Some("2021"));
//! ```

use crate::models::NormalizedTitle;
use regex::Regex;

/// Split a raw title string into a cleaned display title and a release year.
///
/// The first 4-digit year (1900-2099) becomes the year and everything from
/// it onward is dropped from the title. Without a year in the string the
/// supplied fallback is used and the full string is kept. Separator runs
/// (`.`, `_`, `-`) become single spaces and the result is title-cased.
pub fn extract_title_and_year(raw: &str, fallback_year: Option<&str>) -> NormalizedTitle {
    let s = raw.trim();
    if s.is_empty() {
        return NormalizedTitle {
            title: String::new(),
            year: fallback_year.map(str::to_string),
        };
    }

    let year_re = Regex::new(r"\b(19|20)\d{2}\b").unwrap();
    let (title_part, year) = match year_re.find(s) {
        Some(m) => (&s[..m.start()], Some(m.as_str().to_string())),
        None => (s, fallback_year.map(str::to_string)),
    };

    let separators = Regex::new(r"[._-]+").unwrap();
    let cleaned = separators.replace_all(title_part, " ");
    let whitespace = Regex::new(r"\s+").unwrap();
    let cleaned = whitespace.replace_all(&cleaned, " ");

    NormalizedTitle {
        title: title_case(cleaned.trim()),
        year,
    }
}

/// Uppercase the first letter at every word boundary.
///
/// Interior characters keep their case, so existing uppercase runs survive
/// ("WEB" stays "WEB"). This mirrors the historical behavior downstream
/// folder names rely on.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_word = false;
    for c in s.chars() {
        if !prev_is_word && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = c.is_alphanumeric() || c == '_';
    }
    out
}
