//! Best-effort field extraction from captured page HTML
//!
//! Every field is located by an ordered list of candidate strategies; the
//! first strategy that yields a non-empty value wins and the rest are
//! skipped. Nothing in here fails: a page without usable data produces a
//! record with absent fields.

use crate::models::{ExtractedMetadata, MediaType};
use regex::Regex;
use scraper::{Html, Selector};

/// Meta tags checked for a release year, highest priority first
const YEAR_META_SELECTORS: &[&str] = &[
    r#"meta[itemprop="datePublished"]"#,
    r#"meta[itemprop="dateCreated"]"#,
    r#"meta[name="date"]"#,
    r#"meta[property="og:release_date"]"#,
    r#"meta[property="video:release_date"]"#,
];

/// Heading-like elements used for year, title and season/episode scans
const HEADING_SELECTORS: &[&str] = &["h1", "h2", ".title", "[data-title]"];

/// Attributes that sites stash magnet links in when there is no anchor
const MAGNET_DATA_ATTRS: &[&str] = &["data-clipboard-text", "data-magnet", "data-url", "data-href"];

/// How much leading body text the year scan is willing to look at
const BODY_SCAN_LIMIT: usize = 8000;

fn year_regex() -> Regex {
    Regex::new(r"\b(19|20)\d{2}\b").unwrap()
}

/// Extract all supported fields from one page.
pub fn extract(html: &str, page_url: &str) -> ExtractedMetadata {
    let doc = Html::parse_document(html);

    let magnet_link = find_magnet(&doc);
    let year = find_year(&doc);
    let (raw_title, title) = pick_title(&doc);
    let (season, episode) = find_season_episode(&doc, page_url);
    let type_guess = guess_type(&raw_title, page_url);

    ExtractedMetadata {
        magnet_link,
        raw_title,
        title,
        year,
        season,
        episode,
        type_guess,
    }
}

/// Locate a magnet link: anchors first, then data attributes, then raw text.
pub fn find_magnet(doc: &Html) -> Option<String> {
    let anchor_sel = Selector::parse(r#"a[href^="magnet:?"], a[href*="magnet:?"]"#).unwrap();
    if let Some(a) = doc.select(&anchor_sel).next() {
        if let Some(href) = a.value().attr("href") {
            if !href.is_empty() {
                return Some(href.to_string());
            }
        }
    }

    let attr_sel = Selector::parse(
        "[data-clipboard-text], [data-magnet], [data-url], [data-href]",
    )
    .unwrap();
    for el in doc.select(&attr_sel) {
        for key in MAGNET_DATA_ATTRS {
            if let Some(v) = el.value().attr(key) {
                if v.to_lowercase().starts_with("magnet:?") {
                    return Some(v.to_string());
                }
            }
        }
    }

    let magnet_re = Regex::new(r#"(?i)magnet:\?[^"'\s<>]+"#).unwrap();
    magnet_re
        .find(&body_text(doc))
        .map(|m| m.as_str().to_string())
}

/// Locate a 4-digit release year, most trustworthy source first.
pub fn find_year(doc: &Html) -> Option<String> {
    let year_re = year_regex();

    for sel in YEAR_META_SELECTORS {
        let selector = Selector::parse(sel).unwrap();
        if let Some(meta) = doc.select(&selector).next() {
            if let Some(content) = meta.value().attr("content") {
                if let Some(m) = year_re.find(content) {
                    return Some(m.as_str().to_string());
                }
            }
        }
    }

    if let Some(m) = year_re.find(&document_title(doc)) {
        return Some(m.as_str().to_string());
    }

    if let Some(m) = year_re.find(&text_from_selectors(doc, HEADING_SELECTORS)) {
        return Some(m.as_str().to_string());
    }

    let snippet: String = body_text(doc).chars().take(BODY_SCAN_LIMIT).collect();
    year_re.find(&snippet).map(|m| m.as_str().to_string())
}

/// Pick the title: first candidate whose *cleaned* form is non-empty wins,
/// so a year-only heading falls through to the document title. Returns the
/// winning raw candidate alongside its derivation.
fn pick_title(doc: &Html) -> (String, String) {
    let candidates = [
        text_from_selectors(doc, HEADING_SELECTORS),
        document_title(doc),
    ];

    for candidate in &candidates {
        let cleaned = derive_title(candidate);
        if !cleaned.is_empty() {
            return (candidate.clone(), cleaned);
        }
    }

    let raw = candidates
        .into_iter()
        .find(|c| !c.is_empty())
        .unwrap_or_default();
    (raw, String::new())
}

/// Strip the first year token and all bracket characters from a candidate.
fn derive_title(raw: &str) -> String {
    let stripped = year_regex().replace(raw, "");
    let cleaned: String = stripped
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '[' | ']'))
        .collect();
    let whitespace = Regex::new(r"\s+").unwrap();
    whitespace.replace_all(&cleaned, " ").trim().to_string()
}

/// Scan title, URL and headings for an SxxEyy marker.
pub fn find_season_episode(doc: &Html, page_url: &str) -> (Option<u32>, Option<u32>) {
    let se_re = Regex::new(r"(?i)\bS(\d{1,2})E(\d{1,2})\b").unwrap();
    let candidates = [
        document_title(doc),
        page_url.to_string(),
        text_from_selectors(doc, HEADING_SELECTORS),
    ];

    for candidate in &candidates {
        if let Some(caps) = se_re.captures(candidate) {
            let season = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let episode = caps.get(2).and_then(|m| m.as_str().parse().ok());
            return (season, episode);
        }
    }
    (None, None)
}

/// Classify as series when the title or URL carries an episode-ish marker.
pub fn guess_type(raw_title: &str, page_url: &str) -> MediaType {
    let haystack = format!("{} {}", raw_title, page_url).to_lowercase();
    let patterns = [
        r"\bs\d{1,2}e\d{1,2}\b",
        r"\b\d{1,2}x\d{1,2}\b",
        r"\bseason\s*\d+\b",
        r"\bstaffel\s*\d+\b",
    ];
    for p in &patterns {
        if Regex::new(p).unwrap().is_match(&haystack) {
            return MediaType::Series;
        }
    }
    MediaType::Movie
}

fn document_title(doc: &Html) -> String {
    let sel = Selector::parse("title").unwrap();
    doc.select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// First non-empty text content among the given selectors, in order.
fn text_from_selectors(doc: &Html, selectors: &[&str]) -> String {
    for sel in selectors {
        let selector = Selector::parse(sel).unwrap();
        if let Some(el) = doc.select(&selector).next() {
            let text = el.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

/// Visible-ish body text: all text nodes outside script and style tags.
fn body_text(doc: &Html) -> String {
    let body_sel = Selector::parse("body").unwrap();
    let Some(body) = doc.select(&body_sel).next() else {
        return String::new();
    };

    let mut out = String::new();
    for node in body.descendants() {
        if let Some(text) = node.value().as_text() {
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .map(|e| matches!(e.name(), "script" | "style"))
                    .unwrap_or(false)
            });
            if !hidden {
                out.push_str(text);
                out.push(' ');
            }
        }
    }
    out
}
