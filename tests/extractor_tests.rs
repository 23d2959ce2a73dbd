use magnet_courier::extractor::extract;
use magnet_courier::models::MediaType;
use magnet_courier::normalizer::extract_title_and_year;

fn page(head: &str, body: &str) -> String {
    format!("<html><head>{}</head><body>{}</body></html>", head, body)
}

#[test]
fn anchor_magnet_wins_over_data_attributes() {
    let html = page(
        "<title>Some Page</title>",
        r#"<div data-clipboard-text="not a magnet"></div>
           <a href="magnet:?xt=urn:btih:abc123">download</a>"#,
    );
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.magnet_link.as_deref(), Some("magnet:?xt=urn:btih:abc123"));
}

#[test]
fn data_attribute_magnet_found_without_anchor() {
    let html = page(
        "<title>Some Page</title>",
        r#"<button data-clipboard-text="magnet:?xt=urn:btih:def456">copy</button>"#,
    );
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.magnet_link.as_deref(), Some("magnet:?xt=urn:btih:def456"));
}

#[test]
fn magnet_scraped_from_plain_text_as_last_resort() {
    let html = page(
        "<title>Some Page</title>",
        "<p>copy this: magnet:?xt=urn:btih:0011ff&amp;dn=thing into your client</p>",
    );
    let meta = extract(&html, "http://example.com/p");
    let magnet = meta.magnet_link.expect("magnet from text scan");
    assert!(magnet.starts_with("magnet:?xt=urn:btih:0011ff"));
}

#[test]
fn page_without_magnet_yields_absent() {
    let html = page("<title>Nothing here</title>", "<p>plain content</p>");
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.magnet_link, None);
}

#[test]
fn meta_tag_year_beats_title_year() {
    let html = page(
        r#"<title>Old Classic 1999</title>
           <meta itemprop="datePublished" content="2004-06-01">"#,
        "<h1>Old Classic</h1>",
    );
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.year.as_deref(), Some("2004"));
}

#[test]
fn year_from_document_title() {
    let html = page("<title>Inception 2010 BluRay</title>", "<p>x</p>");
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.year.as_deref(), Some("2010"));
}

#[test]
fn year_from_heading_when_title_has_none() {
    let html = page(
        "<title>Watch online</title>",
        "<h1>Arrival (2016)</h1>",
    );
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.year.as_deref(), Some("2016"));
}

#[test]
fn year_from_body_text_as_last_resort() {
    let html = page(
        "<title>Watch online</title>",
        "<div>Released in 2012, this one held up.</div>",
    );
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.year.as_deref(), Some("2012"));
}

#[test]
fn script_text_is_not_scanned_for_years() {
    let html = page(
        "<title>Watch online</title>",
        "<script>var since = 1997;</script><p>no dates in sight</p>",
    );
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.year, None);
}

#[test]
fn derived_title_strips_year_and_brackets() {
    let html = page("<title>ignored</title>", "<h1>Arrival [2016]</h1>");
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.raw_title, "Arrival [2016]");
    assert_eq!(meta.title, "Arrival");
}

#[test]
fn year_only_heading_falls_through_to_document_title() {
    // A heading that cleans down to nothing must not shadow a usable title
    let html = page(
        "<title>Arrival 2016 Stream</title>",
        "<h1>[2016]</h1>",
    );
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.title, "Arrival Stream");
    assert_eq!(meta.raw_title, "Arrival 2016 Stream");
}

#[test]
fn no_usable_candidate_leaves_title_empty() {
    let html = page("<title>(2016)</title>", "<h1>[2016]</h1>");
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.title, "");
    assert_eq!(meta.raw_title, "[2016]");
}

#[test]
fn heading_preferred_over_document_title() {
    let html = page(
        "<title>Super Streaming Site</title>",
        "<h1>The Movie</h1>",
    );
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.raw_title, "The Movie");
}

#[test]
fn season_episode_from_release_name() {
    let html = page("<title>Show.Name.S02E05.1080p</title>", "<p>x</p>");
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.season, Some(2));
    assert_eq!(meta.episode, Some(5));
    assert_eq!(meta.type_guess, MediaType::Series);
}

#[test]
fn season_episode_from_page_url() {
    let html = page("<title>Episode page</title>", "<p>x</p>");
    let meta = extract(&html, "http://example.com/show/s03e11-stream");
    assert_eq!(meta.season, Some(3));
    assert_eq!(meta.episode, Some(11));
}

#[test]
fn season_markers_classify_as_series() {
    for body in ["<h1>Show Season 3</h1>", "<h1>Serie Staffel 2</h1>", "<h1>Show 4x08</h1>"] {
        let html = page("<title>t</title>", body);
        let meta = extract(&html, "http://example.com/p");
        assert_eq!(meta.type_guess, MediaType::Series, "body: {}", body);
    }
}

#[test]
fn plain_movie_page_guessed_as_movie() {
    let html = page("<title>Inception 2010</title>", "<h1>Inception</h1>");
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.type_guess, MediaType::Movie);
}

#[test]
fn empty_page_degrades_to_absent_fields() {
    let meta = extract("", "");
    assert_eq!(meta.magnet_link, None);
    assert_eq!(meta.year, None);
    assert_eq!(meta.season, None);
    assert_eq!(meta.episode, None);
    assert_eq!(meta.raw_title, "");
    assert_eq!(meta.title, "");
    assert_eq!(meta.type_guess, MediaType::Movie);
}

#[test]
fn release_name_page_end_to_end() {
    // Extraction plus normalization of the raw title, as the UI does it
    let html = page("<title>Movie.Title.2021.1080p.WEB</title>", "<p>x</p>");
    let meta = extract(&html, "http://example.com/p");
    assert_eq!(meta.year.as_deref(), Some("2021"));

    let cleaned = extract_title_and_year(&meta.raw_title, meta.year.as_deref());
    assert_eq!(cleaned.title, "Movie Title");
    assert_eq!(cleaned.year.as_deref(), Some("2021"));
}
