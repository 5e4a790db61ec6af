//! HTML rendering for the watchlist container
//!
//! Produces the markup the page swaps into `#watchlist-container`: a dated
//! heading, the narrative grouped into short paragraphs, and the source list.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::loader::Outcome;
use crate::record::WatchlistRecord;

/// Shown when the query returns no rows
pub const NO_DATA_HTML: &str = "<p>No watchlist data available for the UK.</p>";

/// Shown for any engine or fetch failure
pub const ERROR_HTML: &str =
    "<p>An error occurred while fetching the watchlist data. Please try again later.</p>";

/// Display string for dates that cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

/// Sentences per paragraph
const SENTENCES_PER_PARAGRAPH: usize = 3;

/// Render the container markup for one outcome
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success(record) => render_record(record),
        Outcome::Empty => NO_DATA_HTML.to_string(),
        Outcome::Failure => ERROR_HTML.to_string(),
    }
}

/// Render a found record
pub fn render_record(record: &WatchlistRecord) -> String {
    let date = format_long_date(&record.date_added);
    let body = format_paragraphs(&record.watchlist);

    let mut sources = String::new();
    for url in record.sources() {
        let url = escape_html(&url);
        let _ = write!(sources, r#"<li><a href="{url}" target="_blank">{url}</a></li>"#);
    }

    format!(
        r#"<h2>{country} Watchlist for {date}</h2>
<div class="watchlist-content">{body}</div>
<h3>Sources</h3>
<ul class="sources-list">{sources}</ul>"#,
        country = escape_html(&record.country),
        date = escape_html(&date),
    )
}

/// Long en-GB date such as `Monday 15 January 2024`.
/// Unparseable input yields [`INVALID_DATE`].
pub fn format_long_date(raw: &str) -> String {
    parse_date(raw.trim()).map_or_else(
        || INVALID_DATE.to_string(),
        |d| d.format("%A %-d %B %Y").to_string(),
    )
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

/// Split after `.`, `!` or `?` when whitespace follows. The whitespace is
/// dropped; abbreviations are not special-cased.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();
        let mut next_start = end;
        while let Some(&(j, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            next_start = j + w.len_utf8();
            chars.next();
        }
        if next_start > end {
            sentences.push(&text[start..end]);
            start = next_start;
        }
    }

    sentences.push(&text[start..]);
    sentences.retain(|s| !s.is_empty());
    sentences
}

/// Group sentences three at a time into `<p>` elements
pub fn format_paragraphs(text: &str) -> String {
    split_sentences(text)
        .chunks(SENTENCES_PER_PARAGRAPH)
        .map(|group| format!("<p>{}</p>", escape_html(&group.join(" "))))
        .collect()
}

/// Escape text for HTML element content and double-quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
