// ABOUTME: Content extraction collaborator producing a sample ExtractionResult from (url, html).
// ABOUTME: Generic meta/selector heuristics only; samples seed the generated test stub.

//! Sample content extraction.
//!
//! The scaffold pipeline runs one extraction pass over the sanitized page so
//! the generated test stub can carry real captured values. This is a thin
//! generic heuristic pass (title, author, date, excerpt, word count). It
//! does not validate extraction quality and is not the parser the scaffolded
//! extractor will eventually serve.

use chrono::{DateTime, Utc};
use dom_query::{Document, Matcher};
use serde::Serialize;

use crate::error::ScaffoldError;

/// Structured sample produced from a captured page.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub url: String,
    pub domain: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub date_published: Option<DateTime<Utc>>,
    pub excerpt: Option<String>,
    pub word_count: usize,
}

/// Title selectors in priority order.
const TITLE_SELECTORS: &[&str] = &["title", "h1", "h2"];

/// Author text selectors tried after the author meta tag.
const AUTHOR_SELECTORS: &[&str] = &[".byline", ".author", "[itemprop='author']"];

/// Meta selectors whose content attribute may carry the publication date.
const DATE_META_SELECTORS: &[&str] = &[
    "meta[property='article:published_time']",
    "meta[name='date']",
];

/// Meta selectors whose content attribute may carry a page description.
const EXCERPT_SELECTORS: &[&str] = &[
    "meta[name='description']",
    "meta[property='og:description']",
];

/// Extracts a sample `ExtractionResult` from a page.
///
/// Always awaited by the orchestrator regardless of branch; its settlement
/// triggers branch reporting.
pub async fn extract(url: &str, html: &str) -> Result<ExtractionResult, ScaffoldError> {
    let parsed = url::Url::parse(url).map_err(|e| {
        ScaffoldError::invalid_url(url, "Extract", Some(anyhow::anyhow!("malformed URL: {}", e)))
    })?;
    let domain = parsed
        .host_str()
        .map(|h| h.to_lowercase())
        .unwrap_or_default();

    let doc = Document::from(html);

    let title = first_attr(&doc, &["meta[property='og:title']"], "content")
        .or_else(|| first_text(&doc, TITLE_SELECTORS));

    let author = first_attr(&doc, &["meta[name='author']"], "content")
        .or_else(|| first_text(&doc, AUTHOR_SELECTORS));

    let date_published = extract_date(&doc);

    let excerpt = first_attr(&doc, EXCERPT_SELECTORS, "content");

    let word_count = first_text(&doc, &["body"])
        .map(|t| t.split_whitespace().count())
        .unwrap_or(0);

    Ok(ExtractionResult {
        url: url.to_string(),
        domain,
        title,
        author,
        date_published,
        excerpt,
        word_count,
    })
}

/// Extracts the publication date: meta tags first, then `time[datetime]`,
/// then `time` element text.
fn extract_date(doc: &Document) -> Option<DateTime<Utc>> {
    for sel in DATE_META_SELECTORS {
        if let Some(content) = first_attr(doc, &[sel], "content") {
            if let Some(dt) = parse_date(&content) {
                return Some(dt);
            }
        }
    }
    if let Some(dt_str) = first_attr(doc, &["time[datetime]"], "datetime") {
        if let Some(dt) = parse_date(&dt_str) {
            return Some(dt);
        }
    }
    if let Some(time_text) = first_text(doc, &["time"]) {
        if let Some(dt) = parse_date(&time_text) {
            return Some(dt);
        }
    }
    None
}

/// Parse a date string, trying RFC3339 first then falling back to dateparser.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
        return Some(dt.with_timezone(&Utc));
    }
    dateparser::parse(s).ok().map(|dt| dt.with_timezone(&Utc))
}

/// Normalizes whitespace by collapsing runs into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the normalized text of the first selector with a non-empty match.
///
/// Extraction runs once per scaffold, so selectors are compiled on the spot.
fn first_text(doc: &Document, selectors: &[&str]) -> Option<String> {
    for css in selectors {
        let matcher = match Matcher::new(css) {
            Ok(m) => m,
            Err(_) => continue,
        };
        let text = normalize_whitespace(&doc.select_matcher(&matcher).text());
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

/// Returns the trimmed attribute value of the first selector with a
/// non-empty match.
fn first_attr(doc: &Document, selectors: &[&str], attr: &str) -> Option<String> {
    for css in selectors {
        let matcher = match Matcher::new(css) {
            Ok(m) => m,
            Err(_) => continue,
        };
        for node in doc.select_matcher(&matcher).nodes() {
            let sel = dom_query::Selection::from(*node);
            if let Some(value) = sel.attr(attr) {
                let trimmed = value.trim().to_string();
                if !trimmed.is_empty() {
                    return Some(trimmed);
                }
            }
        }
    }
    None
}
