// ABOUTME: Fixture HTML sanitizer: absolutizes src/href links and strips junk tags.
// ABOUTME: Mutates a dom_query Document in place and serializes the cleaned page.

//! HTML sanitization applied to captured pages before they become fixtures.
//!
//! Two independent passes over the document:
//! 1. Link absolutization: every `src`/`href` attribute is resolved against
//!    the page URL. Protocol-relative values (`//cdn...`) are rewritten by
//!    prefixing `http:` rather than full relative resolution; that is this
//!    tool's normalization policy, kept so fixtures are stable offline.
//! 2. Junk-tag stripping: elements whose tag name is on the blocklist are
//!    removed from the tree.
//!
//! Malformed documents are passed through best-effort by the underlying
//! parser; there is no failure mode.

use dom_query::{Document, Matcher, Selection};
use once_cell::sync::Lazy;
use url::Url;

/// Default tag blocklist for captured fixtures.
pub const JUNK_TAGS: &[&str] = &["script"];

/// Matches every element carrying a `src` or `href` attribute.
static LINKED_ELEMENTS: Lazy<Option<Matcher>> = Lazy::new(|| Matcher::new("[src], [href]").ok());

/// Rewrites every `src` and `href` attribute in the document to an absolute URL.
pub fn absolutize_links(doc: &Document, page_url: &Url) {
    let matcher = match LINKED_ELEMENTS.as_ref() {
        Some(m) => m,
        None => return,
    };

    for node in doc.select_matcher(matcher).nodes() {
        let sel = Selection::from(*node);
        for attr in ["src", "href"] {
            let value = match sel.attr(attr) {
                Some(v) => v.to_string(),
                None => continue,
            };
            if let Some(rewritten) = absolutize(&value, page_url) {
                sel.set_attr(attr, &rewritten);
            }
        }
    }
}

/// Computes the absolute form of a single attribute value.
///
/// Returns `None` when the value should be left untouched (empty, or not
/// resolvable against the page URL).
fn absolutize(value: &str, page_url: &Url) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    // Protocol-relative links get a plain http: prefix
    if let Some(rest) = value.strip_prefix("//") {
        return Some(format!("http://{}", rest));
    }
    page_url.join(value).ok().map(|u| u.to_string())
}

/// Removes every element whose tag name is on the blocklist.
///
/// The blocklist is configurable, so its entries are compiled per call;
/// entries that do not parse as selectors are skipped.
pub fn strip_junk_tags<S: AsRef<str>>(doc: &Document, blocklist: &[S]) {
    for tag in blocklist {
        if let Ok(matcher) = Matcher::new(tag.as_ref()) {
            doc.select_matcher(&matcher).remove();
        }
    }
}

/// Applies both sanitization passes and serializes the document.
pub fn sanitize<S: AsRef<str>>(doc: &Document, page_url: &Url, blocklist: &[S]) -> String {
    absolutize_links(doc, page_url);
    strip_junk_tags(doc, blocklist);
    doc.html().to_string()
}
