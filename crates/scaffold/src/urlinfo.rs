// ABOUTME: URL validation and hostname derivation for scaffold requests.
// ABOUTME: Also maps hostnames to legal Rust module identifiers for generated code.

//! URL resolution for scaffold requests.
//!
//! A raw URL is acceptable only if standard URL parsing yields a non-empty
//! hostname; that hostname then names the fixture and extractor directories.

use url::Url;

/// Hostname information derived from a validated URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlInfo {
    pub hostname: String,
}

/// Resolves a raw URL string into a `UrlInfo`.
///
/// Returns `None` when the string does not parse as a URL or parses without
/// a hostname component (e.g. `file:///x`, `mailto:` or relative paths).
pub fn resolve(raw: &str) -> Option<UrlInfo> {
    let parsed = Url::parse(raw).ok()?;
    let hostname = parsed.host_str()?.to_lowercase();
    if hostname.is_empty() {
        return None;
    }
    Some(UrlInfo { hostname })
}

/// Maps a hostname to a legal Rust module identifier.
///
/// Generated extractor directories keep the literal hostname (dots included),
/// but the registry line must declare a module: `example.com` becomes
/// `example_com`, and a leading digit gets a `_` prefix.
pub fn module_ident(hostname: &str) -> String {
    let mut ident: String = hostname
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
