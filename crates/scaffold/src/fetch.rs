// ABOUTME: One-shot page fetching for fixture capture with SSRF guard and charset decoding.
// ABOUTME: No retries; any fetch failure is fatal to the scaffold run.

//! Remote resource fetching.
//!
//! Fetches the page once, enforces a content cap, and decodes the body to
//! UTF-8 using the content-type charset when present, falling back to
//! chardetng detection. The private-network guard runs on the requested URL
//! and again on the URL the response settled on, so a redirect cannot carry
//! the fetch into a private range. There is no retry policy anywhere in the
//! pipeline.

use std::net::IpAddr;

use bytes::Bytes;
use ipnet::{Ipv4Net, Ipv6Net};

use crate::error::ScaffoldError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Options for fetching a page.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub allow_private_networks: bool,
}

/// The fetched page, undecoded.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchedPage {
    /// Decode the body as UTF-8 text, using the content-type charset hint.
    pub fn text_utf8(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Check if an IP address is in a private/reserved range.
fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => {
            let blocked: [Ipv4Net; 5] = [
                "10.0.0.0/8".parse().unwrap(),
                "172.16.0.0/12".parse().unwrap(),
                "192.168.0.0/16".parse().unwrap(),
                "127.0.0.0/8".parse().unwrap(),
                "169.254.0.0/16".parse().unwrap(),
            ];
            blocked.iter().any(|net| net.contains(ip))
        }
        IpAddr::V6(ip) => {
            if ip.is_loopback() {
                return true;
            }
            let unique_local: Ipv6Net = "fc00::/7".parse().unwrap();
            let link_local: Ipv6Net = "fe80::/10".parse().unwrap();
            unique_local.contains(ip) || link_local.contains(ip)
        }
    }
}

/// Decode body bytes using the charset from the content-type header, or
/// chardetng detection when no usable charset is declared.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(charset) = content_type.and_then(extract_charset) {
        if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
            let (decoded, _, _) = encoding.decode(body);
            return decoded.into_owned();
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract the charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        if let Some(charset) = part.trim().strip_prefix("charset=") {
            return Some(charset.trim_matches('"').trim_matches('\'').to_string());
        }
    }
    None
}

/// Reject URLs whose host resolves into a private network.
async fn check_ssrf(url: &str, parsed: &url::Url) -> Result<(), ScaffoldError> {
    let host = match parsed.host_str() {
        Some(h) => h,
        None => return Ok(()),
    };

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(ScaffoldError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("private IP addresses are not allowed")),
            ));
        }
        return Ok(());
    }

    let port = parsed
        .port()
        .unwrap_or(if parsed.scheme() == "https" { 443 } else { 80 });
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        ScaffoldError::fetch(url, "Fetch", Some(anyhow::anyhow!("DNS lookup failed: {}", e)))
    })?;
    for socket_addr in addrs {
        if is_private_ip(&socket_addr.ip()) {
            return Err(ScaffoldError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("private IP addresses are not allowed")),
            ));
        }
    }
    Ok(())
}

/// Fetch the page at `url`.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchedPage, ScaffoldError> {
    let parsed = url::Url::parse(url).map_err(|e| {
        ScaffoldError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ScaffoldError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    if !opts.allow_private_networks {
        check_ssrf(url, &parsed).await?;
    }

    let response = client.get(url).send().await.map_err(|e| {
        ScaffoldError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
    })?;

    // Redirects may have hopped to a different host; the settled URL gets
    // the same private-network check as the original before any body read.
    if !opts.allow_private_networks {
        check_ssrf(url, response.url()).await?;
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ScaffoldError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| {
        ScaffoldError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ScaffoldError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    if status != 200 {
        return Err(ScaffoldError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    Ok(FetchedPage {
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}
