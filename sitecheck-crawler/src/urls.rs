//! URL normalization and scope helpers.
//!
//! Two URLs that normalize identically are the same crawl target: scheme and
//! host are lowercased, the path defaults to "/", and query and fragment are
//! dropped for dedup purposes.

use url::Url;

/// Normalize a URL string for frontier dedup. Returns `None` for anything
/// that does not parse as an absolute http(s) URL.
pub fn normalize_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    let mut url = parsed;
    url.set_query(None);
    url.set_fragment(None);
    if url.path().is_empty() {
        url.set_path("/");
    }
    // Url lowercases scheme and host on parse already
    Some(url.to_string())
}

/// Resolve an href found in a document against its base URL, skipping
/// non-navigational schemes and fragment-only links.
pub fn resolve_href(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.to_ascii_lowercase().starts_with("javascript:")
        || href.to_ascii_lowercase().starts_with("mailto:")
        || href.to_ascii_lowercase().starts_with("tel:")
    {
        return None;
    }
    let base_url = Url::parse(base).ok()?;
    let resolved = base_url.join(href).ok()?;
    normalize_url(resolved.as_str())
}

/// True when `url` belongs to `host` (exact host or a subdomain of it).
pub fn same_host(url: &str, host: &str) -> bool {
    if let Ok(parsed) = Url::parse(url)
        && let Some(h) = parsed.host_str()
    {
        let h = h.to_ascii_lowercase();
        let host = host.to_ascii_lowercase();
        return h == host || h.ends_with(&format!(".{}", host));
    }
    false
}

/// Host portion of a URL, lowercased.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

/// Scheme://host root of a URL, e.g. `https://example.com`.
pub fn site_root(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}://{}:{}", parsed.scheme(), host, port)),
        None => Some(format!("{}://{}", parsed.scheme(), host)),
    }
}
