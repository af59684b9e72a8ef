use url::Url;

/// Normalizes a URL string to carry a scheme
///
/// A target given without a scheme is assumed to be plain HTTP, mirroring
/// what a user types into a terminal (`example.com` rather than
/// `http://example.com`). URLs that already start with `http://` or
/// `https://` are returned unchanged.
///
/// # Examples
///
/// ```
/// use pagewatch::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com"), "http://example.com");
/// assert_eq!(ensure_scheme("https://example.com"), "https://example.com");
/// ```
pub fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Extracts the network location (`host[:port]`) from a URL string
///
/// The port is included only when it is explicit in the URL and not the
/// scheme default. Returns `None` when the URL does not parse or has no
/// host.
pub fn network_location(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_string();
    match parsed.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Filters and resolves an anchor `href` into a candidate URL
///
/// Rules, in order:
/// - blank values, bare `/` (a self reference), and fragment-only values
///   (`#...`) are dropped
/// - a leading `/` is resolved against the owning page's network location
/// - everything else is scheme-normalized as-is
///
/// Returns `None` when the href is not a candidate for fetching.
pub fn resolve_href(href: &str, network_location: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href == "/" || href.starts_with('#') {
        return None;
    }
    if href.starts_with('/') {
        return Some(format!("http://{}{}", network_location, href));
    }
    Some(ensure_scheme(href))
}
