/// Checks whether a network location matches the ignore list
///
/// An entry matches when the lowercased `host[:port]` contains it as a
/// substring, so `facebook` covers `www.facebook.com` and
/// `m.facebook.com` alike. Blank entries never match.
pub fn is_ignored(network_location: &str, ignore: &[String]) -> bool {
    let haystack = network_location.to_lowercase();
    ignore
        .iter()
        .map(|entry| entry.trim().to_lowercase())
        .any(|entry| !entry.is_empty() && haystack.contains(&entry))
}
