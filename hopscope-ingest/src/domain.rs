use url::Url;

/// Host part of an http(s) URL, with the port when one is given explicitly.
///
/// Returns `None` for other schemes (`chrome://`, `file://`, ...) and for
/// anything that does not parse.
pub fn extract_domain(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let host = url.host_str()?;
    if host.is_empty() {
        return None;
    }

    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
