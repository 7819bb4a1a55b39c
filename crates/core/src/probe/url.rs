use reqwest::Url;

use super::ProbeError;

/// Turn a user-typed proxy address into a base URL.
///
/// `www.` is dropped, `https://` is assumed when no scheme is given, and a
/// trailing `index.html` or `/` is removed.
pub fn normalize_proxy_url(input: &str) -> Result<String, ProbeError> {
    let mut url = input.trim().to_string();
    if url.is_empty() {
        return Err(ProbeError::Validation("empty URL".to_string()));
    }

    if let Some(rest) = url.strip_prefix("www.") {
        url = rest.to_string();
    }
    if !url.contains("://") {
        url = format!("https://{url}");
    }
    url = url.replacen("://www.", "://", 1);
    if let Some(rest) = url.strip_suffix("index.html") {
        url = rest.to_string();
    }
    let url = url.trim_end_matches('/').to_string();

    let parsed = Url::parse(&url).map_err(|e| ProbeError::Validation(format!("{input}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ProbeError::Validation(format!(
            "{input}: unsupported scheme {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none_or(|h| h.is_empty()) {
        return Err(ProbeError::Validation(format!("{input}: missing host")));
    }

    Ok(url)
}
