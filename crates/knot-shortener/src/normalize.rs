use knot_core::ShortenerError;

/// Normalizes a raw URL to an absolute, scheme-qualified form.
///
/// Inputs without an `http://` or `https://` prefix get `https://`
/// prepended; anything else passes through unchanged. This is the only
/// rewriting the system performs.
pub fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

/// Validates that a normalized URL has both a scheme and a host.
pub fn validate_url(url: &str) -> Result<(), ShortenerError> {
    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(ShortenerError::InvalidUrl(format!(
            "missing scheme: '{}'",
            url
        )));
    };

    if scheme.is_empty() {
        return Err(ShortenerError::InvalidUrl(format!(
            "missing scheme: '{}'",
            url
        )));
    }

    let host = rest.split('/').next().unwrap_or("");
    if host.is_empty() {
        return Err(ShortenerError::InvalidUrl(format!(
            "missing host: '{}'",
            url
        )));
    }

    Ok(())
}
