//! URL input validation, normalization, and export file naming.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Longest accepted input, in characters.
pub const MAX_LEN: usize = 300;

/// Longest slug kept in an export file name.
const SLUG_MAX: usize = 40;

static RE_SCHEME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());
static RE_UNSAFE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._-]+").unwrap());
static RE_DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Prepend `https://` when the input carries no scheme.
pub fn normalize_url(raw: &str) -> String {
    let v = raw.trim();
    if v.is_empty() || v.contains("://") {
        v.to_string()
    } else {
        format!("https://{v}")
    }
}

/// Validate user input and return the normalized URL.
pub fn validate_url(raw: &str) -> Result<String, String> {
    let v = raw.trim();
    if v.is_empty() {
        return Err("please enter a URL".into());
    }
    if v.chars().count() > MAX_LEN {
        return Err(format!("URL must be at most {MAX_LEN} characters"));
    }
    let normalized = normalize_url(v);
    Url::parse(&normalized)
        .map_err(|e| format!("invalid URL ({e}), e.g. https://example.com"))?;
    Ok(normalized)
}

/// File name for exporting the QR of `url`: `heart-qr_<slug>.png`.
pub fn export_file_name(url: &str) -> String {
    let stripped = RE_SCHEME.replace(url.trim(), "");
    let safe = RE_UNSAFE.replace_all(&stripped, "-");
    let safe = RE_DASHES.replace_all(&safe, "-");
    let slug: String = safe.trim_matches('-').chars().take(SLUG_MAX).collect();
    let slug = if slug.is_empty() { "qr".to_string() } else { slug };
    format!("heart-qr_{slug}.png")
}
