//! Utility functions and helpers

/// Replacement shown instead of a stored password
pub const PASSWORD_MASK: &str = "********";

/// Mask a secret for display; absent values stay absent
pub fn mask_secret(secret: Option<&str>) -> Option<&'static str> {
    secret.map(|_| PASSWORD_MASK)
}

/// Sanitize string for logging (long values are cut)
pub fn sanitize_for_logging(s: &str) -> String {
    const MAX_CHARS: usize = 40;

    if s.chars().count() <= MAX_CHARS {
        return s.to_string();
    }
    let head: String = s.chars().take(MAX_CHARS).collect();
    format!("{}...", head)
}

/// A REST path as accepted by splunkd: absolute, no whitespace
pub fn is_rest_path(path: &str) -> bool {
    path.starts_with('/') && !path.chars().any(char::is_whitespace)
}

/// Numeric suffix of `<prefix>.<n>` keys, e.g. `endpoint.3` -> 3
pub fn numbered_key_index(key: &str, prefix: &str) -> Option<u64> {
    let rest = key
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &key[prefix.len()..])?;
    let digits = rest.strip_prefix('.')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
