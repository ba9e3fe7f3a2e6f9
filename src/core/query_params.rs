use std::collections::HashMap;

/// Parse query parameters from a raw query string (`user=john&page=2`).
///
/// Handles URL decoding. Multiple values for the same key are not
/// supported (only the last is kept).
///
/// # Example
/// ```
/// use network::core::query_params::parse_query_params;
///
/// let params = parse_query_params("expand=true&page=2");
/// assert_eq!(params.get("expand"), Some(&"true".to_string()));
/// assert_eq!(params.get("page"), Some(&"2".to_string()));
/// ```
pub fn parse_query_params(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let query = query.strip_prefix('?').unwrap_or(query);

    for param in query.split('&').filter(|p| !p.is_empty()) {
        if let Some((key, encoded_value)) = param.split_once('=') {
            let decoded = urlencoding::decode(encoded_value)
                .unwrap_or(std::borrow::Cow::Borrowed(encoded_value))
                .to_string();
            params.insert(key.to_string(), decoded);
        } else {
            // Flag parameter without value
            params.insert(param.to_string(), String::new());
        }
    }

    params
}

/// Get a boolean flag parameter (e.g., ?expand=true)
pub fn get_bool_flag(params: &HashMap<String, String>, key: &str) -> bool {
    params.get(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// Parses a decimal integer, saturating at the `i64` bounds when the digits
/// do not fit. Anything that is not a number yields `None`.
pub fn parse_int(value: &str) -> Option<i64> {
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }

    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Get an integer parameter, falling back to `default` when absent or malformed.
/// Range checks are left to the caller.
pub fn get_int(params: &HashMap<String, String>, key: &str, default: i64) -> i64 {
    params.get(key)
        .and_then(|s| parse_int(s))
        .unwrap_or(default)
}
