//! Merkle proof input parsing for fee claims.

/// Parse a user-supplied merkle proof.
///
/// Accepts a JSON array of strings; otherwise, text containing commas is
/// split and each trimmed `0x`-prefixed segment is kept. Anything else parses
/// to an empty proof. Non-string JSON elements are dropped.
///
/// ```rust
/// use lib_core::proof::parse_proof;
///
/// assert_eq!(parse_proof(r#"["0xa","0xb"]"#), vec!["0xa", "0xb"]);
/// assert_eq!(parse_proof("0xa, 0xb"), vec!["0xa", "0xb"]);
/// assert!(parse_proof("not json, no comma").is_empty());
/// ```
pub fn parse_proof(input: &str) -> Vec<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect();
    }

    if trimmed.contains(',') {
        return trimmed
            .split(',')
            .map(str::trim)
            .filter(|segment| segment.starts_with("0x"))
            .map(str::to_string)
            .collect();
    }

    Vec::new()
}
