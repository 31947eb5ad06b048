/// Lower-case the raw query. Whitespace is left untouched.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
}

/// Split a normalized query on whitespace, keeping order and duplicates.
pub fn tokenize(normalized: &str) -> Vec<String> {
    normalized.split_whitespace().map(str::to_string).collect()
}
