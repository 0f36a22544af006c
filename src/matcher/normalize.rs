/// Lower-case and strip everything outside `[a-z0-9]`. Absorbs the
/// hyphen/space/camel-case differences between "Has-Account", "Has Account",
/// and "hasAccount".
pub fn normalize_key(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Normalize, then drop a trailing run of digits. Site builders rename
/// duplicated elements by appending a counter ("FullName" -> "FullName2");
/// both sides must strip so the pair still compares equal.
pub fn normalize_suffix_stripped(raw: &str) -> String {
    let normalized = normalize_key(raw);
    normalized
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .to_string()
}

/// Tokens longer than two characters, split on whitespace, hyphens, and
/// underscores, lower-cased.
pub fn tokenize_name(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|t| t.len() > 2)
        .map(|t| t.to_string())
        .collect()
}

/// Fuzzy keyword overlap: true when at least half of the smaller token set
/// appears in the other.
pub fn fuzzy_token_overlap(a: &str, b: &str) -> bool {
    let tokens_a = tokenize_name(a);
    let tokens_b = tokenize_name(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return false;
    }

    let (smaller, larger) = if tokens_a.len() <= tokens_b.len() {
        (&tokens_a, &tokens_b)
    } else {
        (&tokens_b, &tokens_a)
    };

    let hits = smaller.iter().filter(|t| larger.contains(t)).count();
    hits * 2 >= smaller.len()
}
