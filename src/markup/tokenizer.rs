use regex::{Regex, RegexBuilder};

/// Extract the decoded value of `attr_name` from a single tag's markup.
///
/// Handles double-quoted, single-quoted, and unquoted attribute values.
/// Returns None when the attribute is absent or the markup is malformed —
/// third-party markup is untrusted and may be truncated mid-tag.
pub fn attribute(tag_markup: &str, attr_name: &str) -> Option<String> {
    // The prefix guard keeps "name" from matching inside "data-name".
    let pattern = format!(
        r#"(?:^|[^\w-]){}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#,
        regex::escape(attr_name)
    );
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;

    let caps = re.captures(tag_markup)?;
    let raw = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str();

    Some(decode_entities(raw))
}

/// All `<tag ...> ... </tag>` fragments in `markup`, non-greedy.
///
/// Nested same-name tags are not tracked; the first close tag ends the
/// fragment. Unterminated tags simply produce no fragment.
pub fn tag_fragments(markup: &str, tag: &str) -> Vec<String> {
    let pattern = format!(
        r"<{t}\b[^>]*>.*?</{t}\s*>",
        t = regex::escape(tag)
    );
    let re = match RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    re.find_iter(markup).map(|m| m.as_str().to_string()).collect()
}

/// All open-tag matches for a void element like `<input ...>`.
pub fn void_tags(markup: &str, tag: &str) -> Vec<String> {
    let pattern = format!(r"<{}\b[^>]*>", regex::escape(tag));
    let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    re.find_iter(markup).map(|m| m.as_str().to_string()).collect()
}

/// Text content of a fragment: tags stripped, entities decoded, whitespace
/// collapsed.
pub fn inner_text(fragment: &str) -> String {
    let stripped = match Regex::new(r"<[^>]*>") {
        Ok(re) => re.replace_all(fragment, " ").into_owned(),
        Err(_) => fragment.to_string(),
    };

    let decoded = decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the handful of entities that show up in attribute values and
/// option text. Anything else passes through untouched.
pub fn decode_entities(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}
