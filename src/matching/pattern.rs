use regex::Regex;

/// Tests `text` against a wildcard `pattern` where `*` matches any run of
/// characters (including none) and everything else matches literally,
/// case-insensitively. The match is anchored at both ends, so a substring
/// test needs a leading and trailing `*`. An empty pattern matches only
/// empty text.
pub fn wildcard_match(text: &str, pattern: &str) -> bool {
    match compile(pattern) {
        Some(re) => re.is_match(text),
        None => false,
    }
}

/// Escapes everything the regex engine treats specially, then reopens `*` as
/// `.*`. The `s` flag keeps `*` spanning newlines in multiline titles.
/// Escaping makes the source valid for any input, so compilation only fails
/// on pathological sizes; that is treated as "no match".
fn compile(pattern: &str) -> Option<Regex> {
    let escaped = regex::escape(pattern).replace("\\*", ".*");
    Regex::new(&format!("(?is)^{escaped}$")).ok()
}
