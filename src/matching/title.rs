/// Trailing container suffixes stripped from tab titles, checked in order.
/// All entries are ASCII; the scan relies on that for case folding.
const CONTAINER_SUFFIXES: &[&str] = &[
    "google docs",
    "google sheets",
    "google slides",
    "google forms",
    "google drive",
    "microsoft word",
    "microsoft excel",
    "microsoft powerpoint",
    "onedrive",
    "notion",
    "figma",
];

/// Hyphen, en-dash, and em-dash are equivalent separators.
const DASH_SEPARATORS: [char; 3] = ['-', '\u{2013}', '\u{2014}'];

/// Strips one trailing "document lives inside container X" decoration from a
/// display title, e.g. `"Quarterly Report - Google Docs"` becomes
/// `"Quarterly Report"`. The first matching suffix in the ordered list wins
/// and stripping is applied at most once. Result is whitespace-trimmed;
/// empty input yields an empty string.
pub fn primary_name(title: &str) -> String {
    let title = title.trim();
    for suffix in CONTAINER_SUFFIXES {
        let Some(rest) = strip_suffix_ascii_ci(title, suffix) else {
            continue;
        };
        // The suffix only counts when preceded by a dash separator; a title
        // that simply ends in the container's name is left alone.
        let Some(head) = strip_trailing_dash(rest.trim_end()) else {
            continue;
        };
        return head.trim().to_string();
    }
    title.to_string()
}

fn strip_suffix_ascii_ci<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let mut indices = text.char_indices().rev();
    let mut wanted = suffix.chars().rev();
    let mut cut = text.len();
    loop {
        let Some(expected) = wanted.next() else {
            return Some(&text[..cut]);
        };
        let (idx, found) = indices.next()?;
        if !found.eq_ignore_ascii_case(&expected) {
            return None;
        }
        cut = idx;
    }
}

fn strip_trailing_dash(text: &str) -> Option<&str> {
    let (idx, last) = text.char_indices().next_back()?;
    DASH_SEPARATORS.contains(&last).then(|| &text[..idx])
}
