use crate::models::ProjectRule;

use super::pattern::wildcard_match;
use super::title::primary_name;

/// Resolves a tab to the first matching rule across three passes, each a full
/// in-order scan of the rule list:
///
/// 1. patterns against the primary name (title with container suffix removed),
/// 2. patterns against the raw title, when it differs from the primary name,
/// 3. patterns against the URL.
///
/// An earlier pass dominates a later one regardless of rule order: what the
/// user is looking at outranks where it came from. Rules without patterns
/// never match.
pub fn resolve<'a>(url: &str, title: &str, rules: &'a [ProjectRule]) -> Option<&'a ProjectRule> {
    let primary = primary_name(title);
    if !primary.is_empty() {
        if let Some(rule) = scan(rules, &primary) {
            return Some(rule);
        }
    }
    if !title.is_empty() && title != primary {
        if let Some(rule) = scan(rules, title) {
            return Some(rule);
        }
    }
    scan(rules, url)
}

fn scan<'a>(rules: &'a [ProjectRule], candidate: &str) -> Option<&'a ProjectRule> {
    rules.iter().find(|rule| {
        rule.patterns
            .iter()
            .any(|pattern| wildcard_match(candidate, pattern))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectColor;

    fn rule(name: &str, patterns: &[&str]) -> ProjectRule {
        ProjectRule::new(
            name,
            ProjectColor::Grey,
            patterns.iter().map(|p| p.to_string()).collect(),
        )
    }

    #[test]
    fn primary_name_hit_beats_url_hit_regardless_of_rule_order() {
        let rules = vec![
            rule("ByUrl", &["*docs.google.com*"]),
            rule("ByName", &["*Quarterly*"]),
        ];
        let hit = resolve(
            "https://docs.google.com/document/d/1",
            "Quarterly Report - Google Docs",
            &rules,
        )
        .unwrap();
        assert_eq!(hit.name, "ByName");
    }

    #[test]
    fn falls_back_to_raw_title_then_url() {
        let rules = vec![rule("Mail", &["*Fastmail*"]), rule("News", &["*lobste.rs*"])];
        let by_title = resolve("https://mail.example.com", "Inbox - Fastmail", &rules).unwrap();
        assert_eq!(by_title.name, "Mail");
        let by_url = resolve("https://lobste.rs/t/rust", "Lobsters", &rules).unwrap();
        assert_eq!(by_url.name, "News");
    }

    #[test]
    fn first_rule_in_order_wins_within_a_pass() {
        let rules = vec![rule("First", &["*report*"]), rule("Second", &["*report*"])];
        let hit = resolve("https://example.com", "Weekly report", &rules).unwrap();
        assert_eq!(hit.name, "First");
    }

    #[test]
    fn no_rules_or_no_hits_resolve_to_none() {
        assert!(resolve("https://example.com", "Anything", &[]).is_none());
        let rules = vec![rule("Docs", &["*docs.google.com*"])];
        assert!(resolve("https://example.com", "Unrelated", &rules).is_none());
    }

    #[test]
    fn rules_with_no_patterns_are_skipped() {
        let rules = vec![rule("Empty", &[]), rule("Wide", &["*"])];
        let hit = resolve("https://example.com", "Anything", &rules).unwrap();
        assert_eq!(hit.name, "Wide");
    }

    #[test]
    fn suffix_stripped_title_matches_unsuffixed_patterns() {
        let rules = vec![rule("Report", &["Quarterly Report"])];
        let hit = resolve("https://x", "Quarterly Report - Google Docs", &rules).unwrap();
        assert_eq!(hit.name, "Report");
    }
}
