use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ledger bucket used for tabs that resolve to no rule (internal pages,
/// tabs without a URL, or simply no pattern hit).
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Reserved id of the built-in rule seeded on install/startup. Its pattern
/// list is refreshed on every startup; user-chosen name and color are kept.
pub const DEFAULT_RULE_ID: &str = "builtin-docs";

/// The host tab-group palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl Default for ProjectColor {
    fn default() -> Self {
        ProjectColor::Grey
    }
}

impl ProjectColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectColor::Grey => "grey",
            ProjectColor::Blue => "blue",
            ProjectColor::Red => "red",
            ProjectColor::Yellow => "yellow",
            ProjectColor::Green => "green",
            ProjectColor::Pink => "pink",
            ProjectColor::Purple => "purple",
            ProjectColor::Cyan => "cyan",
            ProjectColor::Orange => "orange",
        }
    }
}

/// A named, colored, ordered set of wildcard patterns used to classify tabs.
///
/// `name` doubles as the time-ledger key: renaming a project starts a new
/// ledger bucket, and deleting one leaves historical entries untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRule {
    pub id: String,
    pub name: String,
    pub color: ProjectColor,
    pub patterns: Vec<String>,
}

impl ProjectRule {
    pub fn new(name: impl Into<String>, color: ProjectColor, patterns: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color,
            patterns,
        }
    }
}

/// Current built-in pattern list for the seeded default rule.
pub fn builtin_default_patterns() -> Vec<String> {
    ["*docs.google.com*", "*drive.google.com*"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn builtin_default_rule() -> ProjectRule {
    ProjectRule {
        id: DEFAULT_RULE_ID.to_string(),
        name: "Google Docs".to_string(),
        color: ProjectColor::Blue,
        patterns: builtin_default_patterns(),
    }
}
