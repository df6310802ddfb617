pub mod ledger;
pub mod project;

pub use ledger::{TimeLedger, DEFAULT_RETENTION_DAYS};
pub use project::{
    builtin_default_patterns, builtin_default_rule, ProjectColor, ProjectRule, DEFAULT_RULE_ID,
    UNCATEGORIZED,
};
