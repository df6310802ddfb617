pub mod pattern;
pub mod resolver;
pub mod title;

pub use pattern::wildcard_match;
pub use resolver::resolve;
pub use title::primary_name;
