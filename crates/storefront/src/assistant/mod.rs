//! The mock shopping assistant.
//!
//! Replies are not generated by a model. They come from ordered keyword rule
//! tables evaluated first-match against the lowercased message text and the
//! page the shopper is on.

pub mod rules;
pub mod search;

pub use rules::{ASSISTANT_RULES, CONCIERGE_RULES, PRODUCT_MATCH_RULES, Predicate, Reply, Rule, RuleTable};
pub use search::extract_search_term;
