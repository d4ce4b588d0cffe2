//! Keyword rule tables.
//!
//! Matching is plain case-insensitive substring search, so short keywords
//! also match inside longer words (`"hi"` matches `"this"`).

use crate::models::{ContextInfo, Product};

/// When a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The shopper is on a product page with a product attached.
    ProductPage,
    /// The message contains any of these keywords.
    ContainsAny(&'static [&'static str]),
    /// Always matches; used as the last rule.
    Always,
}

impl Predicate {
    fn matches(self, text: &str, context: Option<&ContextInfo>) -> bool {
        match self {
            Self::ProductPage => context.is_some_and(|c| c.page == "product" && c.product.is_some()),
            Self::ContainsAny(keywords) => keywords.iter().any(|k| text.contains(k)),
            Self::Always => true,
        }
    }
}

/// What a rule answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Fixed text.
    Text(&'static str),
    /// Text with `{products}` replaced by a comma-separated list of names.
    ProductList(&'static str),
    /// A summary of the product on screen.
    ProductSummary,
}

/// One `(predicate, reply)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub predicate: Predicate,
    pub reply: Reply,
}

const fn rule(name: &'static str, predicate: Predicate, reply: Reply) -> Rule {
    Rule {
        name,
        predicate,
        reply,
    }
}

/// An ordered rule list, evaluated first-match.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable(&'static [Rule]);

impl RuleTable {
    #[must_use]
    pub const fn rules(&self) -> &'static [Rule] {
        self.0
    }

    /// The first rule matching `text` (case-insensitive) and `context`.
    #[must_use]
    pub fn find(&self, text: &str, context: Option<&ContextInfo>) -> Option<&'static Rule> {
        let text = text.to_lowercase();
        self.0
            .iter()
            .find(|rule| rule.predicate.matches(&text, context))
    }

    /// Render the reply of the first matching rule.
    ///
    /// `products` fills `{products}` placeholders. Returns `None` only if no
    /// rule matches, which a table ending in [`Predicate::Always`] rules out.
    #[must_use]
    pub fn respond(
        &self,
        text: &str,
        context: Option<&ContextInfo>,
        products: &[Product],
    ) -> Option<String> {
        let rule = self.find(text, context)?;
        tracing::debug!(rule = rule.name, "Assistant rule matched");
        Some(match rule.reply {
            Reply::Text(text) => text.to_string(),
            Reply::ProductList(template) => template.replace("{products}", &product_names(products)),
            Reply::ProductSummary => context
                .and_then(|c| c.product.as_ref())
                .map(product_summary)
                .unwrap_or_default(),
        })
    }
}

fn product_names(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| p.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn product_summary(product: &Product) -> String {
    format!(
        "I can tell you all about the {}. It's priced at {} and features {}. \
         Would you like to add this to your bag or have more information?",
        product.title,
        product.price,
        product.specs().join(", ")
    )
}

// =============================================================================
// Keywords
// =============================================================================

const LAPTOP: &[&str] = &["laptop", "computer"];
const PHONE: &[&str] = &["phone", "smartphone"];
const HEADPHONE: &[&str] = &["headphone", "earbuds"];
const AUDIO: &[&str] = &["headphone", "earbuds", "audio"];
const GREETING: &[&str] = &["hello", "hi"];
const RECOMMEND: &[&str] = &["recommend", "suggest"];
const COMPARE: &[&str] = &["compare"];

// =============================================================================
// Replies
// =============================================================================

const GREETING_REPLY: &str = "Hello! I'm Baiyit, your AI shopping assistant. I can help you find products, answer questions, and provide recommendations. What are you looking for today?";

const COMPARE_REPLY: &str = "I'd be happy to help you compare products. Could you tell me which specific items you're interested in comparing? Or I can suggest some popular comparisons in a particular category.";

/// First message of every concierge session.
pub const CONCIERGE_GREETING: &str = "Hello! I'm Baiyit, your AI shopping concierge. How can I help you today? You can ask me about products, upload images, or tell me what you're looking for.";

/// Concierge reply to any message carrying an image.
pub const IMAGE_REPLY: &str = "I see the image you've uploaded! Based on what I'm seeing, here are some products that might interest you. You can browse through the recommendations on the right, or let me know if you'd like something more specific.";

/// Assistant reply when generating a response fails.
pub const ERROR_REPLY: &str =
    "I'm sorry, I'm having trouble processing your request right now. Please try again later.";

// =============================================================================
// Tables
// =============================================================================

/// The assistant overlay.
pub const ASSISTANT_RULES: RuleTable = RuleTable(ASSISTANT_TABLE);

const ASSISTANT_TABLE: &[Rule] = &[
    rule("product_page", Predicate::ProductPage, Reply::ProductSummary),
    rule(
        "laptop",
        Predicate::ContainsAny(LAPTOP),
        Reply::Text("I've found some excellent laptop options for you! There's the UltraBook Pro with 16GB RAM and 512GB SSD, perfect for productivity. There's also the GameMaster X with a dedicated GPU if you're into gaming. I've added these to your suggestions panel. Would you like more details on any of these?"),
    ),
    rule(
        "phone",
        Predicate::ContainsAny(PHONE),
        Reply::Text("Looking for a new phone? I've curated some top options based on the latest reviews. The Galaxy S22 has an amazing camera, while the iPhone 14 Pro offers excellent performance. I've added these to your suggestions panel. Which aspects are most important to you?"),
    ),
    rule(
        "headphone",
        Predicate::ContainsAny(HEADPHONE),
        Reply::Text("For audio gear, I'd recommend the SoundMaster Pro headphones with noise cancellation, or the AirBuds Ultra for a truly wireless experience. Both have excellent sound quality and battery life. I've added these to your suggestions panel. Would you prefer over-ear headphones or earbuds?"),
    ),
    rule("greeting", Predicate::ContainsAny(GREETING), Reply::Text(GREETING_REPLY)),
    rule(
        "recommend",
        Predicate::ContainsAny(RECOMMEND),
        Reply::Text("Based on trending items and your browsing history, I'd recommend checking out our premium wireless headphones or the new ultra-slim laptops. I've added some suggestions to the panel on the right. Would you like me to refine these recommendations?"),
    ),
    rule("compare", Predicate::ContainsAny(COMPARE), Reply::Text(COMPARE_REPLY)),
    rule(
        "fallback",
        Predicate::Always,
        Reply::Text("I'd be happy to help with that. I've added some relevant products to the suggestions panel based on your query. Would you like more specific information about any of these items, or would you prefer different options?"),
    ),
];

/// The full-page concierge, when no catalog results are available.
pub const CONCIERGE_RULES: RuleTable = RuleTable(CONCIERGE_TABLE);

const CONCIERGE_TABLE: &[Rule] = &[
    rule(
        "laptop",
        Predicate::ContainsAny(LAPTOP),
        Reply::Text("I've found some excellent laptop options for you! There's the UltraBook Pro with 16GB RAM and 512GB SSD, perfect for productivity. There's also the GameMaster X with a dedicated GPU if you're into gaming. Would you like more details on any of these?"),
    ),
    rule(
        "phone",
        Predicate::ContainsAny(PHONE),
        Reply::Text("Looking for a new phone? I've curated some top options based on the latest reviews. The Galaxy S22 has an amazing camera, while the iPhone 14 Pro offers excellent performance. There's also the Pixel 7 with its AI features. Which aspects are most important to you?"),
    ),
    rule(
        "headphone",
        Predicate::ContainsAny(HEADPHONE),
        Reply::Text("For audio gear, I'd recommend the SoundMaster Pro headphones with noise cancellation, or the AirBuds Ultra for a truly wireless experience. Both have excellent sound quality and battery life. Would you prefer over-ear headphones or earbuds?"),
    ),
    rule("greeting", Predicate::ContainsAny(GREETING), Reply::Text(GREETING_REPLY)),
    rule(
        "recommend",
        Predicate::ContainsAny(RECOMMEND),
        Reply::Text("Based on trending items, I'd recommend checking out our premium wireless headphones or the new ultra-slim laptops. I've added some suggestions to the panel on the right. Would you like me to refine these recommendations?"),
    ),
    rule("compare", Predicate::ContainsAny(COMPARE), Reply::Text(COMPARE_REPLY)),
    rule(
        "fallback",
        Predicate::Always,
        Reply::Text("I've found some products that might match what you're looking for. Take a look at the recommendations on the right, or give me more details about what you need so I can refine my suggestions. What specific features or price range are you interested in?"),
    ),
];

/// The concierge, when a catalog search returned products.
pub const PRODUCT_MATCH_RULES: RuleTable = RuleTable(PRODUCT_MATCH_TABLE);

const PRODUCT_MATCH_TABLE: &[Rule] = &[
    rule(
        "laptop",
        Predicate::ContainsAny(LAPTOP),
        Reply::ProductList("I've found some excellent laptop options for you! There's the {products}. I've added these to your suggestions panel. Would you like more details on any of these?"),
    ),
    rule(
        "phone",
        Predicate::ContainsAny(PHONE),
        Reply::ProductList("Looking for a new phone? I've curated some top options based on the latest reviews: {products}. I've added these to your suggestions panel. Which aspects are most important to you?"),
    ),
    rule(
        "audio",
        Predicate::ContainsAny(AUDIO),
        Reply::ProductList("For audio gear, I'd recommend checking out {products}. I've added these to your suggestions panel. Would you prefer over-ear headphones or earbuds?"),
    ),
    rule(
        "fallback",
        Predicate::Always,
        Reply::ProductList("I've found some products that might match what you're looking for: {products}. Take a look at the recommendations on the right, or give me more details about what you need so I can refine my suggestions."),
    ),
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(title: &str, price: f64, specs: &[&str]) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": title.to_lowercase().replace(' ', "-"),
            "title": title,
            "price": price,
            "specs": specs,
        }))
        .unwrap()
    }

    fn rule_name(table: RuleTable, text: &str) -> &'static str {
        table.find(text, None).unwrap().name
    }

    #[test]
    fn test_tables_end_with_a_fallback() {
        for table in [ASSISTANT_RULES, CONCIERGE_RULES, PRODUCT_MATCH_RULES] {
            assert_eq!(table.rules().last().unwrap().predicate, Predicate::Always);
        }
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(rule_name(ASSISTANT_RULES, "Need a LAPTOP or a phone"), "laptop");
        assert_eq!(rule_name(ASSISTANT_RULES, "best smartphone?"), "phone");
        assert_eq!(rule_name(ASSISTANT_RULES, "wireless earbuds"), "headphone");
        assert_eq!(rule_name(ASSISTANT_RULES, "Hello there"), "greeting");
        assert_eq!(rule_name(ASSISTANT_RULES, "can you suggest a gift"), "recommend");
        assert_eq!(rule_name(ASSISTANT_RULES, "compare these"), "compare");
        assert_eq!(rule_name(ASSISTANT_RULES, "order status"), "fallback");
    }

    #[test]
    fn test_short_keywords_match_inside_words() {
        // "this" contains "hi".
        assert_eq!(rule_name(ASSISTANT_RULES, "what is this"), "greeting");
    }

    #[test]
    fn test_product_page_summary_takes_precedence() {
        let context = ContextInfo {
            page: "product".to_string(),
            path: Some("/products/laptop-1".to_string()),
            product: Some(product("UltraBook Pro 16", 1299.99, &["16GB RAM", "512GB SSD"])),
        };
        let reply = ASSISTANT_RULES
            .respond("tell me about laptops", Some(&context), &[])
            .unwrap();
        assert_eq!(
            reply,
            "I can tell you all about the UltraBook Pro 16. It's priced at $1299.99 and features \
             16GB RAM, 512GB SSD. Would you like to add this to your bag or have more information?"
        );
    }

    #[test]
    fn test_product_page_without_product_falls_through() {
        let context = ContextInfo {
            page: "product".to_string(),
            ..ContextInfo::default()
        };
        assert_eq!(
            ASSISTANT_RULES.find("laptop", Some(&context)).unwrap().name,
            "laptop"
        );
    }

    #[test]
    fn test_product_list_templates() {
        let products = [
            product("SoundMaster Pro", 349.99, &[]),
            product("AirBuds Ultra", 199.99, &[]),
        ];
        let reply = PRODUCT_MATCH_RULES
            .respond("good audio please", None, &products)
            .unwrap();
        assert_eq!(
            reply,
            "For audio gear, I'd recommend checking out SoundMaster Pro, AirBuds Ultra. \
             I've added these to your suggestions panel. Would you prefer over-ear headphones or earbuds?"
        );
    }

    #[test]
    fn test_concierge_has_its_own_fallback() {
        let overlay = ASSISTANT_RULES.respond("order status", None, &[]).unwrap();
        let concierge = CONCIERGE_RULES.respond("order status", None, &[]).unwrap();
        assert_ne!(overlay, concierge);
        assert!(concierge.contains("price range"));
    }
}
