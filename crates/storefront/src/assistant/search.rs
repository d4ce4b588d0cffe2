//! Turning a chat message into a catalog search term.

use std::sync::LazyLock;

use regex::Regex;

/// Lead-in phrases; whatever follows the first one found is the query.
const LEAD_INS: [&str; 8] = [
    "find me",
    "show me",
    "looking for",
    "search for",
    "i need",
    "i want",
    "can you find",
    "recommend",
];

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,?!;:]").expect("Invalid regex"));

static FILLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(a|an|the|for|me|please|some|good|best)\b").expect("Invalid regex")
});

/// Extract a search term from a message.
///
/// The message is lowercased, narrowed to the text between the first lead-in
/// phrase found (in [`LEAD_INS`] order) and its next occurrence, and stripped
/// of punctuation and filler words.
#[must_use]
pub fn extract_search_term(message: &str) -> String {
    let text = message.to_lowercase();

    let term = LEAD_INS
        .iter()
        .find_map(|phrase| text.split(phrase).nth(1))
        .unwrap_or(text.as_str());

    let term = PUNCTUATION_RE.replace_all(term, "");
    let term = FILLER_RE.replace_all(&term, "");
    term.split_whitespace().collect::<Vec<_>>().join(" ")
}
