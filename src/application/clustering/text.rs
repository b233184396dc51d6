//! Text normalization shared by key extraction and similarity scoring.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Bare four-digit years. Two titles that both mention "2025" are not the
/// same event because of it.
static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid year regex")
});

// ── Stop words ──────────────────────────────────────────────────────

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    FUNCTION_WORDS
        .iter()
        .chain(CALENDAR_WORDS)
        .chain(MARKET_JARGON)
        .copied()
        .collect()
});

const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "if", "of", "in", "on", "at", "to", "for",
    "by", "with", "from", "as", "into", "onto", "than", "then", "so", "too", "very", "just",
    "is", "are", "was", "were", "be", "been", "being", "am", "will", "would", "shall",
    "should", "can", "could", "may", "might", "must", "do", "does", "did", "done", "has",
    "have", "had", "not", "this", "that", "these", "those", "it", "its", "there", "their",
    "they", "them", "he", "she", "his", "her", "him", "we", "our", "you", "your", "who",
    "whom", "whose", "what", "when", "where", "which", "why", "how", "over", "under",
    "above", "below", "more", "less", "most", "least", "before", "after", "between",
    "during", "out", "up", "down", "about", "any", "all", "each", "other", "some", "such",
    "only", "own", "same", "again", "against", "via", "per", "versus", "another",
];

const CALENDAR_WORDS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "january", "february", "march", "april", "june", "july", "august", "september",
    "october", "november", "december", "jan", "feb", "mar", "apr", "jun", "jul", "aug",
    "sep", "sept", "oct", "nov", "dec", "today", "tomorrow", "tonight", "yesterday",
    "week", "weekend", "month", "year", "day", "days", "end",
];

const MARKET_JARGON: &[&str] = &[
    "market", "markets", "odds", "bet", "bets", "betting", "price", "prices", "chance",
    "chances", "probability", "predict", "prediction", "predictions", "happen", "resolve",
    "resolves", "resolution", "yes", "no", "contract", "contracts", "trade", "trading",
    "outcome", "outcomes", "event", "events", "question", "win", "wins", "winner",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

// ── Normalization ───────────────────────────────────────────────────

/// Replace bare years with a space.
pub fn strip_years(text: &str) -> String {
    YEAR_PATTERN.replace_all(text, " ").into_owned()
}

/// Lowercase, turn every non-alphanumeric character into a separator and split.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Year-stripped tokens with stop words and tokens of two chars or fewer removed.
pub fn content_tokens(text: &str) -> Vec<String> {
    tokenize(&strip_years(text))
        .into_iter()
        .filter(|t| t.chars().count() > 2 && !is_stop_word(t))
        .collect()
}

/// Word set used for Jaccard scoring: content tokens longer than three chars.
pub fn similarity_words(text: &str) -> HashSet<String> {
    content_tokens(text)
        .into_iter()
        .filter(|t| t.chars().count() > 3)
        .collect()
}

/// Lowercased alphanumeric core of a single original-case word, e.g.
/// `"U.S."` → `"us"`, `"O'Brien"` → `"obrien"`.
pub fn squash_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
