//! Lookup keys for cross-platform candidate discovery.
//!
//! Keys are a precision-first index, never proof that two clusters describe
//! the same event: every key collision still goes through the similarity
//! check before a merge. A text can yield between zero and four keys:
//!
//! - **Proper-noun keys**: the longest run of capitalized words, plus the
//!   first two runs joined (`lakers_celtics`).
//! - **Fallback words key**: the first three content words, only when no
//!   proper-noun key exists.
//! - **Pairing key**: `vs_` + both sides of an "A vs B" matchup, sorted.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::text::{content_tokens, is_stop_word, similarity_words, squash_word, strip_years};

/// `<token> vs|versus|v|@ <token>`, case-insensitive.
static PAIRING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z0-9]+)\s+(?:vs\.?|versus|v\.?|@)\s+([a-z0-9]+)\b")
        .expect("valid pairing regex")
});

/// A proper-noun run must be longer than this to be a key on its own.
const MIN_RUN_KEY_LEN: usize = 4;
/// Fallback key needs at least this many content words...
const FALLBACK_MIN_TOKENS: usize = 3;
/// ...of which at least this many are "long" (four chars or more).
const FALLBACK_MIN_LONG_TOKENS: usize = 2;

/// Everything Phase D needs to know about one cluster's text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyProfile {
    pub keys: Vec<String>,
    pub words: HashSet<String>,
}

impl KeyProfile {
    pub fn from_text(text: &str) -> Self {
        Self {
            keys: extract_keys(text),
            words: similarity_words(text),
        }
    }

    pub fn is_unkeyable(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Derive 0–4 lookup keys from representative text.
pub fn extract_keys(text: &str) -> Vec<String> {
    let stripped = strip_years(text);
    let mut keys: Vec<String> = Vec::with_capacity(4);

    let runs = proper_noun_runs(&stripped);
    if let Some(longest) = longest_run(&runs) {
        if longest.chars().count() > MIN_RUN_KEY_LEN {
            keys.push(longest.to_string());
        }
    }
    if runs.len() >= 2 {
        keys.push(format!("{}_{}", runs[0], runs[1]));
    }

    if keys.is_empty() {
        if let Some(fallback) = fallback_key(&stripped) {
            keys.push(fallback);
        }
    }

    if let Some(pairing) = pairing_key(&stripped) {
        keys.push(pairing);
    }

    let mut seen = HashSet::new();
    keys.retain(|k| seen.insert(k.clone()));
    keys
}

/// `vs_` key for "A vs B" style matchups, independent of side order.
pub fn pairing_key(text: &str) -> Option<String> {
    PAIRING_PATTERN.captures_iter(text).find_map(|caps| {
        let left = caps.get(1)?.as_str().to_lowercase();
        let right = caps.get(2)?.as_str().to_lowercase();
        if is_stop_word(&left) || is_stop_word(&right) {
            return None;
        }
        let (first, second) = if left <= right { (left, right) } else { (right, left) };
        Some(format!("vs_{first}_{second}"))
    })
}

/// Distinct runs of consecutive capitalized words, lowercased and
/// underscore-joined, in order of first appearance.
///
/// Punctuation attached to a word ends the run it belongs to, so
/// "Celtics - Who" is two runs. Each run is joined whole ("Will Trump" →
/// `will_trump`) and discarded only when the joined run is itself a stop
/// word ("Will" alone).
pub fn proper_noun_runs(text: &str) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for raw in text.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        let leading_break = raw.starts_with(|c: char| !c.is_alphanumeric());
        let trailing_break = raw.ends_with(|c: char| !c.is_alphanumeric());

        if leading_break {
            flush_run(&mut current, &mut runs);
        }

        if is_capitalized(word) {
            let squashed = squash_word(word);
            if !squashed.is_empty() {
                current.push(squashed);
            }
        } else {
            flush_run(&mut current, &mut runs);
        }

        if trailing_break {
            flush_run(&mut current, &mut runs);
        }
    }
    flush_run(&mut current, &mut runs);

    runs
}

fn flush_run(current: &mut Vec<String>, runs: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let run = std::mem::take(current).join("_");
    if !is_stop_word(&run) && !runs.contains(&run) {
        runs.push(run);
    }
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Longest run by character count; the earliest wins ties.
fn longest_run(runs: &[String]) -> Option<&str> {
    let mut best: Option<&str> = None;
    for run in runs {
        match best {
            Some(b) if b.chars().count() >= run.chars().count() => {}
            _ => best = Some(run.as_str()),
        }
    }
    best
}

fn fallback_key(text: &str) -> Option<String> {
    let tokens = content_tokens(text);
    if tokens.len() < FALLBACK_MIN_TOKENS {
        return None;
    }
    let long = tokens.iter().filter(|t| t.chars().count() >= 4).count();
    if long < FALLBACK_MIN_LONG_TOKENS {
        return None;
    }
    Some(tokens[..FALLBACK_MIN_TOKENS].join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_key_is_order_independent() {
        assert_eq!(pairing_key("Lakers vs Celtics"), Some("vs_celtics_lakers".into()));
        assert_eq!(pairing_key("Celtics vs Lakers"), Some("vs_celtics_lakers".into()));
        assert_eq!(pairing_key("celtics VERSUS lakers"), Some("vs_celtics_lakers".into()));
        assert_eq!(pairing_key("Lakers @ Celtics"), Some("vs_celtics_lakers".into()));
        assert_eq!(pairing_key("Lakers v. Celtics"), Some("vs_celtics_lakers".into()));
    }

    #[test]
    fn test_pairing_key_rejects_stop_words() {
        assert_eq!(pairing_key("the vs them"), None);
        assert_eq!(pairing_key("Who wins tonight"), None);
    }

    #[test]
    fn test_proper_noun_runs_break_on_punctuation() {
        let runs = proper_noun_runs("Lakers vs Celtics - Who wins?");
        assert_eq!(runs, vec!["lakers", "celtics"]);
    }

    #[test]
    fn test_proper_noun_runs_join_consecutive_words() {
        let runs = proper_noun_runs("Will Donald Trump visit New York City?");
        assert_eq!(runs, vec!["will_donald_trump", "new_york_city"]);
    }

    #[test]
    fn test_leading_stop_word_stays_in_run() {
        assert_eq!(proper_noun_runs("Will Trump Win"), vec!["will_trump_win"]);
        assert_eq!(
            extract_keys("Will Trump visit Canada"),
            vec!["will_trump", "will_trump_canada"]
        );
    }

    #[test]
    fn test_lone_stop_word_run_is_dropped() {
        assert_eq!(proper_noun_runs("Will the Lakers win?"), vec!["lakers"]);
    }

    #[test]
    fn test_proper_noun_runs_are_distinct() {
        let runs = proper_noun_runs("Bitcoin or Bitcoin Cash? Bitcoin");
        assert_eq!(runs, vec!["bitcoin", "bitcoin_cash"]);
    }

    #[test]
    fn test_keys_for_matchup_question() {
        let keys = extract_keys("Will the Lakers beat the Celtics?");
        assert_eq!(keys, vec!["celtics", "lakers_celtics"]);
    }

    #[test]
    fn test_keys_for_vs_title_include_pairing() {
        let keys = extract_keys("Lakers vs Celtics - Who wins?");
        assert_eq!(keys, vec!["celtics", "lakers_celtics", "vs_celtics_lakers"]);
    }

    #[test]
    fn test_short_single_run_falls_back_to_words() {
        // "NYC" is a run, but too short to be a key on its own.
        let keys = extract_keys("NYC snowfall over 30 inches?");
        assert_eq!(keys, vec!["nyc_snowfall_inches"]);
    }

    #[test]
    fn test_fallback_needs_long_words() {
        assert!(extract_keys("fed cut rate").is_empty());
        assert_eq!(extract_keys("bitcoin above hundred thousand"), vec!["bitcoin_hundred_thousand"]);
    }

    #[test]
    fn test_years_do_not_produce_keys() {
        assert!(extract_keys("2024").is_empty());
        let keys = extract_keys("Super Bowl 2025 champion");
        assert_eq!(keys, vec!["super_bowl"]);
    }

    #[test]
    fn test_empty_text_has_no_keys() {
        let profile = KeyProfile::from_text("");
        assert!(profile.is_unkeyable());
        assert!(profile.words.is_empty());
    }
}
