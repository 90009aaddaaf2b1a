//! Text normalization and word-boundary phrase matching.
//!
//! Typed and transcribed input arrive with arbitrary casing, punctuation and
//! contractions. Everything downstream works on the normalized word list, so
//! "Stop!" and "stop" compare equal while "stock" never matches "stop".

/// Common English contractions, expanded so "what's" matches "what is".
const CONTRACTIONS: &[(&str, &str)] = &[
    ("what's", "what is"),
    ("where's", "where is"),
    ("who's", "who is"),
    ("how's", "how is"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("it's", "it is"),
    ("let's", "let us"),
    ("i'm", "i am"),
    ("i'll", "i will"),
    ("i've", "i have"),
    ("i'd", "i would"),
    ("you're", "you are"),
    ("you'll", "you will"),
    ("we're", "we are"),
    ("they're", "they are"),
    ("can't", "cannot"),
    ("won't", "will not"),
    ("don't", "do not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("shouldn't", "should not"),
];

/// Lowercase, expand contractions, strip punctuation, collapse whitespace.
///
/// URL-shaped tokens keep their characters (and case) apart from trailing
/// sentence punctuation.
pub fn normalize(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for raw in text.split_whitespace() {
        let lower = raw.to_lowercase().replace('\u{2019}', "'");
        if is_url_shaped(&lower) {
            out.push(trim_url(raw).to_owned());
            continue;
        }
        let expanded = expand_contraction(lower.trim_matches(|c: char| !c.is_alphanumeric()));
        for word in expanded.split_whitespace() {
            let cleaned: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            if !cleaned.is_empty() {
                out.push(cleaned);
            }
        }
    }
    out.join(" ")
}

fn expand_contraction(word: &str) -> String {
    CONTRACTIONS
        .iter()
        .find(|(short, _)| *short == word)
        .map_or_else(|| word.to_owned(), |(_, long)| (*long).to_owned())
}

/// `http(s)://…` or `www.…`, case-insensitive.
pub fn is_url_shaped(token: &str) -> bool {
    let lower = token
        .trim_start_matches(['(', '"', '\'', '<'])
        .to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.")
}

fn trim_url(token: &str) -> &str {
    token
        .trim_start_matches(['(', '"', '\'', '<'])
        .trim_end_matches(['.', ',', '!', '?', ';', ':', ')', '"', '\'', '>'])
}

/// Split a phrase into its words.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Index of the first word-boundary occurrence of `phrase` in `words`.
pub fn find_phrase(words: &[&str], phrase: &str) -> Option<usize> {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return None;
    }
    words
        .windows(needle.len())
        .position(|window| window == needle.as_slice())
}

pub fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    find_phrase(words, phrase).is_some()
}

pub fn contains_any(words: &[&str], phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(words, p))
}
