//! Rule-based intent classification.
//!
//! Evaluation order is fixed: cancellation scan, navigation pattern, command
//! rules, then domain predicates in priority order. The first three stages
//! always produce a single intent; only the domain stage can produce several.

use tracing::debug;

use super::normalize::{contains_any, contains_phrase, find_phrase, is_url_shaped, normalize, words};
use super::types::{Domain, Intent, IntentTag, Slots, TimeRange, Utterance};
use crate::config::ClassifierConfig;
use crate::view_mode::ViewMode;
use crate::zone::ZoneContext;

/// Keyword predicate plus category vocabulary for one domain.
struct DomainRule {
    domain: Domain,
    keywords: &'static [&'static str],
    categories: &'static [&'static str],
}

impl DomainRule {
    fn matches(&self, words: &[&str]) -> bool {
        contains_any(words, self.keywords)
    }

    fn category(&self, words: &[&str]) -> Option<String> {
        self.categories
            .iter()
            .find(|c| contains_phrase(words, c))
            .map(|c| (*c).to_owned())
    }
}

/// Domain rules in priority order.
const DOMAIN_RULES: &[DomainRule] = &[
    DomainRule {
        domain: Domain::Stocks,
        keywords: &[
            "stock", "stocks", "market", "markets", "shares", "ticker", "trading", "investing",
            "portfolio",
        ],
        categories: &["tech", "energy", "crypto", "finance", "health"],
    },
    DomainRule {
        domain: Domain::Weather,
        keywords: &[
            "weather",
            "forecast",
            "temperature",
            "rain",
            "raining",
            "snow",
            "snowing",
            "sunny",
            "umbrella",
        ],
        categories: &[],
    },
    DomainRule {
        domain: Domain::Events,
        keywords: &[
            "event", "events", "concert", "concerts", "festival", "festivals", "meetup",
            "meetups", "happening",
        ],
        categories: &["music", "tech", "sports", "art", "food", "comedy"],
    },
    DomainRule {
        domain: Domain::Creators,
        keywords: &[
            "creator",
            "creators",
            "streamer",
            "streamers",
            "streaming",
            "live stream",
            "twitch",
        ],
        categories: &["gaming", "music", "art", "tech"],
    },
    DomainRule {
        domain: Domain::Movies,
        keywords: &["movie", "movies", "film", "films", "cinema", "series", "tv show"],
        categories: &[
            "comedy",
            "horror",
            "drama",
            "action",
            "romance",
            "documentary",
            "animation",
            "thriller",
        ],
    },
    DomainRule {
        domain: Domain::Wellness,
        keywords: &[
            "wellness",
            "meditation",
            "meditate",
            "breathing",
            "breathe",
            "stretch",
            "stretching",
            "relax",
            "stress",
            "mindfulness",
            "streak",
        ],
        categories: &[],
    },
    DomainRule {
        domain: Domain::Progress,
        keywords: &["progress", "achievements", "badges", "my stats", "visited"],
        categories: &[],
    },
];

/// A single-intent command rule: returns a tag when it claims the utterance.
type CommandRule = fn(&[&str]) -> Option<IntentTag>;

/// Command rules in evaluation order.
const COMMAND_RULES: &[CommandRule] = &[
    url_command,
    view_mode_command,
    help_command,
    clear_history_command,
    where_am_i_command,
];

const NAVIGATION_PREFIXES: &[&str] = &["go to", "take me to", "navigate to", "bring me to"];

const LEADING_FILLER: &[&str] = &[
    "hey", "ok", "okay", "please", "can you", "could you", "would you", "will you", "now",
    "just", "i want to", "i would like to", "let us", "lets",
];

const TIME_PHRASES: &[(&str, TimeRange)] = &[
    ("today", TimeRange::Today),
    ("tonight", TimeRange::Tonight),
    ("tomorrow", TimeRange::Tomorrow),
    ("this weekend", TimeRange::ThisWeekend),
    ("weekend", TimeRange::ThisWeekend),
    ("this week", TimeRange::ThisWeek),
    ("next week", TimeRange::NextWeek),
    ("this month", TimeRange::ThisMonth),
];

/// Words that end a captured location or search term.
const SLOT_TERMINATORS: &[&str] = &[
    "today", "tonight", "tomorrow", "this", "next", "weekend", "in", "for", "near", "at",
    "about", "called", "please",
];

const LOCATION_PREPOSITIONS: &[&str] = &["in", "for", "near", "at"];

/// Rule-driven classifier. Built once per assistant from [`ClassifierConfig`].
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    cancel_keywords: Vec<String>,
    conjunctions: Vec<String>,
}

impl IntentClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        let clean = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|k| normalize(k))
                .filter(|k| !k.is_empty())
                .collect()
        };
        Self {
            cancel_keywords: clean(&config.cancel_keywords),
            conjunctions: clean(&config.conjunctions),
        }
    }

    /// Classify one utterance in the context of the current zone.
    ///
    /// Returns an empty list only for input that normalizes to nothing.
    pub fn classify(&self, utterance: &Utterance, zone: &ZoneContext) -> Vec<Intent> {
        let text = normalize(&utterance.text);
        if text.is_empty() {
            return Vec::new();
        }
        let words = words(&text);

        if self.is_cancel(&words) {
            return vec![Intent::bare(IntentTag::Cancel)];
        }

        if let Some(target) = navigation_target(&words) {
            return vec![Intent::bare(IntentTag::Navigate { target })];
        }

        if let Some(tag) = COMMAND_RULES.iter().find_map(|rule| rule(&words)) {
            return vec![Intent::bare(tag)];
        }

        let matched: Vec<&DomainRule> = DOMAIN_RULES.iter().filter(|r| r.matches(&words)).collect();
        if matched.is_empty() {
            debug!(zone = %zone.id, "no rule matched, falling back");
            return vec![Intent::bare(IntentTag::Fallback {
                suggestions: fallback_suggestions(zone),
            })];
        }

        let conjunction = self.has_conjunction(&words);
        let take = if conjunction { matched.len() } else { 1 };
        if matched.len() > 1 && !conjunction {
            debug!(
                matched = matched.len(),
                "several domains matched without a conjunction, keeping the first"
            );
        }

        let shared = shared_slots(&words);
        let clauses = self.clauses(&words);
        matched
            .into_iter()
            .take(take)
            .map(|rule| {
                let clause = clauses
                    .iter()
                    .copied()
                    .find(|clause| rule.matches(clause))
                    .unwrap_or(words.as_slice());
                Intent::domain(rule.domain, clause_slots(rule, clause, &words, &shared))
            })
            .collect()
    }

    /// Split on conjunction phrases; empty pieces are dropped.
    fn clauses<'w, 'a>(&self, words: &'w [&'a str]) -> Vec<&'w [&'a str]> {
        let mut clauses = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < words.len() {
            let joined = self.conjunctions.iter().find_map(|c| {
                let needle: Vec<&str> = c.split_whitespace().collect();
                words[i..].starts_with(&needle).then_some(needle.len())
            });
            match joined {
                Some(len) => {
                    if i > start {
                        clauses.push(&words[start..i]);
                    }
                    i += len;
                    start = i;
                }
                None => i += 1,
            }
        }
        if start < words.len() {
            clauses.push(&words[start..]);
        }
        clauses
    }

    fn is_cancel(&self, words: &[&str]) -> bool {
        self.cancel_keywords.iter().any(|k| contains_phrase(words, k))
    }

    fn has_conjunction(&self, words: &[&str]) -> bool {
        self.conjunctions.iter().any(|c| contains_phrase(words, c))
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

fn fallback_suggestions(zone: &ZoneContext) -> Vec<String> {
    if zone.prompts.is_empty() {
        vec!["Help".to_owned()]
    } else {
        zone.prompts.clone()
    }
}

/// Drop polite lead-ins so commands can be anchored at the start.
fn strip_filler<'w, 'a>(mut words: &'w [&'a str]) -> &'w [&'a str] {
    while let Some(len) = LEADING_FILLER.iter().find_map(|filler| {
        let needle: Vec<&str> = filler.split_whitespace().collect();
        words.starts_with(&needle).then_some(needle.len())
    }) {
        words = &words[len..];
    }
    words
}

/// `go to X`, `take me to X`, `navigate to X`, or `open the X zone`, said
/// at the start of the utterance.
fn navigation_target(words: &[&str]) -> Option<String> {
    let words = strip_filler(words);
    for prefix in NAVIGATION_PREFIXES {
        let needle: Vec<&str> = prefix.split_whitespace().collect();
        if words.starts_with(&needle) && words.len() > needle.len() {
            return Some(words[needle.len()..].join(" "));
        }
    }
    let rest = words.strip_prefix(&["open"])?;
    if rest.len() >= 2 && rest.last() == Some(&"zone") && !rest.iter().any(|w| is_url_shaped(w)) {
        return Some(rest.join(" "));
    }
    None
}

fn url_command(words: &[&str]) -> Option<IntentTag> {
    if !contains_any(words, &["open", "visit", "launch"]) {
        return None;
    }
    let url = words
        .iter()
        .filter(|w| is_url_shaped(w))
        .find_map(|w| absolute_url(w));
    Some(match url {
        Some(url) => IntentTag::OpenUrl { url },
        None => IntentTag::InvalidUrl,
    })
}

/// Validate a URL-shaped token; `www.` tokens get an `https://` scheme.
fn absolute_url(token: &str) -> Option<String> {
    let candidate = if token.to_lowercase().starts_with("www.") {
        format!("https://{token}")
    } else {
        token.to_owned()
    };
    let parsed = url::Url::parse(&candidate).ok()?;
    let host = parsed.host_str()?;
    if !matches!(parsed.scheme(), "http" | "https") || !host.contains('.') {
        return None;
    }
    Some(parsed.to_string())
}

fn view_mode_command(words: &[&str]) -> Option<IntentTag> {
    let mode = if contains_phrase(words, "focus mode") {
        ViewMode::Focus
    } else if contains_any(words, &["simple mode", "minimal mode"]) {
        ViewMode::Simple
    } else if contains_any(words, &["full mode", "show everything"]) {
        ViewMode::Full
    } else {
        return None;
    };
    Some(IntentTag::SetViewMode { mode })
}

fn help_command(words: &[&str]) -> Option<IntentTag> {
    let bare_help = matches!(words, ["help"] | ["help", "me"] | ["help", "please"]);
    (bare_help || contains_any(words, &["what can you do", "what can i say", "show commands"]))
        .then_some(IntentTag::Help)
}

fn clear_history_command(words: &[&str]) -> Option<IntentTag> {
    contains_any(words, &["clear chat", "clear history", "clear the chat"])
        .then_some(IntentTag::ClearHistory)
}

fn where_am_i_command(words: &[&str]) -> Option<IntentTag> {
    contains_any(words, &["where am i", "what zone is this", "which zone is this"])
        .then_some(IntentTag::WhereAmI)
}

/// Slots for one domain, read from its own clause first.
///
/// A clause without its own location, search term or time range inherits
/// the value found in the whole utterance.
fn clause_slots(rule: &DomainRule, clause: &[&str], words: &[&str], shared: &Slots) -> Slots {
    Slots {
        category: rule.category(clause).or_else(|| rule.category(words)),
        time_range: time_range(clause).or(shared.time_range),
        location: location(clause).or_else(|| shared.location.clone()),
        search_term: search_term(clause).or_else(|| shared.search_term.clone()),
    }
}

/// Slots every domain intent of one utterance shares.
fn shared_slots(words: &[&str]) -> Slots {
    Slots {
        category: None,
        time_range: time_range(words),
        location: location(words),
        search_term: search_term(words),
    }
}

fn time_range(words: &[&str]) -> Option<TimeRange> {
    TIME_PHRASES
        .iter()
        .find(|(phrase, _)| contains_phrase(words, phrase))
        .map(|(_, range)| *range)
}

fn is_domain_keyword(word: &str) -> bool {
    DOMAIN_RULES.iter().any(|r| r.keywords.contains(&word))
}

fn is_terminator(word: &str, conjunctions: &[&str]) -> bool {
    SLOT_TERMINATORS.contains(&word) || conjunctions.contains(&word) || is_domain_keyword(word)
}

/// Words following `start` up to the next terminator, at most `limit` words.
fn capture(words: &[&str], start: usize, limit: usize) -> Option<String> {
    const SINGLE_WORD_CONJUNCTIONS: &[&str] = &["and", "plus", "also", "with", "as"];
    let taken: Vec<&str> = words
        .iter()
        .skip(start)
        .take_while(|w| !is_terminator(w, SINGLE_WORD_CONJUNCTIONS))
        .take(limit)
        .copied()
        .filter(|w| !matches!(*w, "the" | "a" | "an" | "some"))
        .collect();
    (!taken.is_empty()).then(|| taken.join(" "))
}

/// Text after `in`/`for`/`near`/`at`, or a postal-code-shaped token.
fn location(words: &[&str]) -> Option<String> {
    for (i, word) in words.iter().enumerate() {
        if !LOCATION_PREPOSITIONS.contains(word) {
            continue;
        }
        let after = words.get(i + 1).copied();
        if matches!(after, Some("me" | "my" | "us" | "you")) {
            continue;
        }
        if *word == "for" && i > 0 && matches!(words[i - 1], "search" | "look" | "looking") {
            continue;
        }
        if let Some(place) = capture(words, i + 1, 4) {
            return Some(place);
        }
    }
    words
        .iter()
        .find(|w| is_postal_code(w))
        .map(|w| (*w).to_owned())
}

/// US ZIP (`12345`) or the first half of a Canadian postal code (`m5v`).
fn is_postal_code(token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    match chars.as_slice() {
        [a, b, c, d, e] => [a, b, c, d, e].iter().all(|c| c.is_ascii_digit()),
        [a, b, c] => a.is_ascii_alphabetic() && b.is_ascii_digit() && c.is_ascii_alphabetic(),
        [a, b, c, d, e, f] => {
            a.is_ascii_alphabetic()
                && b.is_ascii_digit()
                && c.is_ascii_alphabetic()
                && d.is_ascii_digit()
                && e.is_ascii_alphabetic()
                && f.is_ascii_digit()
        }
        _ => false,
    }
}

/// Text after `called`, `about`, `search for` or `find`, most specific first.
fn search_term(words: &[&str]) -> Option<String> {
    ["called", "about", "search for", "look for", "find"]
        .iter()
        .find_map(|trigger| {
            let at = find_phrase(words, trigger)?;
            capture(words, at + trigger.split_whitespace().count(), 6)
        })
}
