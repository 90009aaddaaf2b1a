//! Response fragments and the plain-text view used for narration.

use serde::{Deserialize, Serialize};

use crate::intent::IntentTag;
use crate::router::PendingNavigation;

/// The rendered outcome of one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub tag: IntentTag,
    /// Light markdown.
    pub body: String,
    /// `false` for degraded placeholders (source failure, timeout, panic).
    pub ok: bool,
}

impl Fragment {
    pub fn ok(tag: IntentTag, body: impl Into<String>) -> Self {
        Self {
            tag,
            body: body.into(),
            ok: true,
        }
    }

    pub fn degraded(tag: IntentTag, body: impl Into<String>) -> Self {
        Self {
            tag,
            body: body.into(),
            ok: false,
        }
    }

    /// Placeholder for a source that failed, timed out or crashed.
    pub fn unavailable(tag: IntentTag) -> Self {
        let body = format!(
            "**{}** is unavailable right now. Please try again in a moment.",
            title_case(tag.name())
        );
        Self::degraded(tag, body)
    }
}

/// Everything the assistant produces for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Fragments in intent detection order.
    pub fragments: Vec<Fragment>,
    /// Markup-free text for speech synthesis. `None` = nothing to say.
    pub narration: Option<String>,
    /// Announced navigation awaiting commit.
    pub navigation: Option<PendingNavigation>,
    /// At least one fragment is a degraded placeholder.
    pub degraded: bool,
}

impl Response {
    /// Compose fragments into one response with narration derived from them.
    pub fn compose(fragments: Vec<Fragment>) -> Self {
        let degraded = fragments.iter().any(|f| !f.ok);
        let narration = narration_for(&fragments);
        Self {
            fragments,
            narration,
            navigation: None,
            degraded,
        }
    }

    pub fn single(fragment: Fragment) -> Self {
        Self::compose(vec![fragment])
    }

    /// A response that is shown but never narrated.
    pub fn silent(fragment: Fragment) -> Self {
        Self {
            narration: None,
            ..Self::single(fragment)
        }
    }

    pub fn with_navigation(mut self, navigation: PendingNavigation) -> Self {
        self.navigation = Some(navigation);
        self
    }

    /// Combined markdown body, fragments separated by blank lines.
    pub fn body(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.body.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn narration_for(fragments: &[Fragment]) -> Option<String> {
    let spoken: Vec<String> = fragments
        .iter()
        .map(|f| sentences(&strip_markup(&f.body)))
        .filter(|s| !s.is_empty())
        .collect();
    (!spoken.is_empty()).then(|| spoken.join(" "))
}

/// Join lines into one utterance, ending each with sentence punctuation.
fn sentences(plain: &str) -> String {
    plain
        .lines()
        .map(|line| {
            if line.ends_with(['.', '!', '?', ':']) {
                line.to_owned()
            } else {
                format!("{line}.")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip markdown to plain text via `pulldown_cmark`, one line per block.
pub fn strip_markup(markdown: &str) -> String {
    use pulldown_cmark::{Event, Parser, TagEnd};

    let mut out = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => out.push('\n'),
            _ => {}
        }
    }
    out.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Uppercase the first character.
pub(crate) fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
