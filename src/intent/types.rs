//! Intent data model: utterances, tags and slots.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::view_mode::ViewMode;

/// Where an utterance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtteranceSource {
    Typed,
    Spoken,
}

/// One raw user input, consumed by classification and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub source: UtteranceSource,
}

impl Utterance {
    pub fn typed(text: impl Into<String>) -> Self {
        Self::new(text, UtteranceSource::Typed)
    }

    pub fn spoken(text: impl Into<String>) -> Self {
        Self::new(text, UtteranceSource::Spoken)
    }

    fn new(text: impl Into<String>, source: UtteranceSource) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
            source,
        }
    }
}

/// Data domains, declared in classifier priority order.
///
/// Multi-intent output follows the classifier's rule table; the derived
/// `Ord` mirrors that order for callers that need to compare domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Stocks,
    Weather,
    Events,
    Creators,
    Movies,
    Wellness,
    Progress,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::Stocks,
        Domain::Weather,
        Domain::Events,
        Domain::Creators,
        Domain::Movies,
        Domain::Wellness,
        Domain::Progress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Stocks => "stocks",
            Domain::Weather => "weather",
            Domain::Events => "events",
            Domain::Creators => "creators",
            Domain::Movies => "movies",
            Domain::Wellness => "wellness",
            Domain::Progress => "progress",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relative time window mentioned in an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    Today,
    Tonight,
    Tomorrow,
    ThisWeek,
    ThisWeekend,
    NextWeek,
    ThisMonth,
}

impl TimeRange {
    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Today => "today",
            TimeRange::Tonight => "tonight",
            TimeRange::Tomorrow => "tomorrow",
            TimeRange::ThisWeek => "this week",
            TimeRange::ThisWeekend => "this weekend",
            TimeRange::NextWeek => "next week",
            TimeRange::ThisMonth => "this month",
        }
    }

    /// Inclusive calendar window relative to `today`. Weeks run Monday to Sunday.
    pub fn window(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let plus = |n: u64| today.checked_add_days(Days::new(n)).unwrap_or(today);
        let from_monday = u64::from(today.weekday().num_days_from_monday());
        let sunday = plus(6 - from_monday);
        match self {
            TimeRange::Today | TimeRange::Tonight => (today, today),
            TimeRange::Tomorrow => (plus(1), plus(1)),
            TimeRange::ThisWeek => (today, sunday),
            TimeRange::ThisWeekend => (plus(5u64.saturating_sub(from_monday)), sunday),
            TimeRange::NextWeek => (plus(7 - from_monday), plus(13 - from_monday)),
            TimeRange::ThisMonth => (today, last_day_of_month(today)),
        }
    }

    pub fn contains(self, today: NaiveDate, day: NaiveDate) -> bool {
        let (start, end) = self.window(today);
        start <= day && day <= end
    }
}

fn last_day_of_month(day: NaiveDate) -> NaiveDate {
    let (year, month) = if day.month() == 12 {
        (day.year() + 1, 1)
    } else {
        (day.year(), day.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(day)
}

/// Parameters extracted from the utterance text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots {
    pub category: Option<String>,
    pub time_range: Option<TimeRange>,
    pub location: Option<String>,
    pub search_term: Option<String>,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntentTag {
    /// Halt narration and discard in-flight work.
    Cancel,
    /// Move to another zone. The target is unresolved text.
    Navigate { target: String },
    /// Open an external link.
    OpenUrl { url: String },
    /// An "open" command without a usable link.
    InvalidUrl,
    SetViewMode { mode: ViewMode },
    Help,
    ClearHistory,
    WhereAmI,
    /// A data request answered by a handler.
    Domain { domain: Domain },
    /// Nothing matched; carries the current zone's prompts.
    Fallback { suggestions: Vec<String> },
}

impl IntentTag {
    /// Short name used in logs, events and placeholder fragments.
    pub fn name(&self) -> &'static str {
        match self {
            IntentTag::Cancel => "cancel",
            IntentTag::Navigate { .. } => "navigate",
            IntentTag::OpenUrl { .. } => "open_url",
            IntentTag::InvalidUrl => "invalid_url",
            IntentTag::SetViewMode { .. } => "view_mode",
            IntentTag::Help => "help",
            IntentTag::ClearHistory => "clear_history",
            IntentTag::WhereAmI => "where_am_i",
            IntentTag::Domain { domain } => domain.as_str(),
            IntentTag::Fallback { .. } => "fallback",
        }
    }

    pub fn domain(&self) -> Option<Domain> {
        match self {
            IntentTag::Domain { domain } => Some(*domain),
            _ => None,
        }
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified request: tag plus extracted slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub tag: IntentTag,
    #[serde(default)]
    pub slots: Slots,
}

impl Intent {
    /// An intent without slots.
    pub fn bare(tag: IntentTag) -> Self {
        Self {
            tag,
            slots: Slots::default(),
        }
    }

    pub fn domain(domain: Domain, slots: Slots) -> Self {
        Self {
            tag: IntentTag::Domain { domain },
            slots,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn domain_order_is_priority_order() {
        let mut shuffled = vec![Domain::Progress, Domain::Weather, Domain::Stocks];
        shuffled.sort();
        assert_eq!(shuffled, vec![Domain::Stocks, Domain::Weather, Domain::Progress]);
        assert!(Domain::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn weekend_window_from_midweek() {
        // 2026-10-14 is a Wednesday.
        let (start, end) = TimeRange::ThisWeekend.window(date(2026, 10, 14));
        assert_eq!(start, date(2026, 10, 17));
        assert_eq!(end, date(2026, 10, 18));
    }

    #[test]
    fn weekend_window_on_sunday_is_just_today() {
        let (start, end) = TimeRange::ThisWeekend.window(date(2026, 10, 18));
        assert_eq!(start, date(2026, 10, 18));
        assert_eq!(end, date(2026, 10, 18));
    }

    #[test]
    fn next_week_runs_monday_to_sunday() {
        let (start, end) = TimeRange::NextWeek.window(date(2026, 10, 14));
        assert_eq!(start, date(2026, 10, 19));
        assert_eq!(end, date(2026, 10, 25));
    }

    #[test]
    fn month_window_handles_december() {
        let (_, end) = TimeRange::ThisMonth.window(date(2026, 12, 3));
        assert_eq!(end, date(2026, 12, 31));
        let (_, end) = TimeRange::ThisMonth.window(date(2028, 2, 10));
        assert_eq!(end, date(2028, 2, 29));
    }

    #[test]
    fn tomorrow_excludes_today() {
        let today = date(2026, 10, 16);
        assert!(!TimeRange::Tomorrow.contains(today, today));
        assert!(TimeRange::Tomorrow.contains(today, date(2026, 10, 17)));
    }

    #[test]
    fn tag_names() {
        assert_eq!(
            IntentTag::Domain {
                domain: Domain::Movies
            }
            .name(),
            "movies"
        );
        assert_eq!(IntentTag::Cancel.to_string(), "cancel");
    }
}
