//! Per-zone metadata: name, icon, path and canned prompts.
//!
//! Zones are static configuration. The registry is built once at startup and
//! shared read-only (behind an `Arc`) by the classifier, router and handlers.

use serde::{Deserialize, Serialize};

/// Immutable description of one zone of the host experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneContext {
    /// Stable identifier (e.g. `"weather"`).
    pub id: String,
    /// Display name (e.g. `"Weather Station"`).
    pub name: String,
    /// Icon shown next to the zone name.
    #[serde(default)]
    pub icon: String,
    /// Location path the host navigates to.
    pub path: String,
    /// One-line description used by "where am I".
    #[serde(default)]
    pub description: String,
    /// Suggested prompts shown in fallback and help responses.
    #[serde(default)]
    pub prompts: Vec<String>,
    /// Extra spoken names accepted as navigation targets.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ZoneContext {
    /// `"<icon> <name>"`, or just the name when there is no icon.
    pub fn label(&self) -> String {
        if self.icon.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.icon, self.name)
        }
    }

    fn answers_to(&self, target: &str) -> bool {
        let target = normalize_target(target);
        normalize_target(&self.id) == target
            || normalize_target(&self.name) == target
            || self.aliases.iter().any(|a| normalize_target(a) == target)
    }
}

/// Lowercase, drop a leading "the" and a trailing "zone"/"page"/"area".
fn normalize_target(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let mut words: Vec<&str> = lower.split_whitespace().collect();
    if words.first() == Some(&"the") {
        words.remove(0);
    }
    if matches!(words.last(), Some(&("zone" | "page" | "area" | "section"))) {
        words.pop();
    }
    words.join(" ")
}

/// Read-only lookup over all configured zones.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: Vec<ZoneContext>,
}

impl ZoneRegistry {
    /// Build a registry. The first zone is the default ("home") zone; an
    /// empty list falls back to the built-in zones.
    pub fn new(zones: Vec<ZoneContext>) -> Self {
        if zones.is_empty() {
            return Self::builtin();
        }
        Self { zones }
    }

    /// The zones shipped with the application.
    pub fn builtin() -> Self {
        Self {
            zones: builtin_zones(),
        }
    }

    /// Zone by exact id.
    pub fn get(&self, id: &str) -> Option<&ZoneContext> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Zone matching a spoken navigation target (id, name or alias).
    pub fn resolve(&self, target: &str) -> Option<&ZoneContext> {
        self.zones.iter().find(|z| z.answers_to(target))
    }

    /// The zone used when no current zone is known.
    pub fn home(&self) -> &ZoneContext {
        // `new` never stores an empty list.
        &self.zones[0]
    }

    /// Current zone by id, falling back to the home zone.
    pub fn current_or_home(&self, id: Option<&str>) -> &ZoneContext {
        id.and_then(|id| self.get(id)).unwrap_or_else(|| self.home())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneContext> {
        self.zones.iter()
    }

    /// Display names of all zones, in configuration order.
    pub fn names(&self) -> Vec<&str> {
        self.zones.iter().map(|z| z.name.as_str()).collect()
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn zone(
    id: &str,
    name: &str,
    icon: &str,
    path: &str,
    description: &str,
    prompts: &[&str],
    aliases: &[&str],
) -> ZoneContext {
    ZoneContext {
        id: id.to_owned(),
        name: name.to_owned(),
        icon: icon.to_owned(),
        path: path.to_owned(),
        description: description.to_owned(),
        prompts: prompts.iter().map(|p| (*p).to_owned()).collect(),
        aliases: aliases.iter().map(|a| (*a).to_owned()).collect(),
    }
}

fn builtin_zones() -> Vec<ZoneContext> {
    vec![
        zone(
            "hub",
            "Central Hub",
            "🏠",
            "/",
            "The central plaza that links every zone.",
            &["What's happening this weekend?", "Take me to the weather zone", "Help"],
            &["home", "hub", "plaza", "start"],
        ),
        zone(
            "weather",
            "Weather Station",
            "🌦️",
            "/weather",
            "Live conditions and forecasts for any city.",
            &["Weather for Toronto", "Will it rain tomorrow in London?"],
            &["weather", "forecast"],
        ),
        zone(
            "events",
            "Events Pavilion",
            "🎟️",
            "/events",
            "Upcoming concerts, meetups and festivals.",
            &["Music events this weekend", "Tech events near Berlin"],
            &["events", "pavilion"],
        ),
        zone(
            "markets",
            "Market Floor",
            "📈",
            "/markets",
            "Daily stock insights and sector moves.",
            &["Stock insights", "How is tech doing in the market?"],
            &["stocks", "market", "markets"],
        ),
        zone(
            "creators",
            "Creator Lounge",
            "🎥",
            "/creators",
            "Who is streaming right now.",
            &["Which creators are live?", "Is anyone streaming?"],
            &["creators", "streamers", "lounge"],
        ),
        zone(
            "cinema",
            "Cinema",
            "🍿",
            "/cinema",
            "Search films and series.",
            &["Find movies about space", "Recommend a comedy movie"],
            &["movies", "films", "theater", "theatre"],
        ),
        zone(
            "wellness",
            "Wellness Garden",
            "🧘",
            "/wellness",
            "Breathing, stretching and habit streaks.",
            &["Give me a wellness tip", "Show my streak"],
            &["wellness", "garden", "meditation"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn resolves_by_id_name_and_alias() {
        let zones = ZoneRegistry::builtin();
        assert_eq!(zones.resolve("weather").unwrap().id, "weather");
        assert_eq!(zones.resolve("Weather Station").unwrap().id, "weather");
        assert_eq!(zones.resolve("the movies zone").unwrap().id, "cinema");
        assert_eq!(zones.resolve("  STOCKS ").unwrap().id, "markets");
    }

    #[test]
    fn unknown_target_resolves_to_nothing() {
        let zones = ZoneRegistry::builtin();
        assert!(zones.resolve("nonexistentzone").is_none());
        assert!(zones.resolve("").is_none());
    }

    #[test]
    fn empty_list_uses_builtin_zones() {
        let zones = ZoneRegistry::new(Vec::new());
        assert_eq!(zones.home().id, "hub");
        assert!(zones.iter().count() > 1);
    }

    #[test]
    fn current_or_home_falls_back() {
        let zones = ZoneRegistry::builtin();
        assert_eq!(zones.current_or_home(Some("cinema")).id, "cinema");
        assert_eq!(zones.current_or_home(Some("nope")).id, "hub");
        assert_eq!(zones.current_or_home(None).id, "hub");
    }

    #[test]
    fn every_builtin_zone_has_prompts() {
        for zone in ZoneRegistry::builtin().iter() {
            assert!(!zone.prompts.is_empty(), "{} has no prompts", zone.id);
            assert!(zone.path.starts_with('/'));
        }
    }
}
