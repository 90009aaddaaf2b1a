//! Configuration types for the zone assistant.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use zone_sources::SourcesConfig;

use crate::error::{AgentError, Result};
use crate::zone::ZoneContext;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Intent classification vocabulary.
    pub classifier: ClassifierConfig,
    /// Announce-then-commit navigation timing.
    pub navigation: NavigationConfig,
    /// Multi-source fan-out settings.
    pub orchestrator: OrchestratorConfig,
    /// Capture and narration settings.
    pub speech: SpeechConfig,
    /// External data source endpoints.
    pub sources: SourcesConfig,
    /// Handler content and limits.
    pub handlers: HandlersConfig,
    /// Persisted state location.
    pub store: StoreConfig,
    /// Zone metadata. Empty means "use the built-in zones".
    pub zones: Vec<ZoneContext>,
}

/// Classifier vocabulary that deployments commonly tune.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Reserved words/phrases that halt narration ahead of anything else.
    pub cancel_keywords: Vec<String>,
    /// Markers that allow an utterance to be split into several domain intents.
    pub conjunctions: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            cancel_keywords: [
                "stop",
                "cancel",
                "be quiet",
                "shut up",
                "never mind",
                "nevermind",
                "quiet",
                "silence",
            ]
            .map(str::to_owned)
            .to_vec(),
            conjunctions: ["and", "plus", "along with", "as well as", "also"]
                .map(str::to_owned)
                .to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Delay between announcing a navigation and committing it (ms).
    ///
    /// Long enough for the start of the confirmation narration to be heard
    /// before the location change interrupts it.
    pub commit_delay_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: crate::router::NAVIGATION_COMMIT_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Per-handler timeout in ms. A handler exceeding it settles with an
    /// "unavailable" fragment. Set to 0 to wait indefinitely.
    pub handler_timeout_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            handler_timeout_ms: 8_000,
        }
    }
}

/// Capture and narration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether agent responses are narrated.
    pub narrate: bool,
    /// Seconds a capture session may stay open without a transcript.
    pub capture_timeout_s: u32,
    /// Preferred synthesis voice (engine-specific name). `None` = engine default.
    pub voice: Option<String>,
    /// Playback rate multiplier.
    pub rate: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            narrate: true,
            capture_timeout_s: 8,
            voice: None,
            rate: 1.0,
        }
    }
}

/// One canned market insight served by the stocks handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInsight {
    /// Sector tag used for category filtering (e.g. `"tech"`).
    pub sector: String,
    pub headline: String,
}

/// Handler content and rendering limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlersConfig {
    /// Location used by the weather handler when none was spoken.
    pub default_location: String,
    /// Days of forecast to render.
    pub forecast_days: u8,
    /// Maximum list items per fragment (events, films, creators).
    pub max_items: usize,
    /// Static market insights for the stocks handler.
    pub market_insights: Vec<MarketInsight>,
    /// Static tips for the wellness handler.
    pub wellness_tips: Vec<String>,
}

impl Default for HandlersConfig {
    fn default() -> Self {
        let insight = |sector: &str, headline: &str| MarketInsight {
            sector: sector.to_owned(),
            headline: headline.to_owned(),
        };
        Self {
            default_location: "Toronto".to_owned(),
            forecast_days: 3,
            max_items: 5,
            market_insights: vec![
                insight("tech", "Chipmakers lead the tech sector on strong data-center demand."),
                insight("energy", "Energy names drift lower as crude inventories build."),
                insight("crypto", "Crypto volumes stay thin; volatility remains elevated."),
                insight("finance", "Banks steady ahead of the next rate decision."),
                insight("health", "Healthcare is the quiet outperformer this month."),
            ],
            wellness_tips: [
                "Try box breathing: in for four, hold for four, out for four, hold for four.",
                "Stand up and roll your shoulders back ten times.",
                "Look at something twenty feet away for twenty seconds.",
                "Drink a glass of water before your next task.",
                "Take a two-minute walk between long sessions.",
            ]
            .map(str::to_owned)
            .to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the persisted state document. `None` = `app_dirs::state_file()`.
    pub path: Option<PathBuf>,
}

impl AgentConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AgentError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AgentError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path (`config_dir()/config.toml`).
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }

    /// Path of the persisted state document.
    pub fn state_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(crate::app_dirs::state_file)
    }

    /// Check invariants the rest of the crate relies on.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.classifier.cancel_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(AgentError::Config(
                "classifier.cancel_keywords must contain at least one keyword".into(),
            ));
        }
        if self.handlers.max_items == 0 {
            return Err(AgentError::Config(
                "handlers.max_items must be greater than 0".into(),
            ));
        }
        if self.handlers.forecast_days == 0 {
            return Err(AgentError::Config(
                "handlers.forecast_days must be greater than 0".into(),
            ));
        }
        if self.speech.rate <= 0.0 {
            return Err(AgentError::Config("speech.rate must be positive".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for zone in &self.zones {
            if !seen.insert(zone.id.as_str()) {
                return Err(AgentError::Config(format!("duplicate zone id {}", zone.id)));
            }
            if !zone.path.starts_with('/') {
                return Err(AgentError::Config(format!(
                    "zone {} path must start with '/'",
                    zone.id
                )));
            }
        }
        self.sources
            .validate()
            .map_err(|e| AgentError::Config(format!("sources: {e}")))
    }
}
