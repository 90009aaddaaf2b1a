//! Versioned persisted state: view mode, zone progress and habit streaks.
//!
//! One JSON document (`state.json`). A missing or unparsable document loads as
//! the default state; it is never fatal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{AgentError, Result};
use crate::view_mode::ViewMode;

const STATE_VERSION: u32 = 1;

fn default_state_version() -> u32 {
    STATE_VERSION
}

/// Visit counters for one zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneProgress {
    pub visits: u32,
    #[serde(default)]
    pub last_visited: Option<DateTime<Utc>>,
}

/// Consecutive-day streak for one habit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStreak {
    pub current: u32,
    pub best: u32,
    #[serde(default)]
    pub last_day: Option<NaiveDate>,
}

impl HabitStreak {
    /// Count `day`. Same day twice counts once; a gap restarts the streak.
    pub fn record(&mut self, day: NaiveDate) {
        match self.last_day {
            Some(last) if last == day => return,
            Some(last) if last.succ_opt() == Some(day) => self.current += 1,
            Some(last) if last > day => return,
            _ => self.current = 1,
        }
        self.last_day = Some(day);
        self.best = self.best.max(self.current);
    }

    /// Current streak as of `today`: zero once a full day has been missed.
    pub fn active(&self, today: NaiveDate) -> u32 {
        match self.last_day {
            Some(last) if last == today || last.succ_opt() == Some(today) => self.current,
            _ => 0,
        }
    }
}

/// The persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default = "default_state_version")]
    pub version: u32,
    #[serde(default)]
    pub view_mode: ViewMode,
    /// Zone id → progress.
    #[serde(default)]
    pub progress: BTreeMap<String, ZoneProgress>,
    /// Habit name → streak.
    #[serde(default)]
    pub habits: BTreeMap<String, HabitStreak>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            view_mode: ViewMode::default(),
            progress: BTreeMap::new(),
            habits: BTreeMap::new(),
        }
    }
}

impl PersistedState {
    /// Sum of visits across all zones.
    pub fn total_visits(&self) -> u32 {
        self.progress.values().map(|p| p.visits).sum()
    }
}

/// Mutex-guarded persisted state with write-through saves.
///
/// Writers are serialized end to end (mutate, snapshot, write, rename), so
/// the document on disk always reflects the latest update. Readers only take
/// the state lock and never wait on disk I/O.
///
/// `path == None` keeps everything in memory.
#[derive(Debug)]
pub struct StateStore {
    path: Option<PathBuf>,
    state: Mutex<PersistedState>,
    writer: Mutex<()>,
}

impl StateStore {
    /// Load from `path`, falling back to the default state when the document
    /// is missing, unreadable or corrupt.
    pub fn open(path: Option<PathBuf>) -> Self {
        let state = match path.as_deref().map(load_from_path).transpose() {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                warn!("cannot load persisted state, using defaults: {e}");
                PersistedState::default()
            }
        };
        if let Some(path) = &path {
            debug!(mode = %state.view_mode, "loaded state from {}", path.display());
        }
        Self {
            path,
            state: Mutex::new(state),
            writer: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::open(None)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn snapshot(&self) -> PersistedState {
        self.lock().clone()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.lock().view_mode
    }

    /// Apply `f` and write the result through to disk.
    ///
    /// The in-memory state keeps the change even when the write fails.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Store`] if the document cannot be written.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut PersistedState),
    {
        let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let snapshot = {
            let mut state = self.lock();
            f(&mut state);
            state.clone()
        };
        match &self.path {
            Some(path) => save_to_path(path, &snapshot),
            None => Ok(()),
        }
    }

    /// Count a visit to `zone_id` and return its updated progress.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Store`] if the document cannot be written.
    pub fn record_visit(&self, zone_id: &str, at: DateTime<Utc>) -> Result<ZoneProgress> {
        let mut updated = ZoneProgress::default();
        self.update(|state| {
            let entry = state.progress.entry(zone_id.to_owned()).or_default();
            entry.visits += 1;
            entry.last_visited = Some(at);
            updated = entry.clone();
        })?;
        Ok(updated)
    }

    /// Count `habit` for `day` and return its updated streak.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Store`] if the document cannot be written.
    pub fn record_habit(&self, habit: &str, day: NaiveDate) -> Result<HabitStreak> {
        let mut updated = HabitStreak::default();
        self.update(|state| {
            let entry = state.habits.entry(habit.to_owned()).or_default();
            entry.record(day);
            updated = entry.clone();
        })?;
        Ok(updated)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PersistedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn load_from_path(path: &Path) -> Result<PersistedState> {
    let bytes = match std::fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(PersistedState::default());
        }
        Err(e) => return Err(AgentError::Store(format!("cannot read state: {e}"))),
    };

    let mut state: PersistedState = serde_json::from_slice(&bytes)
        .map_err(|e| AgentError::Store(format!("cannot parse state: {e}")))?;
    if state.version > STATE_VERSION {
        warn!(
            found = state.version,
            supported = STATE_VERSION,
            "state was written by a newer version; unknown fields are ignored"
        );
    }
    state.version = STATE_VERSION;
    Ok(state)
}

fn save_to_path(path: &Path, state: &PersistedState) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| AgentError::Store(format!("cannot create state dir: {e}")))?;

    let json = serde_json::to_string_pretty(state)
        .map_err(|e| AgentError::Store(format!("cannot serialize state: {e}")))?;

    // Write-then-rename so a crash mid-write never leaves a truncated document.
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| AgentError::Store(format!("cannot create temp state: {e}")))?;
    tmp.write_all(json.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|e| AgentError::Store(format!("cannot write state: {e}")))?;
    tmp.persist(path)
        .map_err(|e| AgentError::Store(format!("cannot replace state: {e}")))?;
    Ok(())
}
