//! Filesystem locations used by the assistant.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Environment Overrides
//!
//! - `ZONE_AGENT_DATA_DIR`: overrides [`data_dir`]
//! - `ZONE_AGENT_CONFIG_DIR`: overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root, holding the persisted state document.
///
/// Resolves to `dirs::data_dir()/zone-agent/` by default.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("ZONE_AGENT_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("zone-agent"))
        .unwrap_or_else(|| PathBuf::from("/tmp/zone-agent-data"))
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/zone-agent/` by default.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("ZONE_AGENT_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("zone-agent"))
        .unwrap_or_else(|| PathBuf::from("/tmp/zone-agent-config"))
}

/// `config_dir()/config.toml`.
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// `data_dir()/state.json`.
#[must_use]
pub fn state_file() -> PathBuf {
    data_dir().join("state.json")
}
