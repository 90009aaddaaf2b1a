//! View mode and progress survive restarts; corrupt state falls back to defaults.

use zone_agent::handlers::HandlerRegistry;
use zone_agent::{AgentConfig, Assistant, ViewMode};

use crate::helpers::quick_config;

fn assistant_at(config: AgentConfig) -> Assistant {
    Assistant::builder(config)
        .handlers(HandlerRegistry::new())
        .build()
        .unwrap()
}

#[tokio::test]
async fn view_mode_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = quick_config();
    config.store.path = Some(dir.path().join("state.json"));

    let first = assistant_at(config.clone());
    first.submit("switch to simple mode").await;
    assert_eq!(first.view_mode(), ViewMode::Simple);
    drop(first);

    let second = assistant_at(config);
    assert_eq!(second.view_mode(), ViewMode::Simple);
    assert_eq!(second.mode_indicator(), "Simple mode");
}

#[tokio::test]
async fn corrupt_state_starts_in_full_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ this is not json").unwrap();
    let mut config = quick_config();
    config.store.path = Some(path.clone());

    let assistant = assistant_at(config);
    assert_eq!(assistant.view_mode(), ViewMode::Full);

    // The next change overwrites the corrupt document.
    assistant.submit("focus mode").await;
    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["view_mode"], "focus");
}

#[test]
fn config_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = AgentConfig::default();
    config.handlers.default_location = "Lisbon".into();
    config.save_to_file(&path).unwrap();

    let loaded = AgentConfig::from_file(&path).unwrap();
    assert_eq!(loaded.handlers.default_location, "Lisbon");
    assert!(loaded.validate().is_ok());
}
