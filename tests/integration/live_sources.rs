//! Standard handlers against mock HTTP sources.

use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zone_agent::store::StateStore;
use zone_agent::{AgentConfig, Assistant, RemoteSession, SessionBoundary};
use zone_sources::{AuthClient, ProgressClient, SourcesConfig};

fn config_for(server: &MockServer) -> AgentConfig {
    let mut config = AgentConfig::default();
    config.sources.geocoding_url = server.uri();
    config.sources.weather_url = server.uri();
    config.sources.events_url = server.uri();
    config.sources.timeout_seconds = 2;
    config
}

fn assistant(config: AgentConfig) -> Assistant {
    Assistant::builder(config)
        .store(Arc::new(StateStore::in_memory()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn weather_request_geocodes_then_forecasts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "toronto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"name": "Toronto", "latitude": 43.7, "longitude": -79.42, "country": "Canada"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {"temperature_2m": 12.5, "weather_code": 2, "wind_speed_10m": 14.0},
            "daily": {
                "time": ["2026-10-16", "2026-10-17", "2026-10-18"],
                "weather_code": [2, 61, 0],
                "temperature_2m_max": [14.0, 11.0, 16.0],
                "temperature_2m_min": [6.0, 5.0, 7.0]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let assistant = assistant(config_for(&server));
    let response = assistant.submit("weather in Toronto").await;

    assert!(!response.degraded);
    assert!(response.body().starts_with("**Weather for Toronto, Canada**"));
    let narration = response.narration.unwrap();
    assert!(!narration.contains("**"));
    assert!(narration.contains("partly cloudy"));
}

#[tokio::test]
async fn failing_source_degrades_only_its_fragment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let assistant = assistant(config_for(&server));
    let response = assistant.submit("stocks and events this weekend").await;

    assert_eq!(response.fragments.len(), 2);
    assert!(response.fragments[0].ok);
    assert!(response.fragments[0].body.contains("Market"));
    assert!(!response.fragments[1].ok);
    assert_eq!(assistant.history().len(), 2);
}

#[tokio::test]
async fn remote_session_logs_in_and_syncs_progress() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_partial_json(json!({"username": "ada"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-7", "display_name": "Ada", "token": "tkn"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/progress/user-7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let sources = SourcesConfig {
        timeout_seconds: 2,
        ..Default::default()
    };
    let session = RemoteSession::new(
        AuthClient::with_base_url(&sources, &server.uri()).unwrap(),
        ProgressClient::with_base_url(&sources, &server.uri()).unwrap(),
    );
    assert!(session.current_identity().is_none());

    let identity = session.login("ada", "secret").await.unwrap();
    assert_eq!(session.current_identity().unwrap().id, "user-7");

    session.persist_progress(&identity, json!({"zone": "weather", "visits": 1}));
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    server.verify().await;

    session.logout();
    assert!(session.current_identity().is_none());
}
