//! Source contract tests.
//!
//! These tests pin the HTTP request shape each client sends and check how
//! responses (including failures) are mapped, using a local mock server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zone_sources::{
    AuthClient, Coordinates, CreatorsClient, EventsClient, GeocodingClient, Identity,
    MediaClient, ProgressClient, SourceError, SourcesConfig, WeatherClient,
};

fn config() -> SourcesConfig {
    SourcesConfig {
        timeout_seconds: 2,
        ..Default::default()
    }
}

fn toronto() -> Coordinates {
    Coordinates {
        name: "Toronto".into(),
        latitude: 43.7,
        longitude: -79.42,
        country: Some("Canada".into()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Geocoding
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn geocoding_sends_place_and_returns_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "toronto"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"name": "Toronto", "latitude": 43.7, "longitude": -79.42, "country": "Canada"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeocodingClient::with_base_url(&config(), &server.uri()).unwrap();
    let place = client.lookup("  Toronto ").await.unwrap();
    assert_eq!(place.name, "Toronto");
    assert_eq!(place.country.as_deref(), Some("Canada"));
}

#[tokio::test]
async fn geocoding_caches_repeated_lookups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"name": "Lisbon", "latitude": 38.72, "longitude": -9.14}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeocodingClient::with_base_url(&config(), &server.uri()).unwrap();
    assert!(client.lookup("Lisbon").await.is_ok());
    assert!(client.lookup("lisbon").await.is_ok());
}

#[tokio::test]
async fn geocoding_without_results_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = GeocodingClient::with_base_url(&config(), &server.uri()).unwrap();
    let err = client.lookup("atlantis").await.unwrap_err();
    assert!(matches!(err, SourceError::NotFound(_)));
}

// ────────────────────────────────────────────────────────────────────────────
// Weather
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn weather_parses_current_and_daily_columns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "43.7"))
        .and(query_param("forecast_days", "3"))
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

    let client = WeatherClient::with_base_url(&config(), &server.uri()).unwrap();
    let forecast = client.forecast(&toronto(), 3).await.unwrap();
    assert_eq!(forecast.current.condition.description(), "partly cloudy");
    assert_eq!(forecast.daily.len(), 3);
    assert_eq!(forecast.daily[1].condition.description(), "rain");
}

#[tokio::test]
async fn weather_server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = WeatherClient::with_base_url(&config(), &server.uri()).unwrap();
    let err = client.forecast(&toronto(), 3).await.unwrap_err();
    assert!(matches!(
        err,
        SourceError::Status {
            service: "weather",
            status: 503
        }
    ));
}

#[tokio::test]
async fn weather_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = WeatherClient::with_base_url(&config(), &server.uri()).unwrap();
    let err = client.forecast(&toronto(), 3).await.unwrap_err();
    assert!(matches!(err, SourceError::Parse(_)));
}

#[tokio::test]
async fn slow_source_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = SourcesConfig {
        timeout_seconds: 1,
        ..Default::default()
    };
    let client = EventsClient::with_base_url(&config, &server.uri()).unwrap();
    let err = client.list().await.unwrap_err();
    assert!(matches!(err, SourceError::Timeout(_)));
}

// ────────────────────────────────────────────────────────────────────────────
// Catalogs
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn events_catalog_tolerates_missing_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "Synth night", "date": "2026-10-16", "location": "Toronto",
             "description": "Modular jam", "category": "music", "tags": ["live"]},
            {"title": "Hack night", "date": "2026-10-20"}
        ])))
        .mount(&server)
        .await;

    let client = EventsClient::with_base_url(&config(), &server.uri()).unwrap();
    let events = client.list().await.unwrap();
    assert_eq!(events.len(), 2);
    assert!(events[1].location.is_empty());
    assert!(events[1].tags.is_empty());
}

#[tokio::test]
async fn media_search_passes_query_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "space"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"title": "Interstellar", "year": 2014, "genres": ["sci-fi"]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MediaClient::with_base_url(&config(), &server.uri()).unwrap();
    let items = client.search("space", 3).await.unwrap();
    assert_eq!(items[0].title, "Interstellar");
    assert_eq!(items[0].year, Some(2014));
}

#[tokio::test]
async fn creators_status_list_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "pixelpaws", "platform": "twitch", "live": true, "title": "speedrun", "viewers": 1200},
            {"name": "quietcoder", "live": false}
        ])))
        .mount(&server)
        .await;

    let client = CreatorsClient::with_base_url(&config(), &server.uri()).unwrap();
    let statuses = client.statuses().await.unwrap();
    assert!(statuses[0].live);
    assert_eq!(statuses[1].platform, "");
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn progress_push_uses_identity_path_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/progress/user-42"))
        .and(header("authorization", "Bearer tkn"))
        .and(body_partial_json(json!({"zones": {"weather": 2}})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProgressClient::with_base_url(&config(), &server.uri()).unwrap();
    let identity = Identity {
        id: "user-42".into(),
        display_name: "Sam".into(),
        token: Some("tkn".into()),
    };
    let result = client
        .push(&identity, &json!({"zones": {"weather": 2}}))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn login_returns_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_partial_json(json!({"username": "sam"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-42", "display_name": "Sam", "token": "tkn"
        })))
        .mount(&server)
        .await;

    let client = AuthClient::with_base_url(&config(), &server.uri()).unwrap();
    let identity = client.login("sam", "hunter2").await.unwrap();
    assert_eq!(identity.id, "user-42");
    assert_eq!(identity.token.as_deref(), Some("tkn"));
}

#[tokio::test]
async fn login_rejection_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = AuthClient::with_base_url(&config(), &server.uri()).unwrap();
    let err = client.login("sam", "wrong").await.unwrap_err();
    assert!(matches!(err, SourceError::Auth(_)));
    assert!(!err.to_string().contains("wrong"));
}
