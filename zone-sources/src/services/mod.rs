//! One client per external data source.
//!
//! Every client owns a cheap-to-clone [`reqwest::Client`] and a base URL.
//! Construct with `new(&SourcesConfig)` for production, or `with_base_url`
//! to point at a mock server.

pub mod auth;
pub mod creators;
pub mod events;
pub mod geocoding;
pub mod media;
pub mod progress;
pub mod weather;

pub use auth::AuthClient;
pub use creators::CreatorsClient;
pub use events::EventsClient;
pub use geocoding::GeocodingClient;
pub use media::MediaClient;
pub use progress::ProgressClient;
pub use weather::WeatherClient;
