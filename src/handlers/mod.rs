//! Domain handlers: one per [`Domain`], each turning slots into a fragment.
//!
//! Handlers never panic on bad data and map every source failure to an
//! [`crate::error::AgentError`]; the router turns those into "unavailable" placeholders.

pub mod creators;
pub mod events;
pub mod media;
pub mod progress;
pub mod stocks;
pub mod weather;
pub mod wellness;

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use zone_sources::{Identity, SourceClients};

use crate::config::HandlersConfig;
use crate::error::Result;
use crate::intent::{Domain, IntentTag, Slots};
use crate::orchestrator::HandlerFuture;
use crate::render::Fragment;
use crate::store::{PersistedState, StateStore};
use crate::zone::{ZoneContext, ZoneRegistry};

pub use creators::CreatorsHandler;
pub use events::EventsHandler;
pub use media::MediaHandler;
pub use progress::ProgressHandler;
pub use stocks::StocksHandler;
pub use weather::WeatherHandler;
pub use wellness::WellnessHandler;

/// Per-request context shared by every handler of one input.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub zone: ZoneContext,
    pub identity: Option<Identity>,
    /// Local calendar day used for time-range filtering.
    pub today: NaiveDate,
    /// Persisted state as of the start of the request.
    pub state: PersistedState,
}

#[async_trait]
pub trait Handler: Send + Sync {
    fn domain(&self) -> Domain;

    async fn handle(&self, slots: &Slots, ctx: &HandlerContext) -> Result<Fragment>;
}

/// Fragment tag for a domain.
pub(crate) fn tag(domain: Domain) -> IntentTag {
    IntentTag::Domain { domain }
}

/// Lookup table from domain to handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<Domain, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in handler, wired to `clients`.
    pub fn standard(
        config: &HandlersConfig,
        clients: &SourceClients,
        store: Arc<StateStore>,
        zones: Arc<ZoneRegistry>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(StocksHandler::new(config.market_insights.clone())));
        registry.register(Arc::new(WeatherHandler::new(
            clients.geocoding.clone(),
            clients.weather.clone(),
            config.default_location.clone(),
            config.forecast_days,
        )));
        registry.register(Arc::new(EventsHandler::new(
            clients.events.clone(),
            config.max_items,
        )));
        registry.register(Arc::new(CreatorsHandler::new(
            clients.creators.clone(),
            config.max_items,
        )));
        registry.register(Arc::new(MediaHandler::new(
            clients.media.clone(),
            config.max_items,
        )));
        registry.register(Arc::new(WellnessHandler::new(
            config.wellness_tips.clone(),
            store,
        )));
        registry.register(Arc::new(ProgressHandler::new(zones)));
        registry
    }

    /// Add or replace the handler for its domain.
    pub fn register(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.insert(handler.domain(), handler);
    }

    pub fn get(&self, domain: Domain) -> Option<Arc<dyn Handler>> {
        self.handlers.get(&domain).cloned()
    }

    /// A `'static` future invoking the handler for `domain`.
    pub fn invocation(&self, domain: Domain, slots: &Slots, ctx: &HandlerContext) -> HandlerFuture {
        let handler = self.get(domain);
        let slots = slots.clone();
        let ctx = ctx.clone();
        Box::pin(async move {
            match handler {
                Some(handler) => handler.handle(&slots, &ctx).await,
                None => Err(crate::error::AgentError::NoHandler(domain.to_string())),
            }
        })
    }
}

/// `"Fri 16 Oct"`.
pub(crate) fn short_date(day: NaiveDate) -> String {
    day.format("%a %-d %b").to_string()
}
