//! Events: fetch the catalog, filter by category, time range and location.

use async_trait::async_trait;
use chrono::NaiveDate;
use zone_sources::{CatalogEvent, EventsClient};

use super::{Handler, HandlerContext, short_date, tag};
use crate::error::Result;
use crate::intent::{Domain, Slots};
use crate::render::Fragment;

pub struct EventsHandler {
    client: EventsClient,
    max_items: usize,
}

impl EventsHandler {
    pub fn new(client: EventsClient, max_items: usize) -> Self {
        Self { client, max_items }
    }
}

#[async_trait]
impl Handler for EventsHandler {
    fn domain(&self) -> Domain {
        Domain::Events
    }

    async fn handle(&self, slots: &Slots, ctx: &HandlerContext) -> Result<Fragment> {
        let catalog = self.client.list().await?;
        let matching = filter(catalog, slots, ctx.today);
        Ok(Fragment::ok(
            tag(Domain::Events),
            render(&matching, slots, self.max_items),
        ))
    }
}

/// Upcoming events matching every given slot, soonest first.
fn filter(catalog: Vec<CatalogEvent>, slots: &Slots, today: NaiveDate) -> Vec<CatalogEvent> {
    let location = slots.location.as_deref().map(str::to_lowercase);
    let mut matching: Vec<(Option<NaiveDate>, CatalogEvent)> = catalog
        .into_iter()
        .filter(|e| {
            slots
                .category
                .as_deref()
                .is_none_or(|c| e.matches_category(c))
        })
        .filter(|e| {
            location
                .as_deref()
                .is_none_or(|l| e.location.to_lowercase().contains(l))
        })
        .map(|e| (e.day(), e))
        .filter(|(day, _)| match (slots.time_range, day) {
            (Some(range), Some(day)) => range.contains(today, *day),
            (Some(_), None) => false,
            (None, Some(day)) => *day >= today,
            (None, None) => true,
        })
        .collect();
    // Undated events sort last.
    matching.sort_by_key(|(day, _)| day.unwrap_or(NaiveDate::MAX));
    matching.into_iter().map(|(_, e)| e).collect()
}

fn render(events: &[CatalogEvent], slots: &Slots, max_items: usize) -> String {
    let mut qualifiers = Vec::new();
    if let Some(category) = &slots.category {
        qualifiers.push(category.clone());
    }
    if let Some(range) = slots.time_range {
        qualifiers.push(range.label().to_owned());
    }
    if let Some(location) = &slots.location {
        qualifiers.push(format!("near {location}"));
    }
    let heading = if qualifiers.is_empty() {
        "**Upcoming events**".to_owned()
    } else {
        format!("**Events** ({})", qualifiers.join(", "))
    };

    if events.is_empty() {
        return format!("{heading}\n\nNothing matches right now. Try another day or category.");
    }

    let mut body = format!("{heading}\n");
    for event in events.iter().take(max_items) {
        let when = event
            .day()
            .map(short_date)
            .unwrap_or_else(|| event.date.clone());
        body.push_str(&format!("\n- **{}**: {when}", event.title));
        if !event.location.is_empty() {
            body.push_str(&format!(", {}", event.location));
        }
    }
    if events.len() > max_items {
        body.push_str(&format!("\n\n…and {} more.", events.len() - max_items));
    }
    body
}
