//! Zone-visit progress for the signed-in user.

use async_trait::async_trait;
use std::sync::Arc;

use super::{Handler, HandlerContext, short_date, tag};
use crate::error::Result;
use crate::intent::{Domain, Slots};
use crate::render::Fragment;
use crate::zone::ZoneRegistry;

pub struct ProgressHandler {
    zones: Arc<ZoneRegistry>,
}

impl ProgressHandler {
    pub fn new(zones: Arc<ZoneRegistry>) -> Self {
        Self { zones }
    }

    fn render(&self, name: &str, ctx: &HandlerContext) -> String {
        let progress = &ctx.state.progress;
        let total = self.zones.iter().count();
        let explored = self
            .zones
            .iter()
            .filter(|z| progress.get(&z.id).is_some_and(|p| p.visits > 0))
            .count();

        let mut body = format!("**Your progress, {name}**\n\nZones explored: {explored} of {total}");
        if explored == 0 {
            body.push_str("\n\nYou haven't visited any zones yet. Say \"go to weather\" to start.");
            return body;
        }
        body.push('\n');
        for zone in self.zones.iter() {
            let Some(entry) = progress.get(&zone.id).filter(|p| p.visits > 0) else {
                continue;
            };
            let visits = if entry.visits == 1 { "visit" } else { "visits" };
            body.push_str(&format!("\n- {}: {} {visits}", zone.label(), entry.visits));
            if let Some(last) = entry.last_visited {
                body.push_str(&format!(" (last {})", short_date(last.date_naive())));
            }
        }
        for (habit, streak) in &ctx.state.habits {
            let active = streak.active(ctx.today);
            if active > 0 {
                body.push_str(&format!("\n\n🔥 {habit} streak: {active} days"));
            }
        }
        body
    }
}

#[async_trait]
impl Handler for ProgressHandler {
    fn domain(&self) -> Domain {
        Domain::Progress
    }

    async fn handle(&self, _slots: &Slots, ctx: &HandlerContext) -> Result<Fragment> {
        let body = match &ctx.identity {
            Some(identity) => self.render(&identity.display_name, ctx),
            None => "**Progress**\n\nSign in to see which zones you've explored and keep your streaks."
                .to_owned(),
        };
        Ok(Fragment::ok(tag(Domain::Progress), body))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::handlers::test_support::context;
    use crate::store::ZoneProgress;
    use chrono::{NaiveDate, TimeZone, Utc};
    use zone_sources::Identity;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[tokio::test]
    async fn requires_identity() {
        let handler = ProgressHandler::new(Arc::new(ZoneRegistry::builtin()));
        let fragment = handler
            .handle(&Slots::default(), &context(today()))
            .await
            .unwrap();
        assert!(fragment.ok);
        assert!(fragment.body.contains("Sign in"));
    }

    #[tokio::test]
    async fn lists_visited_zones_in_registry_order() {
        let handler = ProgressHandler::new(Arc::new(ZoneRegistry::builtin()));
        let mut ctx = context(today());
        ctx.identity = Some(Identity::local("u1", "Ada"));
        let when = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        ctx.state.progress.insert(
            "cinema".into(),
            ZoneProgress {
                visits: 2,
                last_visited: Some(when),
            },
        );
        ctx.state.progress.insert(
            "weather".into(),
            ZoneProgress {
                visits: 1,
                last_visited: None,
            },
        );

        let body = handler
            .handle(&Slots::default(), &ctx)
            .await
            .unwrap()
            .body;
        assert!(body.contains("Zones explored: 2 of 7"));
        let weather = body.find("Weather Station: 1 visit").unwrap();
        let cinema = body.find("Cinema: 2 visits (last Thu 15 Oct)").unwrap();
        assert!(weather < cinema);
    }
}
