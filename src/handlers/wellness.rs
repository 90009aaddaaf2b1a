//! Wellness tips, with a check-in streak for signed-in users.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

use super::{Handler, HandlerContext, tag};
use crate::error::Result;
use crate::intent::{Domain, Slots};
use crate::render::Fragment;
use crate::store::StateStore;

/// Habit key under which wellness check-ins are counted.
pub const WELLNESS_HABIT: &str = "wellness";

pub struct WellnessHandler {
    tips: Vec<String>,
    next_tip: AtomicUsize,
    store: Arc<StateStore>,
}

impl WellnessHandler {
    pub fn new(tips: Vec<String>, store: Arc<StateStore>) -> Self {
        Self {
            tips,
            next_tip: AtomicUsize::new(0),
            store,
        }
    }

    /// Tips rotate per request.
    fn tip(&self) -> Option<&str> {
        if self.tips.is_empty() {
            return None;
        }
        let index = self.next_tip.fetch_add(1, Ordering::Relaxed) % self.tips.len();
        Some(self.tips[index].as_str())
    }
}

#[async_trait]
impl Handler for WellnessHandler {
    fn domain(&self) -> Domain {
        Domain::Wellness
    }

    async fn handle(&self, _slots: &Slots, ctx: &HandlerContext) -> Result<Fragment> {
        let mut body = String::from("**Wellness**\n\n");
        body.push_str(self.tip().unwrap_or("Take a slow breath and unclench your shoulders."));

        match &ctx.identity {
            Some(identity) => match self.store.record_habit(WELLNESS_HABIT, ctx.today) {
                Ok(streak) => {
                    let days = if streak.current == 1 { "day" } else { "days" };
                    body.push_str(&format!(
                        "\n\n🔥 {}, that's {} {days} in a row (best {}).",
                        identity.display_name, streak.current, streak.best
                    ));
                }
                Err(e) => warn!("cannot record wellness check-in: {e}"),
            },
            None => body.push_str("\n\nSign in to keep a daily streak."),
        }
        Ok(Fragment::ok(tag(Domain::Wellness), body))
    }
}
