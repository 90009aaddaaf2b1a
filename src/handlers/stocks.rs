//! Market insights served from configuration.

use async_trait::async_trait;

use super::{Handler, HandlerContext, tag};
use crate::config::MarketInsight;
use crate::error::Result;
use crate::intent::{Domain, Slots};
use crate::render::{Fragment, title_case};

pub struct StocksHandler {
    insights: Vec<MarketInsight>,
}

impl StocksHandler {
    pub fn new(insights: Vec<MarketInsight>) -> Self {
        Self { insights }
    }

    fn render(&self, category: Option<&str>) -> String {
        let matching: Vec<&MarketInsight> = match category {
            Some(sector) => self
                .insights
                .iter()
                .filter(|i| i.sector.eq_ignore_ascii_case(sector))
                .collect(),
            None => self.insights.iter().collect(),
        };

        let mut body = String::from("**Market insights**");
        if matching.is_empty() {
            if let Some(sector) = category {
                body.push_str(&format!("\n\nNo {sector} insights today. Here is the overview:"));
            }
        }
        let shown = if matching.is_empty() {
            self.insights.iter().collect()
        } else {
            matching
        };
        if shown.is_empty() {
            body.push_str("\n\nNo market insights are configured.");
            return body;
        }
        body.push('\n');
        for insight in shown {
            body.push_str(&format!(
                "\n- **{}**: {}",
                title_case(&insight.sector),
                insight.headline
            ));
        }
        body
    }
}

#[async_trait]
impl Handler for StocksHandler {
    fn domain(&self) -> Domain {
        Domain::Stocks
    }

    async fn handle(&self, slots: &Slots, _ctx: &HandlerContext) -> Result<Fragment> {
        Ok(Fragment::ok(
            tag(Domain::Stocks),
            self.render(slots.category.as_deref()),
        ))
    }
}
