//! Creator live status, live creators first.

use async_trait::async_trait;
use zone_sources::{CreatorStatus, CreatorsClient};

use super::{Handler, HandlerContext, tag};
use crate::error::Result;
use crate::intent::{Domain, Slots};
use crate::render::Fragment;

pub struct CreatorsHandler {
    client: CreatorsClient,
    max_items: usize,
}

impl CreatorsHandler {
    pub fn new(client: CreatorsClient, max_items: usize) -> Self {
        Self { client, max_items }
    }
}

#[async_trait]
impl Handler for CreatorsHandler {
    fn domain(&self) -> Domain {
        Domain::Creators
    }

    async fn handle(&self, _slots: &Slots, _ctx: &HandlerContext) -> Result<Fragment> {
        let mut statuses = self.client.statuses().await?;
        // Stable: live first, catalog order otherwise.
        statuses.sort_by_key(|s| !s.live);
        Ok(Fragment::ok(
            tag(Domain::Creators),
            render(&statuses, self.max_items),
        ))
    }
}

fn render(statuses: &[CreatorStatus], max_items: usize) -> String {
    let live = statuses.iter().filter(|s| s.live).count();
    let mut body = match live {
        0 => "**Creators**: nobody is live right now".to_owned(),
        1 => "**Creators**: 1 live now".to_owned(),
        n => format!("**Creators**: {n} live now"),
    };
    if statuses.is_empty() {
        return body;
    }
    body.push('\n');
    for creator in statuses.iter().take(max_items) {
        let platform = if creator.platform.is_empty() {
            String::new()
        } else {
            format!(" on {}", creator.platform)
        };
        if creator.live {
            body.push_str(&format!("\n- 🔴 **{}** is live{platform}", creator.name));
            if let Some(title) = &creator.title {
                body.push_str(&format!(": {title}"));
            }
            if let Some(viewers) = creator.viewers {
                body.push_str(&format!(" ({viewers} watching)"));
            }
        } else {
            body.push_str(&format!("\n- {} is offline", creator.name));
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(name: &str, live: bool) -> CreatorStatus {
        CreatorStatus {
            name: name.into(),
            platform: "Twitch".into(),
            live,
            title: live.then(|| "Building a synth".into()),
            viewers: live.then_some(120),
        }
    }

    #[test]
    fn counts_and_formats_live_creators() {
        let body = render(&[status("ada", true), status("bob", false)], 5);
        assert!(body.starts_with("**Creators**: 1 live now"));
        assert!(body.contains("🔴 **ada** is live on Twitch: Building a synth (120 watching)"));
        assert!(body.contains("- bob is offline"));
    }

    #[test]
    fn nobody_live() {
        let body = render(&[], 5);
        assert_eq!(body, "**Creators**: nobody is live right now");
    }
}
