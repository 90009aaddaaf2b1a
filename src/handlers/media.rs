//! Movies and series: catalog search by search term or genre.

use async_trait::async_trait;
use zone_sources::{MediaClient, MediaItem};

use super::{Handler, HandlerContext, tag};
use crate::error::Result;
use crate::intent::{Domain, Slots};
use crate::render::Fragment;

/// Query used when the utterance named neither a title nor a genre.
const DEFAULT_QUERY: &str = "popular";

pub struct MediaHandler {
    client: MediaClient,
    max_items: usize,
}

impl MediaHandler {
    pub fn new(client: MediaClient, max_items: usize) -> Self {
        Self { client, max_items }
    }
}

#[async_trait]
impl Handler for MediaHandler {
    fn domain(&self) -> Domain {
        Domain::Movies
    }

    async fn handle(&self, slots: &Slots, _ctx: &HandlerContext) -> Result<Fragment> {
        let query = slots
            .search_term
            .as_deref()
            .or(slots.category.as_deref())
            .unwrap_or(DEFAULT_QUERY);
        let items = self.client.search(query, self.max_items).await?;
        Ok(Fragment::ok(
            tag(Domain::Movies),
            render(query, &items, self.max_items),
        ))
    }
}

fn render(query: &str, items: &[MediaItem], max_items: usize) -> String {
    if items.is_empty() {
        return format!("**Cinema**\n\nI couldn't find anything for \"{query}\".");
    }
    let mut body = format!("**Cinema**: results for \"{query}\"\n");
    for item in items.iter().take(max_items) {
        body.push_str(&format!("\n- **{}**", item.title));
        if let Some(year) = item.year {
            body.push_str(&format!(" ({year})"));
        }
        if let Some(rating) = item.rating {
            body.push_str(&format!(" ★ {rating:.1}"));
        }
        if !item.genres.is_empty() {
            body.push_str(&format!(": {}", item.genres.join(", ")));
        }
    }
    body
}
