//! Command routing: one intent to its handler, several to the orchestrator.
//!
//! [`CommandRouter::route`] never fails. Handler errors, panics and timeouts
//! come back as degraded fragments, and control intents always produce an
//! acknowledgment.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::handlers::{HandlerContext, HandlerRegistry};
use crate::history::ChatHistory;
use crate::intent::{Domain, Intent, IntentTag};
use crate::orchestrator::{HandlerFuture, Orchestrator};
use crate::render::{Fragment, Response};
use crate::runtime::RuntimeEvent;
use crate::view_mode::ViewModeMachine;
use crate::zone::ZoneRegistry;

/// Default delay between announcing a navigation and committing it.
pub const NAVIGATION_COMMIT_DELAY_MS: u64 = 1_200;
pub const NAVIGATION_COMMIT_DELAY: Duration = Duration::from_millis(NAVIGATION_COMMIT_DELAY_MS);

/// An announced location change, committed after `delay` unless cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    pub zone_id: String,
    pub zone_name: String,
    pub path: String,
    pub delay: Duration,
}

/// The host's location controls.
pub trait Navigator: Send + Sync {
    /// Change the host location to `path`.
    fn navigate(&self, path: &str);

    /// Open an external link.
    fn open_url(&self, url: &str);
}

/// Navigator that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
    urls: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.to_owned());
    }

    fn open_url(&self, url: &str) {
        self.urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_owned());
    }
}

pub struct CommandRouter {
    zones: Arc<ZoneRegistry>,
    handlers: HandlerRegistry,
    orchestrator: Orchestrator,
    view_mode: ViewModeMachine,
    history: Arc<Mutex<ChatHistory>>,
    navigator: Arc<dyn Navigator>,
    events: broadcast::Sender<RuntimeEvent>,
    commit_delay: Duration,
}

impl CommandRouter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        zones: Arc<ZoneRegistry>,
        handlers: HandlerRegistry,
        orchestrator: Orchestrator,
        view_mode: ViewModeMachine,
        history: Arc<Mutex<ChatHistory>>,
        navigator: Arc<dyn Navigator>,
        events: broadcast::Sender<RuntimeEvent>,
        commit_delay: Duration,
    ) -> Self {
        Self {
            zones,
            handlers,
            orchestrator,
            view_mode,
            history,
            navigator,
            events,
            commit_delay,
        }
    }

    /// Produce the response for classified `intents`.
    pub async fn route(&self, mut intents: Vec<Intent>, ctx: &HandlerContext) -> Response {
        if intents.len() > 1 {
            info!(count = intents.len(), "orchestrating multi-intent request");
            let invocations = intents
                .iter()
                .map(|intent| (intent.tag.clone(), self.invocation(intent, ctx)))
                .collect();
            return self.orchestrator.orchestrate(invocations).await;
        }
        match intents.pop() {
            Some(intent) => self.route_one(intent, ctx).await,
            None => Response::default(),
        }
    }

    async fn route_one(&self, intent: Intent, ctx: &HandlerContext) -> Response {
        debug!(intent = %intent.tag, "routing");
        match &intent.tag {
            IntentTag::Domain { domain } => {
                let invocation = self.handlers.invocation(*domain, &intent.slots, ctx);
                self.orchestrator
                    .orchestrate(vec![(intent.tag.clone(), invocation)])
                    .await
            }
            IntentTag::Navigate { target } => self.navigate(target, ctx),
            _ => Response::single(self.control(&intent.tag, ctx)),
        }
    }

    /// Invocation for one intent of a multi-intent request.
    fn invocation(&self, intent: &Intent, ctx: &HandlerContext) -> HandlerFuture {
        match intent.tag {
            IntentTag::Domain { domain } => self.handlers.invocation(domain, &intent.slots, ctx),
            _ => {
                let fragment = self.control(&intent.tag, ctx);
                Box::pin(std::future::ready(Ok::<_, crate::error::AgentError>(fragment)))
            }
        }
    }

    fn navigate(&self, target: &str, ctx: &HandlerContext) -> Response {
        let tag = IntentTag::Navigate {
            target: target.to_owned(),
        };
        let Some(zone) = self.zones.resolve(target) else {
            info!(target, "unknown navigation target");
            return Response::single(Fragment::ok(
                tag,
                format!(
                    "I don't know a zone called \"{target}\". You can go to: {}.",
                    self.zones.names().join(", ")
                ),
            ));
        };
        if zone.id == ctx.zone.id {
            return Response::single(Fragment::ok(
                tag,
                format!("You're already in {}.", zone.label()),
            ));
        }
        let pending = PendingNavigation {
            zone_id: zone.id.clone(),
            zone_name: zone.name.clone(),
            path: zone.path.clone(),
            delay: self.commit_delay,
        };
        Response::single(Fragment::ok(
            tag,
            format!("Taking you to {}.", zone.label()),
        ))
        .with_navigation(pending)
    }

    /// Fragment for a single-step control intent.
    fn control(&self, tag: &IntentTag, ctx: &HandlerContext) -> Fragment {
        let body = match tag {
            IntentTag::Cancel => "Okay, stopped.".to_owned(),
            IntentTag::OpenUrl { url } => {
                self.navigator.open_url(url);
                let _ = self.events.send(RuntimeEvent::UrlOpened { url: url.clone() });
                format!("Opening {url}")
            }
            IntentTag::InvalidUrl => {
                "I need a full link to open, for example `open https://example.com`.".to_owned()
            }
            IntentTag::SetViewMode { mode } => {
                let ack = self.view_mode.transition(*mode);
                let message = ack.message.clone();
                let _ = self.events.send(RuntimeEvent::ModeAcknowledged(ack));
                message
            }
            IntentTag::Help => self.help(ctx),
            IntentTag::ClearHistory => {
                self.history
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .clear();
                let _ = self.events.send(RuntimeEvent::HistoryCleared);
                "Chat cleared.".to_owned()
            }
            IntentTag::WhereAmI => {
                let mut body = format!("You're in **{}**.", ctx.zone.label());
                if !ctx.zone.description.is_empty() {
                    body.push(' ');
                    body.push_str(&ctx.zone.description);
                }
                body
            }
            IntentTag::Fallback { suggestions } => {
                let mut body = "I'm not sure how to help with that. Try one of these:\n".to_owned();
                for suggestion in suggestions {
                    body.push_str(&format!("\n- {suggestion}"));
                }
                body
            }
            IntentTag::Navigate { target } => {
                return self
                    .navigate(target, ctx)
                    .fragments
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| Fragment::unavailable(tag.clone()));
            }
            IntentTag::Domain { .. } => return Fragment::unavailable(tag.clone()),
        };
        Fragment::ok(tag.clone(), body)
    }

    fn help(&self, ctx: &HandlerContext) -> String {
        let domains = Domain::ALL
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut body = format!(
            "**What I can do**\n\nAsk about {domains}. Combine them with \"and\", \
             say \"go to\" a zone, switch to focus, simple or full mode, or say \"stop\" anytime."
        );
        if !ctx.zone.prompts.is_empty() {
            body.push_str(&format!("\n\nIn {} you could try:\n", ctx.zone.name));
            for prompt in &ctx.zone.prompts {
                body.push_str(&format!("\n- {prompt}"));
            }
        }
        body
    }
}
