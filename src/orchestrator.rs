//! Concurrent fan-out over several handlers with ordered fan-in.
//!
//! All invocations start in the same step on a [`JoinSet`]. Each completion
//! fills the slot at its detection index; the composite response is produced
//! once, when the last slot settles, so its order never depends on which
//! source answered first.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{AgentError, Result};
use crate::intent::IntentTag;
use crate::render::{Fragment, Response};
use crate::runtime::RuntimeEvent;

/// A boxed handler invocation.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Fragment>> + Send + 'static>>;

/// Slot bookkeeping for one orchestrated request.
#[derive(Debug)]
pub struct OrchestrationJob {
    slots: Vec<Option<Fragment>>,
    completed: usize,
    fired: bool,
}

impl OrchestrationJob {
    pub fn new(expected: usize) -> Self {
        Self {
            slots: vec![None; expected],
            completed: 0,
            fired: false,
        }
    }

    pub fn expected(&self) -> usize {
        self.slots.len()
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Whether the composite has been produced.
    pub fn is_closed(&self) -> bool {
        self.fired
    }

    /// Fill slot `index`. Returns the composite, in slot order, exactly once:
    /// on the settle that completes the last slot. Repeated settles of the
    /// same slot, out-of-range indices and settles after closing are ignored.
    pub fn settle(&mut self, index: usize, fragment: Fragment) -> Option<Vec<Fragment>> {
        if self.fired {
            debug!(index, "settle after close ignored");
            return None;
        }
        let slot = self.slots.get_mut(index)?;
        if slot.is_some() {
            debug!(index, "duplicate settle ignored");
            return None;
        }
        *slot = Some(fragment);
        self.completed += 1;
        if self.completed < self.slots.len() {
            return None;
        }
        self.fired = true;
        Some(self.slots.iter_mut().filter_map(Option::take).collect())
    }

    /// Indices that have not settled yet.
    fn pending(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Runs handler invocations concurrently and composes their fragments.
#[derive(Clone)]
pub struct Orchestrator {
    timeout: Option<Duration>,
    events: broadcast::Sender<RuntimeEvent>,
}

impl Orchestrator {
    /// `handler_timeout_ms == 0` waits indefinitely.
    pub fn new(handler_timeout_ms: u64, events: broadcast::Sender<RuntimeEvent>) -> Self {
        let timeout = (handler_timeout_ms > 0).then(|| Duration::from_millis(handler_timeout_ms));
        Self { timeout, events }
    }

    /// Run every invocation and return one response with a fragment per
    /// invocation, in input order. Failed, panicked and timed-out handlers
    /// contribute a degraded placeholder.
    pub async fn orchestrate(&self, invocations: Vec<(IntentTag, HandlerFuture)>) -> Response {
        let expected = invocations.len();
        if expected == 0 {
            return Response::default();
        }
        let tags: Vec<IntentTag> = invocations.iter().map(|(tag, _)| tag.clone()).collect();
        let mut job = OrchestrationJob::new(expected);
        let mut set = JoinSet::new();

        for (index, (tag, future)) in invocations.into_iter().enumerate() {
            let timeout = self.timeout;
            set.spawn(async move { (index, invoke(tag.name(), future, timeout).await) });
        }
        debug!(handlers = expected, "orchestration started");

        while let Some(joined) = set.join_next().await {
            let (index, outcome) = match joined {
                Ok(settled) => settled,
                Err(e) => {
                    // `invoke` contains handler panics, so this is shutdown/abort.
                    warn!("orchestration task lost: {e}");
                    continue;
                }
            };
            let tag = &tags[index];
            let fragment = match outcome {
                Ok(fragment) => fragment,
                Err(e) => {
                    warn!(handler = %tag, error = %e, "handler degraded");
                    Fragment::unavailable(tag.clone())
                }
            };
            let _ = self.events.send(RuntimeEvent::FragmentSettled {
                index,
                tag: tag.name().to_owned(),
                ok: fragment.ok,
            });
            if let Some(fragments) = job.settle(index, fragment) {
                debug!(handlers = expected, "orchestration complete");
                return Response::compose(fragments);
            }
        }

        for index in job.pending() {
            if let Some(fragments) = job.settle(index, Fragment::unavailable(tags[index].clone())) {
                return Response::compose(fragments);
            }
        }
        Response::default()
    }
}

/// Run one handler on its own task so a panic is contained, bounded by `timeout`.
async fn invoke(name: &str, future: HandlerFuture, timeout: Option<Duration>) -> Result<Fragment> {
    let handle = tokio::spawn(future);
    let abort = handle.abort_handle();
    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, handle).await {
            Ok(joined) => joined,
            Err(_) => {
                abort.abort();
                return Err(AgentError::HandlerTimeout(name.to_owned()));
            }
        },
        None => handle.await,
    };
    joined.map_err(|e| AgentError::HandlerFailed(format!("{name}: {e}")))?
}
