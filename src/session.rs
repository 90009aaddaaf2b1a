//! Session/auth boundary.
//!
//! The assistant only reads the current identity and pushes progress blobs;
//! login UI and credential handling live with the host.

use std::sync::Mutex;
use tracing::{debug, info, warn};
use zone_sources::{AuthClient, Identity, ProgressClient};

use crate::error::Result;

/// What the assistant needs from the host's session.
pub trait SessionBoundary: Send + Sync {
    /// The signed-in identity, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Push a progress blob for `identity`. Fire-and-forget: implementations
    /// must not block, and failures are only logged.
    fn persist_progress(&self, identity: &Identity, blob: serde_json::Value);
}

/// In-memory session for tests and the terminal client.
#[derive(Debug, Default)]
pub struct LocalSession {
    identity: Mutex<Option<Identity>>,
    pushed: Mutex<Vec<(String, serde_json::Value)>>,
}

impl LocalSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Mutex::new(Some(identity)),
            ..Self::default()
        }
    }

    pub fn set_identity(&self, identity: Option<Identity>) {
        *self.identity.lock().unwrap_or_else(|e| e.into_inner()) = identity;
    }

    /// Progress blobs pushed so far, as `(identity id, blob)`.
    pub fn pushed(&self) -> Vec<(String, serde_json::Value)> {
        self.pushed.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SessionBoundary for LocalSession {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn persist_progress(&self, identity: &Identity, blob: serde_json::Value) {
        debug!(user = %identity.id, "recording progress locally");
        self.pushed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((identity.id.clone(), blob));
    }
}

/// Session backed by the remote login and progress services.
pub struct RemoteSession {
    auth: AuthClient,
    progress: ProgressClient,
    identity: Mutex<Option<Identity>>,
}

impl RemoteSession {
    pub fn new(auth: AuthClient, progress: ProgressClient) -> Self {
        Self {
            auth,
            progress,
            identity: Mutex::new(None),
        }
    }

    /// Sign in and keep the identity for the rest of the session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AgentError::Network`] when the credentials are
    /// rejected or the service is unreachable.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity> {
        let identity = self.auth.login(username, password).await?;
        info!(user = %identity.id, "signed in");
        *self.identity.lock().unwrap_or_else(|e| e.into_inner()) = Some(identity.clone());
        Ok(identity)
    }

    pub fn logout(&self) {
        self.identity
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
    }
}

impl SessionBoundary for RemoteSession {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn persist_progress(&self, identity: &Identity, blob: serde_json::Value) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime; progress not synced");
            return;
        };
        let client = self.progress.clone();
        let identity = identity.clone();
        handle.spawn(async move {
            match client.push(&identity, &blob).await {
                Ok(()) => debug!(user = %identity.id, "progress synced"),
                Err(e) => warn!(user = %identity.id, "progress sync failed: {e}"),
            }
        });
    }
}
