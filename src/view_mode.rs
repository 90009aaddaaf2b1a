//! Tri-state UI density: `Full`, `Simple`, `Focus`.
//!
//! The current mode lives in the persisted [`StateStore`]; this machine is
//! the only writer. Re-entering the current mode is a no-op apart from the
//! acknowledgment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::store::StateStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Full,
    Simple,
    Focus,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Full => "Full",
            ViewMode::Simple => "Simple",
            ViewMode::Focus => "Focus",
        }
    }

    /// Which parts of the surrounding UI are shown in this mode.
    pub fn chrome(self) -> ChromeVisibility {
        match self {
            ViewMode::Full => ChromeVisibility {
                advanced_controls: true,
                nonessential_chrome: true,
                core_navigation: true,
            },
            ViewMode::Simple => ChromeVisibility {
                advanced_controls: false,
                nonessential_chrome: true,
                core_navigation: true,
            },
            ViewMode::Focus => ChromeVisibility {
                advanced_controls: false,
                nonessential_chrome: false,
                core_navigation: true,
            },
        }
    }

    fn acknowledgment(self) -> &'static str {
        match self {
            ViewMode::Full => "Full mode on. Everything is visible again.",
            ViewMode::Simple => "Simple mode on. Advanced controls are hidden.",
            ViewMode::Focus => "Focus mode on. Only the essentials are showing.",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Visibility flags, fully determined by the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeVisibility {
    pub advanced_controls: bool,
    pub nonessential_chrome: bool,
    /// Always shown.
    pub core_navigation: bool,
}

/// Result of a mode request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub mode: ViewMode,
    /// `false` when the requested mode was already active.
    pub changed: bool,
    pub message: String,
}

/// Owns mode transitions and their persistence.
#[derive(Clone)]
pub struct ViewModeMachine {
    store: Arc<StateStore>,
}

impl ViewModeMachine {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    pub fn current(&self) -> ViewMode {
        self.store.view_mode()
    }

    /// Label for the always-visible mode indicator.
    pub fn indicator(&self) -> String {
        format!("{} mode", self.current().label())
    }

    pub fn chrome(&self) -> ChromeVisibility {
        self.current().chrome()
    }

    /// Switch to `mode`, persisting the change.
    ///
    /// A persistence failure is logged; the in-memory mode still changes.
    pub fn transition(&self, mode: ViewMode) -> Acknowledgment {
        let previous = self.current();
        let changed = previous != mode;
        if changed {
            if let Err(e) = self.store.update(|state| state.view_mode = mode) {
                warn!("cannot persist view mode: {e}");
            }
            info!(from = %previous, to = %mode, "view mode changed");
        }
        let message = if changed {
            mode.acknowledgment().to_owned()
        } else {
            format!("Already in {} mode.", mode.label())
        };
        Acknowledgment {
            mode,
            changed,
            message,
        }
    }
}
