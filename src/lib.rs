//! Zone assistant: a conversational guide embedded in a multi-zone experience.
//!
//! Each user input (typed or spoken) goes through a cascade:
//! Utterance → Classifier → Router → Handlers → Response → History / Narration
//!
//! # Architecture
//!
//! - **Intent** (`intent/`): normalization and the ordered rule classifier
//! - **Router** (`router.rs`): control commands and announce-then-commit navigation
//! - **Orchestrator** (`orchestrator.rs`): concurrent fan-out for multi-intent requests
//! - **Handlers** (`handlers/`): one per domain, backed by `zone-sources` clients
//! - **Speech** (`speech/`): capture and playback sessions with barge-in
//! - **Store** (`store.rs`): view mode, zone progress and habit streaks on disk
//! - **Assistant** (`assistant.rs`): the facade the host talks to

pub mod app_dirs;
pub mod assistant;
pub mod config;
pub mod error;
pub mod handlers;
pub mod history;
pub mod intent;
pub mod orchestrator;
pub mod render;
pub mod router;
pub mod runtime;
pub mod session;
pub mod speech;
pub mod store;
pub mod view_mode;
pub mod zone;

pub use assistant::{Assistant, AssistantBuilder, CaptureToggle};
pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use history::{ChatMessage, Role};
pub use render::{Fragment, Response};
pub use router::{Navigator, PendingNavigation, RecordingNavigator};
pub use runtime::RuntimeEvent;
pub use session::{LocalSession, RemoteSession, SessionBoundary};
pub use view_mode::ViewMode;
pub use zone::{ZoneContext, ZoneRegistry};
