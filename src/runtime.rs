//! Runtime events emitted by the assistant for UI and observability.
//!
//! Events are lightweight and fire-and-forget: the assistant never waits on
//! observers, and a lagging observer only misses events.

use crate::history::ChatMessage;
use crate::speech::SpeechState;
use crate::view_mode::Acknowledgment;

/// Events that describe what the assistant is doing "right now".
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A message was appended to the chat history.
    MessageAppended(ChatMessage),
    /// The chat history was cleared by an explicit user command.
    HistoryCleared,
    /// One orchestrated handler settled (completion order, not detection order).
    FragmentSettled {
        /// Detection-order index of the fragment.
        index: usize,
        tag: String,
        ok: bool,
    },
    /// The speech controller changed state.
    SpeechState(SpeechState),
    /// Transient acknowledgment of a view-mode request.
    ModeAcknowledged(Acknowledgment),
    /// A navigation was announced and will commit after its delay.
    NavigationAnnounced { zone: String, path: String },
    /// The host location changed.
    NavigationCommitted { zone: String, path: String },
    /// A pending navigation was cancelled before it committed.
    NavigationCancelled { zone: String },
    /// An external link was handed to the host.
    UrlOpened { url: String },
    /// One-off informational notice (e.g. speech input is unavailable).
    Notice(String),
}
