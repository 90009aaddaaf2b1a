//! Intent classification.
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): `Utterance`, `Intent`, `IntentTag`, `Domain`, `Slots`, `TimeRange`
//! - **Normalize** (`normalize.rs`): case folding, contraction expansion, word-boundary matching
//! - **Classifier** (`classifier.rs`): `IntentClassifier`, the ordered rule set

pub mod classifier;
pub mod normalize;
pub mod types;

pub use classifier::IntentClassifier;
pub use normalize::normalize;
pub use types::{Domain, Intent, IntentTag, Slots, TimeRange, Utterance, UtteranceSource};
