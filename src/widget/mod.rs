//! The chat widget: message log, emotion chart, and send controller.
//!
//! # Structure
//!
//! - [`log`]: append-only chat message log
//! - [`chart`]: emotion distribution and single-slot bar chart
//! - [`controller`]: one analyze round-trip per submission

pub mod chart;
pub mod controller;
pub mod log;

pub use chart::{ChartSlot, Emotion, EmotionDistribution};
pub use controller::{ChatWidget, FALLBACK_MESSAGE, SendOutcome};
pub use log::{ChatMessage, MessageLog};
