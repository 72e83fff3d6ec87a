//! Emotion Chat Widget
//!
//! An HTML-first chat widget service. It renders chat bubbles, forwards user
//! text to an external emotion-analysis endpoint, and renders the returned
//! emotion-probability vector as a bar chart.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server rendering HTMX fragments
//! - **Widget**: server-held message log, chart slot, and send controller
//! - **Analyzer client**: HTTP client for the external `/analyze` collaborator
//!
//! # Modules
//!
//! - [`analyzer`]: client for the external emotion-analysis endpoint
//! - [`config`]: layered application configuration
//! - [`server`]: router, page shell, and fragment handlers
//! - [`widget`]: message log, emotion chart, and send controller

pub mod analyzer;
pub mod config;
pub mod server;
pub mod widget;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::widget::ChatWidget;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The single page-wide chat widget.
    pub widget: Arc<ChatWidget>,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}
