//! HTTP surface of the widget: page shell, send endpoint, static assets.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::analyzer::AnalyzerClient;
use crate::config::AppConfig;
use crate::widget::{ChatWidget, SendOutcome};

/// Build the shared state for a configuration.
#[must_use]
pub fn build_state(config: Arc<AppConfig>) -> AppState {
    let analyzer = AnalyzerClient::new(&config.analyzer.base_url);
    AppState {
        widget: Arc::new(ChatWidget::new(analyzer)),
        config,
    }
}

/// Build the application router.
#[must_use]
pub fn app(config: Arc<AppConfig>) -> Router {
    let state = build_state(config);

    // The analyze round-trip itself carries no timeout; this whole-request
    // timeout is opt-in and off by default. Disabling is expressed as a very
    // large duration so the router type stays uniform.
    let timeout_duration = if state.config.resilience.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60)
    } else {
        Duration::from_secs(30)
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/send", post(send_handler))
        .route("/healthz", get(healthz_handler))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout_duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .with_state(state)
}

/// Start the server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "analyzer.config.loaded",
        base_url = %config.analyzer.base_url,
        "Analyzer configuration loaded"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app(config)).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page
// ─────────────────────────────────────────────────────────────────────────────

/// Generate the HTML shell around the widget.
fn html_shell(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Emotion-aware chat widget">
    <title>Emotion Chat</title>

    <!-- HTMX (local, no CDN) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <div class="app-shell">
        <header class="app-header">
            <span class="app-title">Emotion Chat</span>
        </header>
        <main class="app-main">
{content}
        </main>
    </div>
</body>
</html>"#
    )
}

/// Widget content: chat log, input form, and chart panel.
///
/// Ids match the widget's DOM contract: `#chat-container` is the scrollable
/// log, `#user-input` the text field, `#emotionChart` the chart surface. The
/// form degrades to a plain full-page POST when HTMX is unavailable.
fn widget_content(state: &AppState) -> String {
    format!(
        r##"<div class="chat-panel">
    <div id="chat-container" class="chat-container">
{log}
    </div>
    <form class="chat-form"
          action="/send" method="post"
          hx-post="/send"
          hx-target="#chat-container"
          hx-swap="innerHTML scroll:bottom"
          hx-on::after-request="this.reset()">
        <input id="user-input" name="text" type="text" autocomplete="off"
               placeholder="How are you feeling?">
        <button type="submit">Send</button>
    </form>
</div>
<div class="chart-panel">
    <div id="emotionChart" class="chart-surface">
{chart}
    </div>
</div>"##,
        log = state.widget.log().to_html(),
        chart = state.widget.chart_svg(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Form body for `POST /send`.
#[derive(Debug, Deserialize)]
struct SendForm {
    /// Raw input field contents; trimming happens in the widget.
    #[serde(default)]
    text: String,
}

/// GET / - the widget page with the current log and chart.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(html_shell(&widget_content(&state)))
}

/// POST /send - run one submission through the widget.
///
/// HTMX clients get the re-rendered log as the swap target plus an
/// out-of-band chart update; plain form posts get the full page back. An
/// ignored (empty) submission answers 204 so HTMX leaves the page alone.
async fn send_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SendForm>,
) -> Response {
    let outcome = state.widget.send(&form.text).await;

    if headers.contains_key("hx-request") {
        match outcome {
            SendOutcome::Ignored => StatusCode::NO_CONTENT.into_response(),
            SendOutcome::Replied | SendOutcome::Failed => {
                let fragment = format!(
                    "{log}\n<div id=\"emotionChart\" hx-swap-oob=\"innerHTML\">{chart}</div>",
                    log = state.widget.log().to_html(),
                    chart = state.widget.chart_svg(),
                );
                Html(fragment).into_response()
            }
        }
    } else {
        Html(html_shell(&widget_content(&state))).into_response()
    }
}

/// GET /healthz - liveness probe.
async fn healthz_handler() -> &'static str {
    "ok"
}
