//! Send controller: one analyze round-trip per submission.

use std::sync::Mutex;

use tracing::{info, warn};

use crate::analyzer::AnalyzerClient;
use crate::widget::chart::{ChartSlot, EmotionDistribution};
use crate::widget::log::MessageLog;

/// Bot message shown when the analyze round-trip fails for any reason.
pub const FALLBACK_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

/// What a single submission did to the widget state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty or whitespace-only input: nothing appended, no network call.
    Ignored,
    /// Analyzer answered: user bubble, bot bubble, and a fresh chart.
    Replied,
    /// Analyze round-trip failed: user bubble plus the fallback bot bubble,
    /// chart untouched.
    Failed,
}

/// The page-wide chat widget.
///
/// Owns the append-only message log and the single chart slot, and
/// orchestrates one analyzer round-trip per user submission.
///
/// Nothing guards against overlapping submissions: a second send issued while
/// the first is in flight may interleave bot bubbles and chart updates out of
/// order. That matches the original widget and is kept as a documented
/// limitation rather than silently serialized.
#[derive(Debug)]
pub struct ChatWidget {
    log: MessageLog,
    chart: Mutex<ChartSlot>,
    analyzer: AnalyzerClient,
}

impl ChatWidget {
    /// Create a widget with an empty log and the initial all-zero chart.
    #[must_use]
    pub fn new(analyzer: AnalyzerClient) -> Self {
        let mut chart = ChartSlot::new();
        chart.render(EmotionDistribution::default());
        Self {
            log: MessageLog::new(),
            chart: Mutex::new(chart),
            analyzer,
        }
    }

    /// Handle one submission.
    ///
    /// Trims the input and ignores it if empty; otherwise appends the user
    /// bubble, runs the analyze round-trip, and on success appends the bot
    /// reply and replaces the chart. Any failure appends the fixed fallback
    /// bubble instead and leaves the chart as it was.
    pub async fn send(&self, raw: &str) -> SendOutcome {
        let text = raw.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        info!(name: "widget.send.received", chars = text.len(), "User message received");
        self.log.append(text, true);

        match self.analyzer.analyze(text).await {
            Ok(analysis) => {
                self.log.append(&analysis.response, false);
                self.chart.lock().unwrap().render(analysis.probabilities);
                SendOutcome::Replied
            }
            Err(e) => {
                warn!(name: "analyzer.request.failed", error = %e, "Analyze round-trip failed");
                self.log.append(FALLBACK_MESSAGE, false);
                SendOutcome::Failed
            }
        }
    }

    /// The message log.
    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// SVG of the currently rendered chart.
    #[must_use]
    pub fn chart_svg(&self) -> String {
        self.chart.lock().unwrap().svg()
    }

    /// Number of live chart instances. Always 1 under the slot's
    /// destroy-then-create discipline.
    #[must_use]
    pub fn live_chart_instances(&self) -> usize {
        self.chart.lock().unwrap().live_instances()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_widget() -> ChatWidget {
        // Nothing listens on this port, so every round-trip fails fast.
        ChatWidget::new(AnalyzerClient::new("http://127.0.0.1:9"))
    }

    #[tokio::test]
    async fn empty_input_has_no_effect() {
        let widget = unreachable_widget();

        assert_eq!(widget.send("").await, SendOutcome::Ignored);
        assert_eq!(widget.send("   \t\n").await, SendOutcome::Ignored);

        assert!(widget.log().is_empty());
    }

    #[tokio::test]
    async fn failure_appends_fallback_and_keeps_chart() {
        let widget = unreachable_widget();
        let initial_chart = widget.chart_svg();

        assert_eq!(widget.send("I feel great").await, SendOutcome::Failed);

        let messages = widget.log().messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user);
        assert_eq!(messages[0].text, "I feel great");
        assert!(!messages[1].is_user);
        assert_eq!(messages[1].text, FALLBACK_MESSAGE);

        assert_eq!(widget.chart_svg(), initial_chart);
        assert_eq!(widget.live_chart_instances(), 1);
    }

    #[tokio::test]
    async fn input_is_trimmed_before_append() {
        let widget = unreachable_widget();
        let _ = widget.send("  hello there  ").await;
        assert_eq!(widget.log().messages()[0].text, "hello there");
    }

    #[test]
    fn new_widget_starts_with_zero_chart() {
        let widget = unreachable_widget();
        assert_eq!(widget.live_chart_instances(), 1);
        assert_eq!(
            widget.chart_svg(),
            crate::widget::chart::render_svg(&EmotionDistribution::default())
        );
    }
}
