//! Emotion distribution and single-slot bar chart.
//!
//! The chart is a component-owned single-slot resource: at most one live
//! chart instance exists at any time, and rendering a new distribution
//! destroys the previous instance before the replacement is built. The chart
//! itself is a server-rendered SVG with a fixed category order, fixed colors,
//! and a y-axis pinned to `[0, 1]` labeled in percent.

use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// The four fixed emotion categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Anger,
    Fear,
    Joy,
    Sadness,
}

impl Emotion {
    /// All categories in chart order.
    pub const ALL: [Self; 4] = [Self::Anger, Self::Fear, Self::Joy, Self::Sadness];

    /// Lowercase display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Anger => "anger",
            Self::Fear => "fear",
            Self::Joy => "joy",
            Self::Sadness => "sadness",
        }
    }

    /// Fixed bar color for this category.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Anger => "#dc3545",
            Self::Fear => "#17a2b8",
            Self::Joy => "#ffc107",
            Self::Sadness => "#28a745",
        }
    }
}

/// Probability per emotion. All four categories are always present; values
/// are expected in `[0, 1]` but are not required to sum to 1, and are only
/// clamped for bar geometry, never validated. A category the analyzer left
/// out decodes as 0 and surfaces as a zero-height bar, not as an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionDistribution {
    pub anger: f64,
    pub fear: f64,
    pub joy: f64,
    pub sadness: f64,
}

impl EmotionDistribution {
    /// Value for one category.
    #[must_use]
    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Anger => self.anger,
            Emotion::Fear => self.fear,
            Emotion::Joy => self.joy,
            Emotion::Sadness => self.sadness,
        }
    }
}

// SVG geometry. The plot area is WIDTH/HEIGHT minus the axis margins.
const WIDTH: f64 = 420.0;
const HEIGHT: f64 = 260.0;
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 32.0;
const PLOT_WIDTH: f64 = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

/// Height in SVG units of a bar at probability 1.0.
pub const PLOT_HEIGHT: f64 = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

/// Render a distribution as an SVG bar chart.
///
/// One bar per category in fixed order and color, y-axis `[0, 1]` with
/// percentage tick labels, no legend, and a per-bar `<title>` tooltip of the
/// form `"<label>: <percentage to 1 decimal>%"`. Deterministic: the same
/// distribution always yields the same markup.
#[must_use]
pub fn render_svg(dist: &EmotionDistribution) -> String {
    let mut svg = String::with_capacity(2048);
    let _ = write!(
        svg,
        r#"<svg viewBox="0 0 {WIDTH} {HEIGHT}" xmlns="http://www.w3.org/2000/svg" role="img">"#
    );

    // Y axis: gridlines and percent ticks at 0, 25, 50, 75, 100.
    for step in 0..=4u32 {
        let frac = f64::from(step) / 4.0;
        let y = MARGIN_TOP + PLOT_HEIGHT * (1.0 - frac);
        let percent = (frac * 100.0).round();
        let _ = write!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#e9ecef" stroke-width="1"/>"##,
            MARGIN_LEFT + PLOT_WIDTH,
        );
        let _ = write!(
            svg,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11" fill="#6c757d">{percent:.0}%</text>"##,
            MARGIN_LEFT - 6.0,
            y + 4.0,
        );
    }

    // Bars, clamped to the [0, 1] axis; tooltips report the raw value.
    let slot = PLOT_WIDTH / 4.0;
    let bar_width = slot * 0.6;
    for (i, emotion) in Emotion::ALL.iter().enumerate() {
        let value = dist.get(*emotion);
        let clamped = value.clamp(0.0, 1.0);
        let bar_height = clamped * PLOT_HEIGHT;
        let x = MARGIN_LEFT + slot.mul_add(i as f64, slot * 0.2);
        let y = MARGIN_TOP + PLOT_HEIGHT - bar_height;

        let _ = write!(
            svg,
            r#"<rect class="emotion-bar" x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{bar_height:.1}" rx="5" fill="{}"><title>{}: {:.1}%</title></rect>"#,
            emotion.color(),
            emotion.label(),
            value * 100.0,
        );
        let _ = write!(
            svg,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" fill="#495057">{}</text>"##,
            x + bar_width / 2.0,
            HEIGHT - 10.0,
            emotion.label(),
        );
    }

    svg.push_str("</svg>");
    svg
}

/// One rendered chart. Dropping the instance releases it, which is observable
/// through the owning slot's live-instance count.
#[derive(Debug)]
pub struct ChartInstance {
    dist: EmotionDistribution,
    svg: String,
    live: Arc<AtomicUsize>,
}

impl ChartInstance {
    fn new(dist: EmotionDistribution, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::Relaxed);
        Self {
            dist,
            svg: render_svg(&dist),
            live,
        }
    }

    /// The distribution this instance was built from.
    #[must_use]
    pub fn distribution(&self) -> &EmotionDistribution {
        &self.dist
    }

    /// Rendered SVG markup.
    #[must_use]
    pub fn svg(&self) -> &str {
        &self.svg
    }
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Single-slot holder for the current chart instance.
///
/// Replace semantics: `render` destroys the previous instance before building
/// its successor, so at most one instance is ever live.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<ChartInstance>,
    live: Arc<AtomicUsize>,
}

impl ChartSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current chart with a render of `dist`.
    pub fn render(&mut self, dist: EmotionDistribution) {
        // Release the old instance before the new one exists.
        drop(self.current.take());
        self.current = Some(ChartInstance::new(dist, Arc::clone(&self.live)));
    }

    /// The current instance, if one has been rendered.
    #[must_use]
    pub fn current(&self) -> Option<&ChartInstance> {
        self.current.as_ref()
    }

    /// SVG of the current instance, or empty if nothing was rendered yet.
    #[must_use]
    pub fn svg(&self) -> String {
        self.current
            .as_ref()
            .map(|c| c.svg().to_string())
            .unwrap_or_default()
    }

    /// Number of live chart instances created through this slot.
    #[must_use]
    pub fn live_instances(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }
}
