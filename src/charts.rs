//! Trend chart and word cloud.
//!
//! Layout and drawing are somebody else's job: this module shapes the data
//! and hands it to a [`ChartEngine`] or [`WordCloudEngine`]. The document
//! engines serialize the draw command into a `data-*` attribute for the page
//! script, which feeds it to the browser charting libraries.

use std::sync::mpsc;
use std::time::Duration;

use serde::Serialize;

use crate::dom::{Document, ElementId};
use crate::models::{TrendSeries, WordWeight};
use crate::style;
use crate::view::View;

/// Data attribute carrying the serialized trend chart.
pub const CHART_DATA_KEY: &str = "chart";
/// Data attribute carrying the serialized word list.
pub const CLOUD_DATA_KEY: &str = "cloud";

// ---------------------------------------------------------------------------
// Trend chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<u64>,
    pub border_color: &'static str,
    pub background_color: &'static str,
}

/// A line chart: one label per date, one dataset per sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl TrendChart {
    pub fn from_series(series: &TrendSeries) -> Self {
        Self {
            labels: series.dates.clone(),
            datasets: vec![
                Dataset {
                    label: "Positif",
                    data: series.positive.clone(),
                    border_color: style::POSITIF.color,
                    background_color: "rgba(166, 227, 197, 0.2)",
                },
                Dataset {
                    label: "Negatif",
                    data: series.negative.clone(),
                    border_color: style::NEGATIF.color,
                    background_color: "rgba(245, 184, 194, 0.2)",
                },
                Dataset {
                    label: "Netral",
                    data: series.neutral.clone(),
                    border_color: style::NETRAL.color,
                    background_color: "rgba(191, 215, 238, 0.2)",
                },
            ],
        }
    }
}

/// Draws a trend chart into a target element, replacing any previous one.
pub trait ChartEngine {
    fn draw(&mut self, doc: &mut Document, target: Option<ElementId>, chart: &TrendChart);
}

/// Writes the chart as JSON into the target's `data-chart` attribute.
#[derive(Debug, Default)]
pub struct DocumentChartEngine {
    current: Option<TrendChart>,
}

impl DocumentChartEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chart currently on screen.
    pub fn current(&self) -> Option<&TrendChart> {
        self.current.as_ref()
    }
}

impl ChartEngine for DocumentChartEngine {
    fn draw(&mut self, doc: &mut Document, target: Option<ElementId>, chart: &TrendChart) {
        match serde_json::to_string(chart) {
            Ok(json) => doc.set_data(target, CHART_DATA_KEY, json),
            Err(e) => log::warn!("failed to serialize trend chart: {e}"),
        }
        self.current = Some(chart.clone());
    }
}

pub fn render_trend(
    doc: &mut Document,
    view: &View,
    engine: &mut dyn ChartEngine,
    series: &TrendSeries,
) {
    engine.draw(doc, view.trend_chart, &TrendChart::from_series(series));
}

// ---------------------------------------------------------------------------
// Word cloud
// ---------------------------------------------------------------------------

/// Smallest and largest font size handed to the layout engine.
pub const MIN_TERM_SIZE: f64 = 10.0;
pub const MAX_TERM_SIZE: f64 = 60.0;

/// Lays out weighted terms. Must send on `done` once layout finishes; may do
/// so from another thread, or never.
pub trait WordCloudEngine {
    fn draw(
        &mut self,
        doc: &mut Document,
        target: Option<ElementId>,
        terms: &[(String, f64)],
        done: mpsc::Sender<()>,
    );
}

/// Writes the term list as JSON into `data-cloud` and completes at once.
#[derive(Debug, Default)]
pub struct DocumentCloudEngine;

impl WordCloudEngine for DocumentCloudEngine {
    fn draw(
        &mut self,
        doc: &mut Document,
        target: Option<ElementId>,
        terms: &[(String, f64)],
        done: mpsc::Sender<()>,
    ) {
        match serde_json::to_string(terms) {
            Ok(json) => doc.set_data(target, CLOUD_DATA_KEY, json),
            Err(e) => log::warn!("failed to serialize word cloud: {e}"),
        }
        let _ = done.send(());
    }
}

/// Scale weights into `[MIN_TERM_SIZE, MAX_TERM_SIZE]` relative to the
/// heaviest term. A non-positive maximum is treated as 1.
pub fn normalize_terms(words: &[WordWeight]) -> Vec<(String, f64)> {
    let max = words
        .iter()
        .map(|w| w.weight)
        .fold(f64::NEG_INFINITY, f64::max);
    let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };

    words
        .iter()
        .map(|w| {
            let size = w.weight / max * (MAX_TERM_SIZE - MIN_TERM_SIZE) + MIN_TERM_SIZE;
            (w.text.clone(), size)
        })
        .collect()
}

/// How a word-cloud render ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudOutcome {
    Empty,
    Completed,
    TimedOut,
}

/// Draw the word cloud with the loading indicator up until the engine
/// reports completion or `timeout` passes, whichever comes first.
pub fn render_word_cloud(
    doc: &mut Document,
    view: &View,
    engine: &mut dyn WordCloudEngine,
    words: &[WordWeight],
    timeout: Duration,
) -> CloudOutcome {
    if words.is_empty() {
        doc.hide(view.wordcloud_loading);
        return CloudOutcome::Empty;
    }

    doc.show(view.wordcloud_loading);
    let terms = normalize_terms(words);
    let (done_tx, done_rx) = mpsc::channel();
    engine.draw(doc, view.word_cloud_canvas, &terms, done_tx);

    let outcome = match done_rx.recv_timeout(timeout) {
        Ok(()) => CloudOutcome::Completed,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            log::warn!("word cloud layout still running after {timeout:?}");
            CloudOutcome::TimedOut
        }
        // Engine dropped the sender without signalling; nothing will come.
        Err(mpsc::RecvTimeoutError::Disconnected) => CloudOutcome::TimedOut,
    };
    doc.hide(view.wordcloud_loading);
    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
