//! Chart request types and the sink interface.

use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::analyzer::types::{LatencySeries, QuestionSeries};

/// Everything needed to draw one chart.
#[derive(Debug, Clone)]
pub struct ChartRequest<'a> {
    pub title: &'a str,
    pub x_axis: &'a [u64],
    pub series: &'a [LatencySeries],
    /// `None` draws the full range.
    pub y_range: Option<(i64, i64)>,
}

impl ChartRequest<'_> {
    /// Build the JSON document describing this chart.
    pub fn to_payload(&self) -> serde_json::Value {
        let series: Vec<serde_json::Value> = self
            .series
            .iter()
            .map(|s| {
                let negatives: Vec<u64> = s.negatives().map(|n| n.sequence).collect();
                serde_json::json!({
                    "label": s.label,
                    "values": s.values(),
                    "negative_sequences": negatives,
                })
            })
            .collect();

        let mut payload = serde_json::json!({
            "title": self.title,
            "x_label": "ticker (n-th msg)",
            "y_label": "time / ns",
            "x": self.x_axis,
            "series": series,
        });
        if let Some((min, max)) = self.y_range {
            payload["y_range"] = serde_json::json!([min, max]);
        }
        payload
    }
}

/// Receives chart requests; returns where the chart ended up.
pub trait ChartSink {
    fn render(&mut self, request: &ChartRequest<'_>) -> Result<PathBuf>;
}

/// Per-title render count used to give each chart of a title its own name.
#[derive(Debug, Default)]
pub struct RenderCounter {
    counts: HashMap<String, u32>,
}

impl RenderCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current index for `title`, then advance it.
    pub fn next(&mut self, title: &str) -> u32 {
        let count = self.counts.entry(title.to_string()).or_insert(0);
        let current = *count;
        *count += 1;
        current
    }
}

/// Send one question to `sink`: the full range first, then each window.
pub fn render_question(sink: &mut dyn ChartSink, series: &QuestionSeries, ranges: &[[i64; 2]]) -> Result<Vec<PathBuf>> {
    let windows = std::iter::once(None).chain(ranges.iter().map(|[min, max]| Some((*min, *max))));

    let mut outputs = Vec::with_capacity(ranges.len() + 1);
    for y_range in windows {
        let request = ChartRequest {
            title: &series.question,
            x_axis: &series.x_axis,
            series: &series.series,
            y_range,
        };
        outputs.push(sink.render(&request)?);
    }
    Ok(outputs)
}
