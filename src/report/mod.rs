//! Chart export for latency series.
//!
//! The analyzer hands each question's series to a `ChartSink`, once per
//! y-axis range. Rendering and styling happen outside this crate; the bundled
//! sink writes the chart data as JSON.

pub mod chart;
pub mod writer;

pub use chart::{ChartRequest, ChartSink, RenderCounter, render_question};
pub use writer::JsonChartWriter;
