//! Chart sink that stores chart data as JSON files.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use super::chart::{ChartRequest, ChartSink, RenderCounter};

/// Writes `<out_dir>/<title>_<n>.json` for every chart it receives.
pub struct JsonChartWriter {
    out_dir: PathBuf,
    counter: RenderCounter,
}

impl JsonChartWriter {
    /// Create the writer, creating `out_dir` if it does not exist yet.
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

        Ok(Self {
            out_dir,
            counter: RenderCounter::new(),
        })
    }
}

impl ChartSink for JsonChartWriter {
    fn render(&mut self, request: &ChartRequest<'_>) -> Result<PathBuf> {
        let n = self.counter.next(request.title);
        let path = self.out_dir.join(format!("{}_{}.json", request.title, n));

        let mut payload = request.to_payload();
        payload["generated_at"] = serde_json::json!(Utc::now().to_rfc3339());

        let body = serde_json::to_string_pretty(&payload).context("Failed to serialize chart data")?;
        fs::write(&path, body).with_context(|| format!("Failed to write chart: {}", path.display()))?;

        log::debug!("Wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::{LatencySample, LatencySeries};

    #[test]
    fn test_writes_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pic").join("less_slots");
        let mut writer = JsonChartWriter::new(&out).unwrap();

        let series = vec![LatencySeries {
            label: "mmap[512B*8]".to_string(),
            samples: vec![LatencySample { sequence: 0, duration_ns: 42 }],
        }];
        let x = vec![0];
        let request = ChartRequest {
            title: "write_sync",
            x_axis: &x,
            series: &series,
            y_range: None,
        };

        let first = writer.render(&request).unwrap();
        let second = writer.render(&request).unwrap();
        assert_eq!(first, out.join("write_sync_0.json"));
        assert_eq!(second, out.join("write_sync_1.json"));

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
        assert_eq!(written["series"][0]["label"], "mmap[512B*8]");
        assert_eq!(written["series"][0]["values"], serde_json::json!([42]));
        assert!(written["generated_at"].is_string());
        assert!(written.get("y_range").is_none());
    }
}
