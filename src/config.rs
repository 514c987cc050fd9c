//! Configuration loading for an analysis run.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::analyzer::aggregator::MissingEventPolicy;
use crate::analyzer::question::{self, BenchmarkQuestion, DEFAULT_DIRECT_MARKER};

/// Only the first this-many messages of each run are analyzed by default.
pub const DEFAULT_MAX_TICKS: u64 = 200;

/// Settings for one analysis run, read from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AnalysisConfig {
    /// Log written by the benchmark driver
    pub log_path: PathBuf,
    /// Directory receiving chart data
    pub output_dir: PathBuf,
    /// Sequences `[0, max_ticks)` are analyzed, the rest is dropped at parse time
    pub max_ticks: u64,
    /// Label substring of the direct-syscall driver variant
    pub direct_marker: String,
    pub on_missing: MissingEventPolicy,
    /// Questions to run, by name; empty runs all of them
    pub questions: Vec<String>,
    #[serde(rename = "custom-question")]
    pub custom_questions: Vec<BenchmarkQuestion>,
    /// Per-question y-range overrides
    pub ranges: HashMap<String, Vec<[i64; 2]>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("./log"),
            output_dir: PathBuf::from("./pic"),
            max_ticks: DEFAULT_MAX_TICKS,
            direct_marker: DEFAULT_DIRECT_MARKER.to_string(),
            on_missing: MissingEventPolicy::Fail,
            questions: Vec::new(),
            custom_questions: Vec::new(),
            ranges: HashMap::new(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file.
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    /// The questions to run, with range overrides applied.
    pub fn resolve_questions(&self) -> crate::analyzer::Result<Vec<BenchmarkQuestion>> {
        let mut questions = question::resolve(&self.questions, &self.direct_marker, &self.custom_questions)?;
        for q in &mut questions {
            if let Some(ranges) = self.ranges.get(&q.name) {
                q.ranges = ranges.clone();
            }
        }
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::extractor::{NamespaceRule, TagRule};
    use crate::analyzer::types::Namespace;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: AnalysisConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_ticks, 200);
        assert_eq!(config.direct_marker, "fsrw");
        assert_eq!(config.on_missing, MissingEventPolicy::Fail);
        assert_eq!(config.resolve_questions().unwrap().len(), 5);
    }

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
log-path = "runs/log"
output-dir = "pic/less_slots"
max-ticks = 50
on-missing = "skip"
questions = ["read_sync", "ioctl_wait"]

[ranges]
read_sync = [[0, 2000]]

[[custom-question]]
name = "ioctl_wait"
start = {{ fixed = "WriteSyncStart" }}
end = {{ fixed = "ReadSyncEnd" }}
namespace = {{ label-marker = {{ marker = "ioctl", matched = "kernel", otherwise = "user" }} }}
ranges = [[0, 100]]
"#
        )
        .unwrap();

        let config = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(config.log_path, PathBuf::from("runs/log"));
        assert_eq!(config.max_ticks, 50);
        assert_eq!(config.on_missing, MissingEventPolicy::Skip);

        let questions = config.resolve_questions().unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].name, "read_sync");
        assert_eq!(questions[0].ranges, vec![[0, 2000]]);
        assert_eq!(questions[1].start, TagRule::Fixed("WriteSyncStart".to_string()));
        assert_eq!(
            questions[1].namespace,
            NamespaceRule::LabelMarker {
                marker: "ioctl".to_string(),
                matched: Namespace::Kernel,
                otherwise: Namespace::User,
            }
        );
    }

    #[test]
    fn test_unknown_question_in_config() {
        let config: AnalysisConfig = toml::from_str(r#"questions = ["nope"]"#).unwrap();
        assert!(config.resolve_questions().is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let err = AnalysisConfig::load(Path::new("/nonexistent/analysis.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/analysis.toml"));
    }
}
