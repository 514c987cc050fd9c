//! Benchmark questions: which tag pair to measure and in which namespace.

use serde::Deserialize;

use super::error::{AnalyzerError, Result};
use super::extractor::{NamespaceRule, TagRule, extract_latency};
use super::index::IndexedTask;
use super::types::{LatencySeries, Namespace};

/// Label substring identifying the direct-syscall (read/write) driver variant.
pub const DEFAULT_DIRECT_MARKER: &str = "fsrw";

/// One latency measurement applied to every task of a log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BenchmarkQuestion {
    pub name: String,
    pub start: TagRule,
    pub end: TagRule,
    pub namespace: NamespaceRule,
    /// Zoomed y-axis windows rendered in addition to the full range.
    #[serde(default)]
    pub ranges: Vec<[i64; 2]>,
}

impl BenchmarkQuestion {
    fn fixed(name: &str, start: &str, end: &str, namespace: NamespaceRule, ranges: &[[i64; 2]]) -> Self {
        Self {
            name: name.to_string(),
            start: TagRule::Fixed(start.to_string()),
            end: TagRule::Fixed(end.to_string()),
            namespace,
            ranges: ranges.to_vec(),
        }
    }

    /// Run this question against one indexed task.
    pub fn extract(&self, task: &IndexedTask, max_ticks: u64) -> Result<LatencySeries> {
        extract_latency(task, &self.start, &self.end, &self.namespace, max_ticks)
    }
}

fn direct_or_user(marker: &str) -> NamespaceRule {
    NamespaceRule::LabelMarker {
        marker: marker.to_string(),
        matched: Namespace::Kernel,
        otherwise: Namespace::User,
    }
}

/// The five standard questions. `marker` selects the direct-syscall variant.
pub fn builtin(marker: &str) -> Vec<BenchmarkQuestion> {
    let kernel = NamespaceRule::Fixed(Namespace::Kernel);
    vec![
        BenchmarkQuestion::fixed("write_copy", "WriteStart", "WriteEnd", kernel.clone(), &[[0, 500], [10_000, 60_000]]),
        BenchmarkQuestion::fixed("read_copy", "ReadStart", "ReadEnd", direct_or_user(marker), &[[0, 2_500], [200_000, 800_000]]),
        BenchmarkQuestion::fixed("write_sync", "WriteSyncStart", "WriteSyncEnd", kernel, &[[0, 20_000], [0, 500]]),
        BenchmarkQuestion::fixed("read_sync", "ReadSyncStart", "ReadSyncEnd", direct_or_user(marker), &[[0, 1_000]]),
        BenchmarkQuestion {
            name: "read_total".to_string(),
            start: TagRule::LabelMarker {
                marker: marker.to_string(),
                matched: "ReadStart".to_string(),
                otherwise: "ReadSyncStart".to_string(),
            },
            end: TagRule::Fixed("ReadEnd".to_string()),
            namespace: NamespaceRule::Fixed(Namespace::User),
            ranges: vec![[0, 10_000], [300_000, 800_000]],
        },
    ]
}

/// Pick questions by name from the built-ins plus `custom`, in the order given.
///
/// An empty `names` list selects every built-in followed by every custom question.
/// Custom questions shadow built-ins of the same name.
pub fn resolve(names: &[String], marker: &str, custom: &[BenchmarkQuestion]) -> Result<Vec<BenchmarkQuestion>> {
    let mut available = builtin(marker);
    for question in custom {
        match available.iter_mut().find(|q| q.name == question.name) {
            Some(existing) => *existing = question.clone(),
            None => available.push(question.clone()),
        }
    }

    if names.is_empty() {
        return Ok(available);
    }

    names
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|q| &q.name == name)
                .cloned()
                .ok_or_else(|| AnalyzerError::UnknownQuestion { name: name.clone() })
        })
        .collect()
}
