//! Type definitions specific to the analyzer module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side of the user/kernel boundary that recorded an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Kernel,
    User,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Kernel => "kernel",
            Namespace::User => "user",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kernel" => Ok(Namespace::Kernel),
            "user" => Ok(Namespace::User),
            other => Err(format!("unknown namespace `{}`", other)),
        }
    }
}

/// One timestamped record emitted by the instrumented driver or client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Instrumentation point, e.g. `WriteStart`.
    pub tag: String,
    pub namespace: Namespace,
    /// Zero-based index of the message within its run.
    pub sequence: u64,
    /// Monotonic clock reading in nanoseconds.
    pub timestamp: i64,
}

/// Same four-token layout the client writes to the log.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.tag, self.namespace, self.sequence, self.timestamp)
    }
}

/// Header line written by the benchmark driver before each run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHeader {
    /// Configuration label (driver variant, message size, slot count).
    pub label: String,
    /// Remaining header tokens, kept verbatim.
    pub fields: Vec<String>,
}

/// Summary line the client prints right after the header: `<bytes> <sync>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub raw: String,
}

impl RunSummary {
    /// Bytes moved during the run, when the first token is numeric.
    pub fn bytes_transferred(&self) -> Option<u64> {
        self.raw.split_whitespace().next()?.parse().ok()
    }

    /// Whether the client ran in synchronised mode, when the second token is a bool.
    pub fn synchronized(&self) -> Option<bool> {
        self.raw.split_whitespace().nth(1)?.parse().ok()
    }
}

/// One benchmark run: a header plus its retained events in log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub header: TaskHeader,
    pub summary: Option<RunSummary>,
    pub events: Vec<Event>,
}

impl Task {
    pub fn label(&self) -> &str {
        &self.header.label
    }
}

/// Duration between a start and an end event for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencySample {
    pub sequence: u64,
    pub duration_ns: i64,
}

impl LatencySample {
    /// End was recorded before start; usually a clock or ordering problem upstream.
    pub fn is_negative(&self) -> bool {
        self.duration_ns < 0
    }
}

/// Per-sequence durations for one task, aligned by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencySeries {
    pub label: String,
    pub samples: Vec<LatencySample>,
}

impl LatencySeries {
    pub fn values(&self) -> Vec<i64> {
        self.samples.iter().map(|s| s.duration_ns).collect()
    }

    pub fn negatives(&self) -> impl Iterator<Item = &LatencySample> {
        self.samples.iter().filter(|s| s.is_negative())
    }

    pub fn has_negative(&self) -> bool {
        self.negatives().next().is_some()
    }
}

/// A task left out of a question's output, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTask {
    pub label: String,
    pub reason: String,
}

/// Everything the visualization side needs for one benchmark question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSeries {
    pub question: String,
    pub x_axis: Vec<u64>,
    /// In task order; a label may repeat if the same configuration ran twice.
    pub series: Vec<LatencySeries>,
    pub skipped: Vec<SkippedTask>,
}

impl QuestionSeries {
    /// First series recorded under `label`.
    pub fn get(&self, label: &str) -> Option<&LatencySeries> {
        self.series.iter().find(|s| s.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.label.as_str())
    }

    /// `(label, values)` pairs in task order.
    pub fn as_pairs(&self) -> Vec<(String, Vec<i64>)> {
        self.series.iter().map(|s| (s.label.clone(), s.values())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_tokens() {
        assert_eq!("kernel".parse::<Namespace>(), Ok(Namespace::Kernel));
        assert_eq!("user".parse::<Namespace>(), Ok(Namespace::User));
        assert!("Kernel".parse::<Namespace>().is_err());
        assert_eq!(Namespace::User.to_string(), "user");
    }

    #[test]
    fn test_run_summary_fields() {
        let summary = RunSummary { raw: "153600 true".to_string() };
        assert_eq!(summary.bytes_transferred(), Some(153600));
        assert_eq!(summary.synchronized(), Some(true));

        let opaque = RunSummary { raw: "h1 x".to_string() };
        assert_eq!(opaque.bytes_transferred(), None);
        assert_eq!(opaque.synchronized(), None);

        // a real zero stays distinguishable from an unparseable count
        let idle = RunSummary { raw: "0 false".to_string() };
        assert_eq!(idle.bytes_transferred(), Some(0));
        assert_ne!(idle.bytes_transferred(), opaque.bytes_transferred());
    }

    #[test]
    fn test_negative_samples_are_reported() {
        let series = LatencySeries {
            label: "t".to_string(),
            samples: vec![
                LatencySample { sequence: 0, duration_ns: 10 },
                LatencySample { sequence: 1, duration_ns: -4 },
            ],
        };
        assert!(series.has_negative());
        let negatives: Vec<u64> = series.negatives().map(|s| s.sequence).collect();
        assert_eq!(negatives, vec![1]);
        assert_eq!(series.values(), vec![10, -4]);
    }
}
