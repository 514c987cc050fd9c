//! Pair start/end events and compute per-message latencies.
//!
//! The extractor itself knows nothing about which namespace or tag a given
//! benchmark question needs for a given task: that is decided by the
//! selectors passed in.

use serde::Deserialize;

use super::error::Result;
use super::index::IndexedTask;
use super::types::{LatencySample, LatencySeries, Namespace};

/// Chooses the namespace to pair events in, based on the task label.
pub trait NamespaceSelector {
    fn select(&self, label: &str) -> Namespace;
}

/// Chooses an event tag, based on the task label.
pub trait TagSelector {
    fn select<'a>(&'a self, label: &str) -> &'a str;
}

impl<F> NamespaceSelector for F
where
    F: Fn(&str) -> Namespace,
{
    fn select(&self, label: &str) -> Namespace {
        self(label)
    }
}

impl NamespaceSelector for Namespace {
    fn select(&self, _label: &str) -> Namespace {
        *self
    }
}

impl<F> TagSelector for F
where
    F: Fn(&str) -> &'static str,
{
    fn select<'a>(&'a self, label: &str) -> &'a str {
        self(label)
    }
}

impl TagSelector for str {
    fn select<'a>(&'a self, _label: &str) -> &'a str {
        self
    }
}

/// Namespace rule as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamespaceRule {
    Fixed(Namespace),
    /// `matched` when the label contains `marker`, `otherwise` if not.
    LabelMarker {
        marker: String,
        matched: Namespace,
        otherwise: Namespace,
    },
}

impl NamespaceSelector for NamespaceRule {
    fn select(&self, label: &str) -> Namespace {
        match self {
            NamespaceRule::Fixed(ns) => *ns,
            NamespaceRule::LabelMarker { marker, matched, otherwise } => {
                if label.contains(marker.as_str()) {
                    *matched
                } else {
                    *otherwise
                }
            }
        }
    }
}

/// Tag rule as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagRule {
    Fixed(String),
    LabelMarker {
        marker: String,
        matched: String,
        otherwise: String,
    },
}

impl TagSelector for TagRule {
    fn select<'a>(&'a self, label: &str) -> &'a str {
        match self {
            TagRule::Fixed(tag) => tag.as_str(),
            TagRule::LabelMarker { marker, matched, otherwise } => {
                if label.contains(marker.as_str()) {
                    matched.as_str()
                } else {
                    otherwise.as_str()
                }
            }
        }
    }
}

/// Compute `end - start` for every sequence in `[0, max_ticks)` of one task.
///
/// # Parameters
///
/// * `indexed` - Task to measure, with its event index
/// * `start` / `end` - Tags of the start and end events, chosen per task label
/// * `namespace` - Namespace both events must have been recorded in
/// * `max_ticks` - Exclusive upper bound of the sequence range
///
/// # Returns
///
/// One sample per sequence, aligned by index. Stops at the first coordinate
/// with no recorded event and returns that `EventNotFound`. Negative durations
/// are kept and logged.
pub fn extract_latency<S, E, N>(
    indexed: &IndexedTask,
    start: &S,
    end: &E,
    namespace: &N,
    max_ticks: u64,
) -> Result<LatencySeries>
where
    S: TagSelector + ?Sized,
    E: TagSelector + ?Sized,
    N: NamespaceSelector + ?Sized,
{
    let label = indexed.label();
    let start_tag = start.select(label);
    let end_tag = end.select(label);
    let ns = namespace.select(label);
    log::trace!("Pairing {} -> {} in {} space for `{}`", start_tag, end_tag, ns, label);

    // a run can't yield more samples than it has indexed events
    let mut samples = Vec::with_capacity(max_ticks.min(indexed.index.len() as u64) as usize);
    for sequence in 0..max_ticks {
        let start_event = indexed.get(start_tag, ns, sequence)?;
        let end_event = indexed.get(end_tag, ns, sequence)?;
        let sample = LatencySample {
            sequence,
            duration_ns: end_event.timestamp.saturating_sub(start_event.timestamp),
        };
        if sample.is_negative() {
            log::warn!(
                "Negative latency in `{}`: {} -> {} at sequence {} is {} ns",
                label,
                start_tag,
                end_tag,
                sequence,
                sample.duration_ns
            );
        }
        samples.push(sample);
    }

    Ok(LatencySeries {
        label: label.to_string(),
        samples,
    })
}
