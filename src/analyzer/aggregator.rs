//! Run one benchmark question over every task and collect the series.

use serde::Deserialize;

use super::error::Result;
use super::index::IndexedTask;
use super::question::BenchmarkQuestion;
use super::types::{QuestionSeries, SkippedTask};

/// What to do when a task lacks an event a question needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingEventPolicy {
    /// Abort the question with the error.
    #[default]
    Fail,
    /// Leave the task out of this question's output and record why.
    Skip,
}

/// Extract `question` from every task, in task order.
///
/// # Parameters
///
/// * `question` - Tag pair and namespace rule to measure
/// * `tasks` - Indexed tasks in log order
/// * `max_ticks` - Sequences `[0, max_ticks)` are measured per task
/// * `policy` - Whether a task with a missing event fails the question or is skipped
///
/// # Returns
///
/// Series in the same order as `tasks`. With `MissingEventPolicy::Skip` a task
/// that fails extraction is listed in `skipped` instead; no value is ever
/// substituted for a missing event. The x-axis is empty when no task produced
/// a series.
pub fn aggregate(
    question: &BenchmarkQuestion,
    tasks: &[IndexedTask],
    max_ticks: u64,
    policy: MissingEventPolicy,
) -> Result<QuestionSeries> {
    let mut series = Vec::with_capacity(tasks.len());
    let mut skipped = Vec::new();

    for task in tasks {
        match question.extract(task, max_ticks) {
            Ok(s) => series.push(s),
            Err(e) if policy == MissingEventPolicy::Skip => {
                log::warn!("Skipping `{}` for {}: {}", task.label(), question.name, e);
                skipped.push(SkippedTask {
                    label: task.label().to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    log::info!(
        "{}: {} series, {} skipped, {} with negative samples",
        question.name,
        series.len(),
        skipped.len(),
        series.iter().filter(|s| s.has_negative()).count()
    );

    // every produced series covers the whole range, so it bounds the axis
    let x_axis = match series.first() {
        Some(first) => first.samples.iter().map(|s| s.sequence).collect(),
        None => Vec::new(),
    };

    Ok(QuestionSeries {
        question: question.name.clone(),
        x_axis,
        series,
        skipped,
    })
}
