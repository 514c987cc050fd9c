//! Parse a complete benchmark log into `Task` records.
//!
//! Log layout:
//!
//! ```text
//! @fsrw_atomic_cstmsg[512B*8] 512 8      <- header: label + driver fields
//! 153600 true                            <- client run summary
//! WriteStart kernel 0 1000               <- events
//! WriteEnd kernel 0 1400
//! @mmap_atomic_cstmsg[512B*8] 512 8
//! ...
//! ```
//!
//! Anything before the first delimiter is ignored.

use super::error::{AnalyzerError, Result};
use super::types::{Event, Namespace, RunSummary, Task, TaskHeader};

/// Marks the start of a task block when it is the first character of a line.
pub const TASK_DELIMITER: char = '@';

/// Parse one event line: `<tag> <namespace> <sequence> <timestamp>`.
///
/// `task_label` is only used to give the error some context.
pub fn parse_event_line(line: &str, task_label: &str) -> Result<Event> {
    let malformed = |reason: String| AnalyzerError::MalformedEvent {
        task: task_label.to_string(),
        line: line.to_string(),
        reason,
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let &[tag, namespace, sequence, timestamp] = tokens.as_slice() else {
        return Err(malformed(format!("expected 4 fields, found {}", tokens.len())));
    };

    let namespace: Namespace = namespace.parse().map_err(malformed)?;
    let sequence: u64 = sequence
        .parse()
        .map_err(|e| malformed(format!("invalid sequence `{}`: {}", sequence, e)))?;
    let timestamp: i64 = timestamp
        .parse()
        .map_err(|e| malformed(format!("invalid timestamp `{}`: {}", timestamp, e)))?;

    Ok(Event {
        tag: tag.to_string(),
        namespace,
        sequence,
        timestamp,
    })
}

/// Parse the whole log, keeping every event.
pub fn parse_log(text: &str) -> Result<Vec<Task>> {
    parse_log_with(text, |_| true)
}

/// Parse the whole log, keeping only events accepted by `keep`.
///
/// The filter runs while each task's event list is built, so indexes built
/// from the returned tasks only ever see the retained set.
///
/// # Parameters
///
/// * `text` - Complete log contents
/// * `keep` - Retention predicate, applied after each event line is validated
///
/// # Returns
///
/// Tasks in log order, or the first `MalformedTask` / `MalformedEvent` found.
/// Events dropped by `keep` still have to parse.
pub fn parse_log_with<F>(text: &str, keep: F) -> Result<Vec<Task>>
where
    F: Fn(&Event) -> bool,
{
    let tasks = split_blocks(text)
        .into_iter()
        .enumerate()
        .map(|(index, block)| parse_block(index, &block, &keep))
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Parsed {} task(s), {} retained event(s)",
        tasks.len(),
        tasks.iter().map(|t| t.events.len()).sum::<usize>()
    );
    Ok(tasks)
}

/// Standard retention predicate: drop everything at or beyond `max_ticks`.
pub fn retain_below(max_ticks: u64) -> impl Fn(&Event) -> bool {
    move |event| event.sequence < max_ticks
}

/// Split the log into blocks of lines, one per delimiter. The delimiter itself
/// is stripped from the first line of each block.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(TASK_DELIMITER) {
            blocks.push(vec![rest]);
        } else if let Some(current) = blocks.last_mut() {
            current.push(line);
        }
        // preamble before the first delimiter
    }
    blocks
}

fn parse_block<F>(index: usize, lines: &[&str], keep: &F) -> Result<Task>
where
    F: Fn(&Event) -> bool,
{
    let header_line = lines.first().map(|l| l.trim()).unwrap_or_default();
    if header_line.is_empty() {
        return Err(AnalyzerError::MalformedTask {
            index,
            reason: "block has no header".to_string(),
        });
    }
    // trimmed and non-empty, so there is always a first token
    let mut tokens = header_line.split_whitespace();
    let header = TaskHeader {
        label: tokens.next().unwrap_or_default().to_string(),
        fields: tokens.map(str::to_string).collect(),
    };

    let mut lines = lines.iter().skip(1).map(|l| l.trim()).filter(|l| !l.is_empty());

    let summary = match lines.next() {
        Some(raw) if parse_event_line(raw, &header.label).is_ok() => {
            return Err(AnalyzerError::MalformedTask {
                index,
                reason: format!("missing run summary, found event `{}`", raw),
            });
        }
        Some(raw) => Some(RunSummary { raw: raw.to_string() }),
        None => None,
    };

    let mut events = Vec::new();
    for line in lines {
        let event = parse_event_line(line, &header.label)?;
        if keep(&event) {
            events.push(event);
        }
    }

    log::trace!("Task `{}`: {} event(s) retained", header.label, events.len());
    Ok(Task { header, summary, events })
}
