//! Error taxonomy for log parsing, indexing and latency extraction.
//!
//! Every variant is fatal at the point of detection. Callers get the task
//! label and the exact event coordinate involved so a failed run can be
//! traced back to the log without re-parsing it.

use thiserror::Error;

use super::types::Namespace;

/// Result type alias for analyzer operations.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    /// A log line does not have the `<tag> <namespace> <sequence> <timestamp>` shape.
    #[error("malformed event in task `{task}`: {reason} (line: `{line}`)")]
    MalformedEvent { task: String, line: String, reason: String },

    /// A task block is empty or has no usable header.
    #[error("malformed task block #{index}: {reason}")]
    MalformedTask { index: usize, reason: String },

    /// A required event was never recorded for this task.
    #[error("task `{task}` has no `{tag}` event in {namespace} space for sequence {sequence}")]
    EventNotFound {
        task: String,
        tag: String,
        namespace: Namespace,
        sequence: u64,
    },

    /// Two events share one (tag, namespace, sequence) coordinate.
    #[error(
        "task `{task}` recorded `{tag}` in {namespace} space twice for sequence {sequence} (timestamps {first} and {second})"
    )]
    DuplicateEvent {
        task: String,
        tag: String,
        namespace: Namespace,
        sequence: u64,
        first: i64,
        second: i64,
    },

    /// A configured question name matches neither a built-in nor a custom question.
    #[error("unknown benchmark question `{name}`")]
    UnknownQuestion { name: String },
}

impl AnalyzerError {
    /// Label of the task the error refers to, if any.
    pub fn task_label(&self) -> Option<&str> {
        match self {
            AnalyzerError::MalformedEvent { task, .. }
            | AnalyzerError::EventNotFound { task, .. }
            | AnalyzerError::DuplicateEvent { task, .. } => Some(task),
            AnalyzerError::MalformedTask { .. } | AnalyzerError::UnknownQuestion { .. } => None,
        }
    }
}
