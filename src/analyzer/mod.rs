//! Analyzer module for benchmark log parsing and latency extraction.
//!
//! Provides functionality for:
//! - Parsing a complete run log into per-configuration tasks
//! - Indexing each task's events by (tag, namespace, sequence)
//! - Pairing start/end events into per-message latency series
//! - Collecting series per benchmark question for chart export

pub mod aggregator;
pub mod error;
pub mod extractor;
pub mod index;
pub mod log_loader;
pub mod log_parser;
pub mod question;
pub mod types;

pub use aggregator::{MissingEventPolicy, aggregate};
pub use error::{AnalyzerError, Result};
pub use index::{EventIndex, IndexedTask, index_tasks};
pub use log_loader::LogLoader;
pub use question::BenchmarkQuestion;
pub use types::{Event, LatencySeries, Namespace, QuestionSeries, Task};
