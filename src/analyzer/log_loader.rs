//! Read a finished benchmark log from disk.
//!
//! The driver appends to the log while runs are in progress; analysis only
//! starts once every run has finished, so the whole file is read eagerly.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::error;
use super::log_parser::{parse_log_with, retain_below};
use super::types::Task;

/// Buffer size for reading log files (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Complete contents of one log file.
pub struct LogLoader {
    path: PathBuf,
    text: String,
}

impl LogLoader {
    /// Read the whole log at `path`.
    ///
    /// # Parameters
    ///
    /// * `path` - Log file written by the benchmark driver
    ///
    /// # Returns
    ///
    /// The loaded log. Fails with the path in the error context if the file
    /// cannot be opened or is not valid UTF-8.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?;

        let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .with_context(|| format!("Failed to read log file: {}", path.display()))?;

        log::info!("Loaded {} ({} bytes)", path.display(), text.len());
        Ok(Self { path, text })
    }

    /// Parse into tasks, keeping events with `sequence < max_ticks`.
    pub fn tasks(&self, max_ticks: u64) -> error::Result<Vec<Task>> {
        parse_log_with(&self.text, retain_below(max_ticks))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
