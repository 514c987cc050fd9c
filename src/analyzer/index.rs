//! Per-task lookup of events by (tag, namespace, sequence).

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::error::{AnalyzerError, Result};
use super::types::{Event, Namespace, Task};

/// Hash index over one task's retained events.
///
/// Maps tag, then (namespace, sequence), to the event's position in
/// `Task::events`. Built once from a fully filtered task. A missing coordinate
/// is an explicit `EventNotFound` error rather than a default value.
#[derive(Debug)]
pub struct EventIndex {
    label: String,
    positions: HashMap<String, HashMap<(Namespace, u64), usize>>,
    len: usize,
}

impl EventIndex {
    /// Index every event of `task`, rejecting duplicated coordinates.
    pub fn build(task: &Task) -> Result<Self> {
        let mut positions: HashMap<String, HashMap<(Namespace, u64), usize>> = HashMap::new();
        for (position, event) in task.events.iter().enumerate() {
            let by_coordinate = positions.entry(event.tag.clone()).or_default();
            match by_coordinate.entry((event.namespace, event.sequence)) {
                Entry::Occupied(existing) => {
                    let first: &Event = &task.events[*existing.get()];
                    return Err(AnalyzerError::DuplicateEvent {
                        task: task.label().to_string(),
                        tag: event.tag.clone(),
                        namespace: event.namespace,
                        sequence: event.sequence,
                        first: first.timestamp,
                        second: event.timestamp,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }
        }

        Ok(Self {
            label: task.label().to_string(),
            positions,
            len: task.events.len(),
        })
    }

    /// Position in `Task::events` of the event at this coordinate.
    pub fn position(&self, tag: &str, namespace: Namespace, sequence: u64) -> Result<usize> {
        self.positions
            .get(tag)
            .and_then(|by_coordinate| by_coordinate.get(&(namespace, sequence)))
            .copied()
            .ok_or_else(|| AnalyzerError::EventNotFound {
                task: self.label.clone(),
                tag: tag.to_string(),
                namespace,
                sequence,
            })
    }

    pub fn contains(&self, tag: &str, namespace: Namespace, sequence: u64) -> bool {
        self.position(tag, namespace, sequence).is_ok()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A task together with its index, ready for extraction.
#[derive(Debug)]
pub struct IndexedTask {
    pub task: Task,
    pub index: EventIndex,
}

impl IndexedTask {
    pub fn build(task: Task) -> Result<Self> {
        let index = EventIndex::build(&task)?;
        Ok(Self { task, index })
    }

    /// Event recorded at (tag, namespace, sequence), or `EventNotFound`.
    pub fn get(&self, tag: &str, namespace: Namespace, sequence: u64) -> Result<&Event> {
        let position = self.index.position(tag, namespace, sequence)?;
        Ok(&self.task.events[position])
    }

    pub fn label(&self) -> &str {
        self.task.label()
    }
}

/// Index every task before any extraction runs, so duplicates fail early.
pub fn index_tasks(tasks: Vec<Task>) -> Result<Vec<IndexedTask>> {
    tasks.into_iter().map(IndexedTask::build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::log_parser::parse_log;

    #[test]
    fn test_lookup_by_coordinate() {
        let tasks = parse_log("@t\nh\nWriteStart kernel 0 10\nWriteStart user 0 20\nWriteStart kernel 1 30\n").unwrap();
        let indexed = IndexedTask::build(tasks.into_iter().next().unwrap()).unwrap();
        assert_eq!(indexed.index.len(), 3);
        assert_eq!(indexed.index.position("WriteStart", Namespace::User, 0), Ok(1));
        assert_eq!(indexed.get("WriteStart", Namespace::User, 0).unwrap().timestamp, 20);
        assert_eq!(indexed.get("WriteStart", Namespace::Kernel, 1).unwrap().timestamp, 30);
        assert!(indexed.index.contains("WriteStart", Namespace::Kernel, 0));
        assert!(!indexed.index.contains("WriteEnd", Namespace::Kernel, 0));
    }

    #[test]
    fn test_missing_coordinate_is_reported_exactly() {
        let tasks = parse_log("@run\nh\nReadStart user 0 10\n").unwrap();
        let index = EventIndex::build(&tasks[0]).unwrap();
        let err = index.position("ReadStart", Namespace::Kernel, 0).unwrap_err();
        assert_eq!(
            err,
            AnalyzerError::EventNotFound {
                task: "run".to_string(),
                tag: "ReadStart".to_string(),
                namespace: Namespace::Kernel,
                sequence: 0,
            }
        );
    }

    #[test]
    fn test_duplicate_coordinate_is_rejected() {
        let tasks = parse_log("@dup\nh\nWriteEnd kernel 4 100\nWriteEnd kernel 4 180\n").unwrap();
        let err = EventIndex::build(&tasks[0]).unwrap_err();
        assert_eq!(
            err,
            AnalyzerError::DuplicateEvent {
                task: "dup".to_string(),
                tag: "WriteEnd".to_string(),
                namespace: Namespace::Kernel,
                sequence: 4,
                first: 100,
                second: 180,
            }
        );
    }

    #[test]
    fn test_index_tasks_fails_on_any_duplicate() {
        let tasks = parse_log("@ok\nh\nA user 0 1\n@bad\nh\nA user 0 1\nA user 0 2\n").unwrap();
        let err = index_tasks(tasks).unwrap_err();
        assert_eq!(err.task_label(), Some("bad"));
    }

    #[test]
    fn test_empty_task_indexes_to_empty() {
        let tasks = parse_log("@empty\n").unwrap();
        let indexed = IndexedTask::build(tasks.into_iter().next().unwrap()).unwrap();
        assert!(indexed.index.is_empty());
        assert_eq!(indexed.label(), "empty");
    }
}
