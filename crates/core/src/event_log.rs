//! Append-only event log.
//!
//! Every routing decision writes one JSON object per line with the shape
//! `{"timestamp": "...Z", "event_type": "...", "payload": {...}}`. Entries are
//! never rewritten or removed.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::ApplicationError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub event_type: String,
    pub payload: Value,
}

impl LogEntry {
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self::at(Utc::now(), event_type, payload)
    }

    pub fn at(occurred_at: DateTime<Utc>, event_type: impl Into<String>, payload: Value) -> Self {
        Self { timestamp: format_timestamp(occurred_at), event_type: event_type.into(), payload }
    }
}

/// UTC ISO-8601 with microseconds and a trailing `Z`.
pub fn format_timestamp(occurred_at: DateTime<Utc>) -> String {
    occurred_at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

pub trait EventSink: Send + Sync {
    fn emit(&self, entry: LogEntry);

    fn log_event(&self, event_type: &str, payload: Value) {
        self.emit(LogEntry::new(event_type, payload));
    }
}

/// File-backed sink. Appends are serialized through a mutex so the sink can be
/// shared across threads.
#[derive(Debug)]
pub struct JsonlEventSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlEventSink {
    /// Creates the parent directory if needed and opens `path` for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ApplicationError> {
        let path = path.into();
        let open_error = |source: io::Error| ApplicationError::EventLog { path: path.clone(), source };

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(open_error)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path).map_err(open_error)?;

        Ok(Self { path, file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &LogEntry) -> io::Result<()> {
        let mut line = serde_json::to_string(entry).map_err(io::Error::from)?;
        line.push('\n');

        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        file.write_all(line.as_bytes())?;
        file.flush()
    }
}

impl EventSink for JsonlEventSink {
    fn emit(&self, entry: LogEntry) {
        if let Err(error) = self.append(&entry) {
            warn!(
                event_name = "system.event_log.append_failed",
                path = %self.path.display(),
                event_type = %entry.event_type,
                error = %error,
                "could not append event log entry"
            );
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryEventSink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl InMemoryEventSink {
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn event_types(&self) -> Vec<String> {
        self.entries().into_iter().map(|entry| entry.event_type).collect()
    }

    pub fn clear(&self) {
        match self.entries.lock() {
            Ok(mut entries) => entries.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl EventSink for InMemoryEventSink {
    fn emit(&self, entry: LogEntry) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::{format_timestamp, EventSink, InMemoryEventSink, JsonlEventSink, LogEntry};

    #[test]
    fn timestamp_is_utc_iso_with_trailing_z() {
        let at = Utc.with_ymd_and_hms(2025, 9, 1, 8, 30, 5).single().expect("valid timestamp");
        assert_eq!(format_timestamp(at), "2025-09-01T08:30:05.000000Z");
    }

    #[test]
    fn jsonl_sink_creates_directory_and_appends_lines() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("logs").join("tool_logs.txt");

        let sink = JsonlEventSink::open(&path).expect("sink opens");
        sink.log_event("faq_answered", json!({ "faq": "how to contact support" }));
        sink.log_event("escalation_reason", json!({ "reason": "unknown_or_complex" }));

        let raw = fs::read_to_string(&path).expect("log file readable");
        let lines: Vec<Value> = raw
            .lines()
            .map(|line| serde_json::from_str(line).expect("each line is json"))
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event_type"], "faq_answered");
        assert_eq!(lines[1]["payload"]["reason"], "unknown_or_complex");
        let timestamp = lines[0]["timestamp"].as_str().unwrap_or_default();
        assert!(timestamp.ends_with('Z'));
    }

    #[test]
    fn jsonl_sink_keeps_existing_entries() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("events.jsonl");

        JsonlEventSink::open(&path).expect("first open").log_event("tool_invoked", json!({}));
        JsonlEventSink::open(&path).expect("second open").log_event("tool_success", json!({}));

        let raw = fs::read_to_string(&path).expect("log file readable");
        assert_eq!(raw.lines().count(), 2);
    }

    #[test]
    fn jsonl_sink_fails_when_parent_is_a_file() {
        let dir = TempDir::new().expect("tempdir");
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "not a directory").expect("write blocker");

        let result = JsonlEventSink::open(blocker.join("tool_logs.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn in_memory_sink_records_in_order() {
        let sink = InMemoryEventSink::default();
        sink.emit(LogEntry::new("tool_invoked", json!({ "order_id": "A100" })));
        sink.emit(LogEntry::new("tool_success", json!({ "order_id": "A100" })));

        assert_eq!(sink.event_types(), vec!["tool_invoked", "tool_success"]);
        sink.clear();
        assert!(sink.entries().is_empty());
    }
}
