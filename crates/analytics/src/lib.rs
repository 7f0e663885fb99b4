//! Append-only JSONL event log — the analytics source of truth for
//! user actions (selections, quotes, reservations).
//!
//! Every record is one line; append is the only mutation this module
//! ever performs. Payloads pass through `serde_json::to_value`, which
//! makes them JSON-safe by construction: non-finite floats become
//! `null`, chrono values become ISO-8601 strings, and typed
//! collections become arrays of field maps.

use chrono::Utc;
use mediaplan_core::types::Event;
use mediaplan_core::{PlanError, PlanResult};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Writes events to a newline-delimited JSON file.
pub struct EventLogger {
    path: PathBuf,
}

impl EventLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event. Unlike catalog parsing, a failure here is a
    /// hard error: losing analytics silently is worse than failing
    /// loudly.
    pub fn log(&self, event_kind: &str, payload: &impl Serialize) -> PlanResult<Event> {
        let payload = serde_json::to_value(payload)?;
        let event = Event {
            event_id: Uuid::new_v4(),
            ts: Utc::now(),
            event_kind: event_kind.to_string(),
            payload,
        };
        let line = serde_json::to_string(&event)?;

        self.append_line(&line)
            .map_err(|e| PlanError::EventLog(format!("cannot append to {}: {e}", self.path.display())))?;

        debug!(event_kind, event_id = %event.event_id, "event logged");
        Ok(event)
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}
