//! Structured JSONL diagnostics.
//!
//! Provides:
//! - [`LogEntry`]: one JSONL record with required + optional fields.
//! - [`LogEmitter`]: writes entries to standard error, or nowhere.
//!
//! The stream is only enabled at verbosity 2 and above, so the plain
//! report on standard output never changes shape.

use serde::{Deserialize, Serialize};
use std::io::Write;

use rlimit_core::LimitPair;

use crate::error::RlimitError;
use crate::resources::ResourceKind;

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    /// Long option name of the resource involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errno: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    /// Create a new log entry with required fields only.
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            resource: None,
            soft: None,
            hard: None,
            errno: None,
            details: None,
        }
    }

    /// Set the resource.
    #[must_use]
    pub fn with_resource(mut self, resource: &ResourceKind) -> Self {
        self.resource = Some(resource.long.to_string());
        self
    }

    /// Set the soft/hard values.
    #[must_use]
    pub fn with_pair(mut self, pair: LimitPair) -> Self {
        self.soft = Some(pair.soft);
        self.hard = Some(pair.hard);
        self
    }

    /// Set errno.
    #[must_use]
    pub fn with_errno(mut self, errno: i32) -> Self {
        self.errno = Some(errno);
        self
    }

    /// Set free-form details.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Serialize to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Writes structured JSONL log entries, or discards them when disabled.
pub struct LogEmitter {
    writer: Option<Box<dyn Write>>,
    seq: u64,
    run_id: String,
}

impl LogEmitter {
    /// An emitter that writes to standard error.
    #[must_use]
    pub fn to_stderr() -> Self {
        Self::to_writer(Box::new(std::io::stderr()))
    }

    /// An emitter that writes to an arbitrary sink.
    #[must_use]
    pub fn to_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer: Some(writer),
            seq: 0,
            run_id: format!("rlimit-{}", std::process::id()),
        }
    }

    /// An emitter that drops everything.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            writer: None,
            seq: 0,
            run_id: String::new(),
        }
    }

    /// Pick the emitter for a verbosity level.
    #[must_use]
    pub fn for_verbosity(verbosity: u8) -> Self {
        if verbosity >= 2 {
            Self::to_stderr()
        } else {
            Self::disabled()
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    fn next_trace_id(&mut self) -> String {
        self.seq += 1;
        format!("{}::{:03}", self.run_id, self.seq)
    }

    /// Start an entry with an auto-generated trace id.
    pub fn entry(&mut self, level: LogLevel, event: &str) -> LogEntry {
        let trace_id = self.next_trace_id();
        LogEntry::new(trace_id, level, event)
    }

    /// Write a fully-populated entry. Diagnostics are best-effort: a failed
    /// write disables the emitter instead of failing the run.
    pub fn emit(&mut self, entry: &LogEntry) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        let written = entry
            .to_jsonl()
            .map_err(std::io::Error::other)
            .and_then(|line| writeln!(writer, "{line}"));
        if written.is_err() {
            self.writer = None;
        }
    }

    /// Record a terminal error.
    pub fn emit_error(&mut self, err: &RlimitError) {
        if !self.is_enabled() {
            return;
        }
        let mut entry = self
            .entry(LogLevel::Error, "run.error")
            .with_details(serde_json::json!({ "message": err.to_string() }));
        if let Some(code) = err.errno() {
            entry = entry.with_errno(code);
        }
        self.emit(&entry);
    }
}

/// Current time as an RFC 3339 UTC timestamp with millisecond precision.
fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format_utc(duration.as_secs(), duration.subsec_millis())
}

fn format_utc(secs: u64, millis: u32) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;

    // Civil date from days since 1970-01-01 (proleptic Gregorian).
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);

    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{millis:03}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60,
    )
}
