//! Core debug log types and the LogTool trait.

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::config::ViewerConfig;
use crate::error::LogResult;

// ── Record Type ───────────────────────────────────────────────

/// Classification tag derived from a record's message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    FatalError,
    Notice,
    ParseError,
    Warning,
    ParserError,
    Other,
}

impl RecordType {
    /// Every type, in classification priority order (`Other` last).
    pub const ALL: [RecordType; 6] = [
        Self::FatalError,
        Self::Notice,
        Self::ParseError,
        Self::Warning,
        Self::ParserError,
        Self::Other,
    ];

    /// The literal message prefix as written to the log.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FatalError => "PHP Fatal error",
            Self::Notice => "PHP Notice",
            Self::ParseError => "PHP Parse error",
            Self::Warning => "PHP Warning",
            Self::ParserError => "Log Parser error",
            Self::Other => "Other",
        }
    }

    /// Short machine key, matching the serde representation.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FatalError => "fatal_error",
            Self::Notice => "notice",
            Self::ParseError => "parse_error",
            Self::Warning => "warning",
            Self::ParserError => "parser_error",
            Self::Other => "other",
        }
    }

    /// Resolve either a label (`"PHP Warning"`) or a key (`"warning"`).
    pub fn from_key(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.label() == s || t.key().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Period ────────────────────────────────────────────────────

/// Calendar bucket of a record relative to "now", on UTC dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Yesterday,
    Earlier,
}

impl Period {
    pub const ALL: [Period; 3] = [Self::Today, Self::Yesterday, Self::Earlier];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Earlier => "earlier",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
    }

    /// Bucket a timestamp. Timestamps after today also count as `Today`.
    pub fn of(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let day = timestamp.date_naive();
        if day >= today {
            Self::Today
        } else if today.checked_sub_days(Days::new(1)) == Some(day) {
            Self::Yesterday
        } else {
            Self::Earlier
        }
    }

    /// Time window `[since, until)` covered by this bucket.
    pub fn window(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let yesterday = midnight.checked_sub_days(Days::new(1));
        match self {
            Self::Today => (Some(midnight), None),
            Self::Yesterday => (yesterday, Some(midnight)),
            Self::Earlier => (None, yesterday),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Record ────────────────────────────────────────────────────

/// One reconstructed debug log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based, assigned in parse order.
    pub id: usize,
    /// Parsed entry header timestamp, normalized to UTC.
    pub timestamp: DateTime<Utc>,
    /// Message text with the type prefix stripped.
    pub message: String,
    /// Classification tag.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Verbatim `#n` continuation lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<String>,
    /// Soft-delete flag. Hidden records never enter the working set.
    pub display: bool,
    /// 1-based raw line on which the entry header appeared.
    pub line: usize,
    /// Raw lines spanned by this record, header included.
    pub line_count: usize,
}

impl Record {
    /// Format the timestamp with a strftime pattern.
    ///
    /// Falls back to RFC 3339 if the pattern cannot be rendered.
    pub fn formatted_time(&self, format: &str) -> String {
        let mut out = String::new();
        if write!(out, "{}", self.timestamp.format(format)).is_err() {
            return self.timestamp.to_rfc3339();
        }
        out
    }

    /// Raw line range `[start, end)` of this record, 1-based.
    pub fn line_range(&self) -> std::ops::Range<usize> {
        self.line..self.line + self.line_count
    }
}

/// Presentation form of a record: formatted time, label for type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    pub id: usize,
    pub time: String,
    pub message: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub trace: Vec<String>,
}

impl RecordView {
    pub fn new(record: &Record, date_format: &str) -> Self {
        Self {
            id: record.id,
            time: record.formatted_time(date_format),
            message: record.message.clone(),
            record_type: record.record_type.label().to_string(),
            trace: record.trace.clone(),
        }
    }
}

// ── Tool Result ───────────────────────────────────────────────

/// Result of executing a debug log tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool name that produced this result.
    pub tool_name: String,
    /// Whether the tool execution succeeded.
    pub success: bool,
    /// Structured result data (JSON).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Human-readable summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Error message if success is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(
        tool_name: impl Into<String>,
        data: serde_json::Value,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            data: Some(data),
            summary: Some(summary.into()),
            error: None,
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            data: None,
            summary: None,
            error: Some(error.into()),
        }
    }
}

// ── LogTool Trait ─────────────────────────────────────────────

/// Trait for debug log tools.
///
/// Each tool reads (and, for the delete tools, rewrites) the log named by
/// `config.log_path` through the given source.
#[async_trait]
pub trait LogTool: Send + Sync {
    /// Tool name (e.g., "view_log").
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema describing accepted arguments.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with JSON arguments against a log source.
    async fn execute(
        &self,
        args: serde_json::Value,
        source: &dyn crate::source::LogSource,
        config: &ViewerConfig,
    ) -> LogResult<ToolResult>;
}
