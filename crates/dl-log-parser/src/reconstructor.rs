//! Line-by-line record reconstruction.
//!
//! A debug log interleaves single-line entries with multi-line fatal errors
//! whose stack frames (`#0 ...`, `#1 {main}`) carry no boundary of their
//! own. Only the next `[DD-Mon-YYYY HH:MM:SS TZ]` header ends an entry, so
//! the reconstructor keeps at most one open record and seals it when the
//! next header arrives or when the input ends.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::classifier;
use crate::error::{LogError, LogResult};
use crate::types::{Record, RecordType};

static RE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{2}-[A-Za-z]{3}-\d{4} \d{2}:\d{2}:\d{2})(?: ([^\]\s]+))?\] ?(.*)$")
        .unwrap()
});

static RE_HEADER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\d{2}-[A-Za-z]{3}-\d{4} \d{2}:\d{2}:\d{2}(?: [^\]\s]+)?\]").unwrap()
});

static RE_NUMERIC_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").unwrap());

const HEADER_DATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Shape of a single raw line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    /// Entry header: timestamp plus the message remainder.
    Header {
        timestamp: DateTime<Utc>,
        message: &'a str,
    },
    /// Stack frame belonging to the open record.
    Continuation(&'a str),
    /// Anything else; dropped by the reconstructor.
    Anomaly,
}

/// Determine the shape of one raw line.
///
/// Fails with `MalformedLine` when the line opens with a header token that
/// cannot be resolved to exactly one entry: a date that does not exist on
/// the calendar, or a second header glued onto the same line.
pub fn line_kind(line: &str, line_number: usize) -> LogResult<LineKind<'_>> {
    if let Some(caps) = RE_HEADER.captures(line) {
        if RE_HEADER_TOKEN.find_iter(line).count() > 1 {
            return Err(LogError::MalformedLine {
                line: line_number,
                reason: "more than one entry header on a single line".into(),
            });
        }
        let naive = NaiveDateTime::parse_from_str(&caps[1], HEADER_DATE_FORMAT).map_err(|e| {
            LogError::MalformedLine {
                line: line_number,
                reason: format!("invalid header timestamp '{}': {e}", &caps[1]),
            }
        })?;
        let offset = resolve_offset(caps.get(2).map(|m| m.as_str()));
        let timestamp = offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| LogError::MalformedLine {
                line: line_number,
                reason: format!("ambiguous header timestamp '{}'", &caps[1]),
            })?;
        let message = caps.get(3).map_or("", |m| m.as_str());
        return Ok(LineKind::Header { timestamp, message });
    }

    if line.trim_start().starts_with('#') {
        return Ok(LineKind::Continuation(line));
    }

    Ok(LineKind::Anomaly)
}

/// Map the optional timezone token to a fixed offset.
///
/// Numeric offsets and `UTC`/`GMT`/`Z` are honoured; named zones cannot be
/// resolved without a zone database and are read as UTC.
fn resolve_offset(tz: Option<&str>) -> FixedOffset {
    let utc = Utc.fix();
    let Some(tz) = tz else {
        return utc;
    };
    if matches!(tz, "UTC" | "GMT" | "Z") {
        return utc;
    }
    if let Some(caps) = RE_NUMERIC_OFFSET.captures(tz) {
        let hours: i32 = caps[2].parse().unwrap_or(0);
        let minutes: i32 = caps[3].parse().unwrap_or(0);
        let secs = hours * 3600 + minutes * 60;
        let secs = if &caps[1] == "-" { -secs } else { secs };
        if let Some(offset) = FixedOffset::east_opt(secs) {
            return offset;
        }
    }
    tracing::debug!(timezone = tz, "unrecognized timezone token, reading as UTC");
    utc
}

// ── State machine ─────────────────────────────────────────────

/// A record under construction.
#[derive(Debug)]
struct OpenRecord {
    timestamp: DateTime<Utc>,
    record_type: RecordType,
    message: String,
    trace: Vec<String>,
    line: usize,
    line_count: usize,
    /// Set once a malformed header follows; later lines until the next
    /// header belong to that broken entry, not to this record.
    span_closed: bool,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Open(OpenRecord),
}

/// Consumes raw lines one at a time and emits sealed records.
#[derive(Debug)]
pub struct Reconstructor {
    state: State,
    next_id: usize,
    line_number: usize,
    orphans: usize,
}

impl Reconstructor {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start numbering raw lines at `first_line` (1-based).
    pub fn starting_at(first_line: usize) -> Self {
        Self {
            state: State::Idle,
            next_id: 1,
            line_number: first_line.max(1) - 1,
            orphans: 0,
        }
    }

    /// Whether a record is currently open.
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Lines dropped because no record was open to receive them.
    pub fn orphans(&self) -> usize {
        self.orphans
    }

    /// Feed the next raw line.
    ///
    /// Returns the previously open record when `line` starts a new entry.
    /// A `MalformedLine` error ends the open record's span without sealing
    /// it; the caller should report the error and keep feeding.
    pub fn feed(&mut self, line: &str) -> LogResult<Option<Record>> {
        self.line_number += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);

        let kind = match line_kind(line, self.line_number) {
            Ok(kind) => kind,
            Err(e) => {
                match &mut self.state {
                    State::Open(open) => open.span_closed = true,
                    State::Idle => self.orphan(),
                }
                return Err(e);
            }
        };

        match kind {
            LineKind::Header { timestamp, message } => {
                let (record_type, message) = classifier::split_label(message);
                let opened = OpenRecord {
                    timestamp,
                    record_type,
                    message: message.to_string(),
                    trace: Vec::new(),
                    line: self.line_number,
                    line_count: 1,
                    span_closed: false,
                };
                let previous = std::mem::replace(&mut self.state, State::Open(opened));
                Ok(self.seal(previous))
            }
            LineKind::Continuation(frame) => {
                match &mut self.state {
                    State::Open(open) if !open.span_closed => {
                        open.trace.push(frame.to_string());
                        open.line_count += 1;
                    }
                    _ => self.orphan(),
                }
                Ok(None)
            }
            LineKind::Anomaly => {
                self.absorb();
                Ok(None)
            }
        }
    }

    /// Seal the trailing open record at end of input.
    pub fn finish(&mut self) -> Option<Record> {
        let last = std::mem::take(&mut self.state);
        self.seal(last)
    }

    /// Count a non-record line toward the open record's span, or drop it.
    fn absorb(&mut self) {
        match &mut self.state {
            State::Open(open) if !open.span_closed => open.line_count += 1,
            _ => self.orphan(),
        }
    }

    fn orphan(&mut self) {
        self.orphans += 1;
        tracing::debug!(line = self.line_number, "dropping line outside any record");
    }

    fn seal(&mut self, state: State) -> Option<Record> {
        let State::Open(open) = state else {
            return None;
        };
        let id = self.next_id;
        self.next_id += 1;
        Some(Record {
            id,
            timestamp: open.timestamp,
            message: open.message,
            record_type: open.record_type,
            trace: open.trace,
            display: true,
            line: open.line,
            line_count: open.line_count,
        })
    }
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new()
    }
}
