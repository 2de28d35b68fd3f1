//! Query engine: filter criteria, sort keys and page arithmetic.
//!
//! Keys arriving from a request (`order`, `orderby`, `page`, filter pairs)
//! are resolved against the closed enumerations here. Unknown keys never
//! fail a request; they fall back to the configured default with a warning.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Range;

use crate::config::ViewerConfig;
use crate::types::{Period, Record, RecordType};

// ── Sorting ───────────────────────────────────────────────────

/// Record field to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Id,
    Time,
    Text,
    Type,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Time => "time",
            Self::Text => "text",
            Self::Type => "type",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "time" => Some(Self::Time),
            "text" => Some(Self::Text),
            "type" => Some(Self::Type),
            _ => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Apply the direction to an ascending comparison.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Ascending comparison of two records on `column`.
///
/// Equal keys are ordered by `id`, so results are deterministic; for `id`
/// itself the tie-break never fires.
pub fn compare(a: &Record, b: &Record, column: SortColumn) -> Ordering {
    let by_key = match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::Time => a.timestamp.cmp(&b.timestamp),
        SortColumn::Text => a.message.cmp(&b.message),
        SortColumn::Type => a.record_type.label().cmp(b.record_type.label()),
    };
    by_key.then_with(|| a.id.cmp(&b.id))
}

// ── Filtering ─────────────────────────────────────────────────

/// Narrowing criteria for the working set. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<RecordType>,
    /// Inclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

impl FilterCriteria {
    /// Criteria matching every visible record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, record_type: RecordType) -> Self {
        self.record_type = Some(record_type);
        self
    }

    pub fn with_window(mut self, since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self.until = until;
        self
    }

    /// Restrict to one calendar bucket relative to `now`.
    pub fn with_period(self, period: Period, now: DateTime<Utc>) -> Self {
        let (since, until) = period.window(now);
        self.with_window(since, until)
    }

    /// Build criteria from request key/value pairs.
    ///
    /// Recognized keys: `type`, `since`, `until`, `period`. Unknown keys and
    /// unparseable values are ignored with a warning.
    pub fn from_pairs<'a, I>(pairs: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut criteria = Self::all();
        for (key, value) in pairs {
            match key {
                "type" => match RecordType::from_key(value) {
                    Some(t) => criteria.record_type = Some(t),
                    None => tracing::warn!(key, value, "unknown record type, not filtering by type"),
                },
                "since" | "until" => match parse_bound(value) {
                    Some(bound) if key == "since" => criteria.since = Some(bound),
                    Some(bound) => criteria.until = Some(bound),
                    None => tracing::warn!(key, value, "unparseable time bound ignored"),
                },
                "period" => {
                    if value.eq_ignore_ascii_case("all") {
                        criteria.since = None;
                        criteria.until = None;
                    } else if let Some(period) = Period::from_key(value) {
                        criteria = criteria.with_period(period, now);
                    } else {
                        tracing::warn!(key, value, "unknown period ignored");
                    }
                }
                _ => tracing::warn!(key, "unknown filter key ignored"),
            }
        }
        criteria
    }

    /// Whether a record belongs to the working set under these criteria.
    pub fn matches(&self, record: &Record) -> bool {
        if !record.display {
            return false;
        }
        if let Some(t) = self.record_type
            && record.record_type != t
        {
            return false;
        }
        if let Some(since) = self.since
            && record.timestamp < since
        {
            return false;
        }
        if let Some(until) = self.until
            && record.timestamp >= until
        {
            return false;
        }
        true
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_bound(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

// ── Paging ────────────────────────────────────────────────────

/// Index range of a 1-based page over `len` items, clamped to bounds.
///
/// Page 0 is read as page 1. A page past the end yields an empty range.
pub fn page_range(len: usize, page: usize, per_page: usize) -> Range<usize> {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page).min(len);
    let end = start.saturating_add(per_page).min(len);
    start..end
}

/// Number of pages needed for `len` items.
pub fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}

// ── Request parameters ────────────────────────────────────────

/// Raw interactive query parameters, as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

/// Query parameters resolved against the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub column: SortColumn,
    pub direction: SortDirection,
    pub page: usize,
}

impl QueryParams {
    /// Resolve to concrete values, falling back to config defaults for
    /// absent or unrecognized keys.
    pub fn resolve(&self, config: &ViewerConfig) -> ResolvedQuery {
        let column = match self.orderby.as_deref() {
            None => config.sort_col,
            Some(key) => SortColumn::from_key(key).unwrap_or_else(|| {
                tracing::warn!(orderby = key, fallback = config.sort_col.as_str(), "unknown sort column");
                config.sort_col
            }),
        };
        let direction = match self.order.as_deref() {
            None => config.sort_dir,
            Some(key) => SortDirection::from_key(key).unwrap_or_else(|| {
                tracing::warn!(order = key, fallback = config.sort_dir.as_str(), "unknown sort direction");
                config.sort_dir
            }),
        };
        let page = match self.page.as_deref() {
            None => 1,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    tracing::warn!(page = raw, "invalid page number, using 1");
                    1
                }
            },
        };
        ResolvedQuery {
            column,
            direction,
            page,
        }
    }
}
