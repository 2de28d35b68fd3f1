//! Debug log parser: loads raw lines, reconstructs records and serves the
//! working set.
//!
//! Every accessor cascades: `parse` prepares on demand, and `filter`,
//! `sort`, `get_data`, `page` and `stats` parse on demand, so any of them
//! may be called first.
//!
//! The parsed collection is an `Arc` snapshot. Re-reading the source builds
//! a new snapshot, and soft-deletes go through copy-on-write, so a snapshot
//! handed out earlier never changes underneath its holder.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::config::ViewerConfig;
use crate::error::{LogError, LogResult};
use crate::links::LinkRewriter;
use crate::query::{self, FilterCriteria, ResolvedQuery, SortColumn, SortDirection};
use crate::reconstructor::Reconstructor;
use crate::source::LogSource;
use crate::stats::Stats;
use crate::types::{Period, Record, RecordView};

/// Where raw lines come from.
enum Input<'a> {
    Source {
        source: &'a dyn LogSource,
        path: String,
    },
    Lines(Vec<String>),
}

/// One page of formatted records plus paging metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub orderby: SortColumn,
    pub order: SortDirection,
    pub records: Vec<RecordView>,
}

pub struct Parser<'a> {
    input: Input<'a>,
    config: ViewerConfig,
    links: LinkRewriter,
    raw: Vec<String>,
    /// 1-based file line of `raw[0]` (greater than 1 after truncation).
    first_line: usize,
    prepared: bool,
    parsed: bool,
    records: Arc<Vec<Record>>,
    /// Indices into `records`, filtered and sorted.
    working: Vec<usize>,
    criteria: FilterCriteria,
    ordering: Option<(SortColumn, SortDirection)>,
    anomalies: Vec<LogError>,
    source_error: Option<LogError>,
}

impl<'a> Parser<'a> {
    /// Parser over a log read from `source` at `path`.
    pub fn from_source(
        source: &'a dyn LogSource,
        path: impl Into<String>,
        config: ViewerConfig,
    ) -> Self {
        Self::with_input(
            Input::Source {
                source,
                path: path.into(),
            },
            config,
        )
    }

    /// Parser over an already-split sequence of raw lines.
    pub fn from_lines(lines: Vec<String>, config: ViewerConfig) -> Self {
        Self::with_input(Input::Lines(lines), config)
    }

    fn with_input(input: Input<'a>, config: ViewerConfig) -> Self {
        let links = LinkRewriter::from_config(&config);
        Self {
            input,
            config,
            links,
            raw: Vec::new(),
            first_line: 1,
            prepared: false,
            parsed: false,
            records: Arc::new(Vec::new()),
            working: Vec::new(),
            criteria: FilterCriteria::all(),
            ordering: None,
            anomalies: Vec::new(),
            source_error: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Load raw lines. A second call is a no-op.
    ///
    /// An unreadable source is reported once; the parser is then prepared
    /// with no lines, so later calls see an empty log.
    pub async fn prepare(&mut self) -> LogResult<()> {
        if self.prepared {
            return Ok(());
        }
        self.prepared = true;

        let lines = match &mut self.input {
            Input::Lines(lines) => std::mem::take(lines),
            Input::Source { source, path } => match source.read_lines(path).await {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "debug log unavailable");
                    self.source_error = Some(e.clone());
                    return Err(e);
                }
            },
        };
        self.load(lines);
        Ok(())
    }

    fn load(&mut self, mut lines: Vec<String>) {
        self.first_line = 1;
        let limit = self.config.max_lines;
        if limit > 0 && lines.len() > limit {
            let dropped = lines.len() - limit;
            lines.drain(..dropped);
            self.first_line = dropped + 1;
            tracing::debug!(dropped, limit, "keeping only the newest raw lines");
        }
        self.raw = lines;
    }

    /// Reconstruct records from the raw lines. A second call is a no-op.
    pub async fn parse(&mut self) -> LogResult<()> {
        self.prepare().await?;
        if self.parsed {
            return Ok(());
        }

        let mut reconstructor = Reconstructor::starting_at(self.first_line);
        let mut records = Vec::new();
        let mut anomalies = Vec::new();
        for line in &self.raw {
            match reconstructor.feed(line) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed line");
                    anomalies.push(e);
                }
            }
        }
        records.extend(reconstructor.finish());

        tracing::info!(
            lines = self.raw.len(),
            records = records.len(),
            anomalies = anomalies.len(),
            orphans = reconstructor.orphans(),
            "debug log parsed"
        );

        self.records = Arc::new(records);
        self.anomalies = anomalies;
        self.parsed = true;
        self.rebuild_working_set();
        Ok(())
    }

    /// Drop all loaded state and read the source again into a new snapshot.
    ///
    /// Filter and sort settings are kept. In-memory inputs cannot be
    /// re-read, so for them this re-parses the lines already loaded.
    pub async fn reload(&mut self) -> LogResult<()> {
        if matches!(self.input, Input::Source { .. }) {
            self.prepared = false;
            self.raw.clear();
            self.source_error = None;
        }
        self.parsed = false;
        self.records = Arc::new(Vec::new());
        self.working.clear();
        self.anomalies.clear();
        self.parse().await
    }

    /// 0 before `prepare`, the raw line count before `parse`, and the record
    /// count after it.
    pub fn total_count(&self) -> usize {
        if self.parsed {
            self.records.len()
        } else if self.prepared {
            self.raw.len()
        } else {
            0
        }
    }

    /// Size of the current working set.
    pub fn working_count(&self) -> usize {
        self.working.len()
    }

    /// Lines skipped as malformed during the last parse.
    pub fn anomalies(&self) -> &[LogError] {
        &self.anomalies
    }

    /// The error that made the source unavailable, if any.
    pub fn source_error(&self) -> Option<&LogError> {
        self.source_error.as_ref()
    }

    /// Raw lines as loaded (after any `max_lines` truncation).
    pub fn raw_lines(&self) -> &[String] {
        &self.raw
    }

    /// 1-based file line of the first loaded raw line.
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    /// Shared handle on the full parsed collection.
    pub fn snapshot(&self) -> Arc<Vec<Record>> {
        Arc::clone(&self.records)
    }

    /// Look up a parsed record by id.
    pub fn record(&self, id: usize) -> Option<&Record> {
        // ids are assigned 1..N in collection order
        self.records.get(id.checked_sub(1)?).filter(|r| r.id == id)
    }

    /// Narrow the working set. The parsed collection is untouched, so a later
    /// call with different criteria starts from every record again.
    pub async fn filter(&mut self, criteria: FilterCriteria) -> LogResult<()> {
        self.parse().await?;
        self.criteria = criteria;
        self.rebuild_working_set();
        Ok(())
    }

    /// Order the working set. Equal keys keep `id` order.
    pub async fn sort(&mut self, column: SortColumn, direction: SortDirection) -> LogResult<()> {
        self.parse().await?;
        self.ordering = Some((column, direction));
        self.apply_ordering();
        Ok(())
    }

    /// Soft-delete a record: it stays in the collection with `display` off
    /// and leaves the working set. Returns false for an unknown id.
    pub async fn hide(&mut self, id: usize) -> LogResult<bool> {
        self.parse().await?;
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        Arc::make_mut(&mut self.records)[index].display = false;
        self.rebuild_working_set();
        Ok(true)
    }

    /// Records on 1-based `page` of the working set.
    ///
    /// Returned records are copies; when links are enabled their messages
    /// are rendered as escaped HTML with source links, the stored messages
    /// are not.
    pub async fn get_data(&mut self, page: usize, per_page: usize) -> LogResult<Vec<Record>> {
        self.parse().await?;
        let range = query::page_range(self.working.len(), page, per_page);
        let rewrite = self.config.links_enabled();
        Ok(self.working[range]
            .iter()
            .map(|&i| {
                let mut record = self.records[i].clone();
                if rewrite {
                    record.message = self.links.rewrite(&record.message);
                }
                record
            })
            .collect())
    }

    /// Sort per `query` and return its page, formatted for display.
    pub async fn page(&mut self, query: ResolvedQuery) -> LogResult<Page> {
        self.sort(query.column, query.direction).await?;
        let per_page = self.config.per_page;
        let records = self.get_data(query.page, per_page).await?;
        let date_format = &self.config.date_format;
        Ok(Page {
            page: query.page,
            per_page,
            total_items: self.working.len(),
            total_pages: query::page_count(self.working.len(), per_page),
            orderby: query.column,
            order: query.direction,
            records: records
                .iter()
                .map(|r| RecordView::new(r, date_format))
                .collect(),
        })
    }

    /// Tally visible records by type and by period relative to `now`.
    pub async fn stats(&mut self, now: DateTime<Utc>) -> LogResult<Stats> {
        self.parse().await?;
        let mut stats = Stats::new();
        for record in self.records.iter().filter(|r| r.display) {
            stats.increment_total();
            stats.add_type(record.record_type);
            stats.add_period(Period::of(record.timestamp, now));
        }
        Ok(stats)
    }

    fn rebuild_working_set(&mut self) {
        self.working = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.criteria.matches(r))
            .map(|(i, _)| i)
            .collect();
        self.apply_ordering();
    }

    fn apply_ordering(&mut self) {
        let Some((column, direction)) = self.ordering else {
            return;
        };
        let records = &self.records;
        self.working
            .sort_by(|&a, &b| direction.apply(query::compare(&records[a], &records[b], column)));
    }
}
