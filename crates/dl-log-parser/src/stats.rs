//! Record counters for dashboard summaries.

use std::collections::HashMap;

use crate::types::{Period, RecordType};

/// A running total plus two independent partitions: by type and by period.
///
/// The aggregator never walks a record collection and never cross-checks
/// its partitions against the total; callers decide what to count.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    total: usize,
    by_type: HashMap<RecordType, usize>,
    by_period: HashMap<Period, usize>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_total_count(&mut self, total: usize) {
        self.total = total;
    }

    pub fn increment_total(&mut self) {
        self.total += 1;
    }

    pub fn total_count(&self) -> usize {
        self.total
    }

    /// Count one record of the type named by `key` (label or short key).
    /// Unknown keys are ignored.
    pub fn increment_by_type(&mut self, key: &str) {
        if let Some(record_type) = RecordType::from_key(key) {
            self.add_type(record_type);
        }
    }

    /// Count one record in the period named by `key`. Unknown keys are ignored.
    pub fn increment_by_period(&mut self, key: &str) {
        if let Some(period) = Period::from_key(key) {
            self.add_period(period);
        }
    }

    pub fn add_type(&mut self, record_type: RecordType) {
        *self.by_type.entry(record_type).or_default() += 1;
    }

    pub fn add_period(&mut self, period: Period) {
        *self.by_period.entry(period).or_default() += 1;
    }

    /// Count for a type; any unrecognized key (e.g. `"all"`) yields the total.
    pub fn get_count_by_type(&self, key: &str) -> usize {
        match RecordType::from_key(key) {
            Some(record_type) => self.by_type.get(&record_type).copied().unwrap_or(0),
            None => self.total,
        }
    }

    /// Count for a period; any unrecognized key (e.g. `"all"`) yields the total.
    pub fn get_count_by_period(&self, key: &str) -> usize {
        match Period::from_key(key) {
            Some(period) => self.by_period.get(&period).copied().unwrap_or(0),
            None => self.total,
        }
    }

    /// JSON summary keyed by type label and period name.
    pub fn to_json(&self) -> serde_json::Value {
        let by_type: serde_json::Map<String, serde_json::Value> = RecordType::ALL
            .iter()
            .map(|t| (t.label().to_string(), self.get_count_by_type(t.key()).into()))
            .collect();
        let by_period: serde_json::Map<String, serde_json::Value> = Period::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), self.get_count_by_period(p.as_str()).into()))
            .collect();
        serde_json::json!({
            "total": self.total,
            "by_type": by_type,
            "by_period": by_period,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_type() {
        let mut stats = Stats::new();
        for _ in 0..3 {
            stats.increment_total();
            stats.increment_by_type("PHP Warning");
        }
        stats.increment_total();
        stats.increment_by_type("PHP Notice");

        assert_eq!(stats.get_count_by_type("PHP Warning"), 3);
        assert_eq!(stats.get_count_by_type("warning"), 3);
        assert_eq!(stats.get_count_by_type("PHP Notice"), 1);
        assert_eq!(stats.get_count_by_type("PHP Parse error"), 0);
    }

    #[test]
    fn unrecognized_key_returns_total() {
        let mut stats = Stats::new();
        stats.set_total_count(4);
        stats.increment_by_type("PHP Warning");
        assert_eq!(stats.get_count_by_type("all"), 4);
        assert_eq!(stats.get_count_by_type("PHP Deprecated"), 4);
        assert_eq!(stats.get_count_by_period("all"), 4);
    }

    #[test]
    fn unknown_increments_are_ignored() {
        let mut stats = Stats::new();
        stats.increment_by_type("PHP Deprecated");
        stats.increment_by_period("last week");
        assert_eq!(stats.total_count(), 0);
        assert_eq!(stats.to_json()["by_type"]["Other"], 0);
        assert_eq!(stats.to_json()["by_period"]["earlier"], 0);
    }

    #[test]
    fn counts_by_period() {
        let mut stats = Stats::new();
        stats.increment_by_period("today");
        stats.increment_by_period("today");
        stats.increment_by_period("yesterday");
        assert_eq!(stats.get_count_by_period("today"), 2);
        assert_eq!(stats.get_count_by_period("yesterday"), 1);
        assert_eq!(stats.get_count_by_period("earlier"), 0);
    }

    #[test]
    fn json_summary_lists_every_bucket() {
        let mut stats = Stats::new();
        stats.set_total_count(1);
        stats.add_type(RecordType::FatalError);
        stats.add_period(Period::Earlier);
        let json = stats.to_json();
        assert_eq!(json["total"], 1);
        assert_eq!(json["by_type"]["PHP Fatal error"], 1);
        assert_eq!(json["by_type"].as_object().unwrap().len(), 6);
        assert_eq!(json["by_period"]["earlier"], 1);
    }
}
