//! Group validation failures by classified pattern.
//!
//! Buckets keep the order in which each pattern was first seen so reports
//! are reproducible; `counts_by_frequency` gives the human-oriented view.

use crate::classify::{classify, ErrorPattern};
use crate::models::{ErrorRecord, PatternExample};
use serde_json::{json, Map, Value as Json};

/// All failures sharing one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternBucket {
    pub pattern: ErrorPattern,
    pub count: usize,
    pub examples: Vec<PatternExample>,
}

/// Buckets in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub buckets: Vec<PatternBucket>,
}

impl Aggregation {
    pub fn get(&self, pattern: &ErrorPattern) -> Option<&PatternBucket> {
        self.buckets.iter().find(|b| &b.pattern == pattern)
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// `(pattern, count)` sorted by descending count; ties keep first-seen order.
    pub fn counts_by_frequency(&self) -> Vec<(&ErrorPattern, usize)> {
        let mut out: Vec<(&ErrorPattern, usize)> =
            self.buckets.iter().map(|b| (&b.pattern, b.count)).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1));
        out
    }

    /// Pattern artifact: counts summary plus every example per pattern.
    pub fn to_report_json(&self) -> Json {
        let mut counts = Map::new();
        for (pattern, count) in self.counts_by_frequency() {
            counts.insert(pattern.to_string(), json!(count));
        }
        let mut detailed = Map::new();
        for b in &self.buckets {
            detailed.insert(
                b.pattern.to_string(),
                serde_json::to_value(&b.examples).unwrap_or(Json::Null),
            );
        }
        json!({
            "error_pattern_counts": counts,
            "detailed_errors_by_pattern": detailed,
        })
    }
}

/// Classify and bucket every failure.
pub fn aggregate(failures: &[ErrorRecord]) -> Aggregation {
    let mut agg = Aggregation::default();
    for f in failures {
        let pattern = classify(&f.error);
        let example = PatternExample {
            filename: f.filename.clone(),
            full_error: f.error.clone(),
        };
        match agg.buckets.iter_mut().find(|b| b.pattern == pattern) {
            Some(bucket) => {
                bucket.count += 1;
                bucket.examples.push(example);
            }
            None => agg.buckets.push(PatternBucket {
                pattern,
                count: 1,
                examples: vec![example],
            }),
        }
    }
    agg
}
