//! Accuracy Aggregation
//!
//! Rolls per-item records into per-group accuracy summaries.
//!
//! - [`category_accuracy`] - every attempted category, weakest first
//! - [`dimension_accuracy`] - pattern / origin / theme groups with a usable sample
//! - [`error_patterns`] - categories with a high error rate over a meaningful sample
//! - [`hardest_items`] - items below the low-accuracy floor, for drills
//!
//! All functions are pure and read records through
//! [`SanitizedCounts`](crate::sanitize::SanitizedCounts).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::sanitize::{safe_ratio, SanitizedCounts};
use crate::types::{
    AccuracyBar, AttemptOutcome, Dimension, ErrorPattern, Snapshot, ERROR_PATTERN_RATE,
    MIN_DIMENSION_ATTEMPTS, MIN_ERROR_PATTERN_ATTEMPTS,
};

/// Summed counters of a group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub attempts: i64,
    pub correct: i64,
}

impl Totals {
    pub fn add(&mut self, counts: &SanitizedCounts) {
        self.attempts = self.attempts.saturating_add(counts.attempts);
        self.correct = self.correct.saturating_add(counts.correct);
    }

    pub fn accuracy(&self) -> f64 {
        safe_ratio(self.correct, self.attempts)
    }

    pub fn error_rate(&self) -> f64 {
        safe_ratio(self.attempts - self.correct, self.attempts)
    }
}

// ==================== Grouping ====================

/// Totals per key along `dimension`; untagged records are skipped
pub fn dimension_totals(records: &Snapshot, dimension: Dimension) -> BTreeMap<String, Totals> {
    let mut groups: BTreeMap<String, Totals> = BTreeMap::new();
    for record in records.values() {
        let Some(key) = dimension.key_of(record) else { continue };
        let counts = SanitizedCounts::of(record);
        groups.entry(key.to_string()).or_default().add(&counts);
    }
    groups
}

pub fn category_totals(records: &Snapshot) -> BTreeMap<String, Totals> {
    dimension_totals(records, Dimension::Category)
}

pub fn overall_totals(records: &Snapshot) -> Totals {
    let mut totals = Totals::default();
    for record in records.values() {
        totals.add(&SanitizedCounts::of(record));
    }
    totals
}

/// Number of records at or above the mastery box
pub fn mastered_count(records: &Snapshot) -> i64 {
    records
        .values()
        .filter(|record| SanitizedCounts::of(record).is_mastered())
        .count() as i64
}

// ==================== Accuracy Bars ====================

fn bars_from(groups: BTreeMap<String, Totals>, min_attempts: i64) -> Vec<AccuracyBar> {
    let mut bars: Vec<AccuracyBar> = groups
        .into_iter()
        .filter(|(_, totals)| totals.attempts >= min_attempts)
        .map(|(key, totals)| AccuracyBar {
            label: humanize_key(&key),
            key,
            accuracy: totals.accuracy(),
            attempts: totals.attempts,
            correct: totals.correct,
        })
        .collect();
    bars.sort_by(weakest_first);
    bars
}

fn weakest_first(a: &AccuracyBar, b: &AccuracyBar) -> Ordering {
    a.accuracy
        .total_cmp(&b.accuracy)
        .then_with(|| a.key.cmp(&b.key))
}

/// Every category with at least one attempt, weakest first
pub fn category_accuracy(records: &Snapshot) -> Vec<AccuracyBar> {
    bars_from(category_totals(records), 1)
}

/// Accuracy along `dimension`.
///
/// Secondary dimensions only report groups with at least
/// [`MIN_DIMENSION_ATTEMPTS`] attempts; the category dimension reports every
/// attempted category.
pub fn dimension_accuracy(records: &Snapshot, dimension: Dimension) -> Vec<AccuracyBar> {
    match dimension {
        Dimension::Category => category_accuracy(records),
        _ => bars_from(dimension_totals(records, dimension), MIN_DIMENSION_ATTEMPTS),
    }
}

/// Categories whose error rate exceeds [`ERROR_PATTERN_RATE`] over at least
/// [`MIN_ERROR_PATTERN_ATTEMPTS`] attempts, highest error rate first
pub fn error_patterns(records: &Snapshot) -> Vec<ErrorPattern> {
    let mut patterns: Vec<ErrorPattern> = category_totals(records)
        .into_iter()
        .filter(|(_, totals)| {
            totals.attempts >= MIN_ERROR_PATTERN_ATTEMPTS && totals.error_rate() > ERROR_PATTERN_RATE
        })
        .map(|(category, totals)| ErrorPattern {
            label: humanize_key(&category),
            category,
            error_rate: totals.error_rate(),
            attempts: totals.attempts,
            errors: totals.attempts - totals.correct,
        })
        .collect();
    patterns.sort_by(|a, b| {
        b.error_rate
            .total_cmp(&a.error_rate)
            .then_with(|| a.category.cmp(&b.category))
    });
    patterns
}

// ==================== Items ====================

fn is_hard(counts: &SanitizedCounts, floor: f64, min_attempts: i64) -> bool {
    counts.attempts >= min_attempts.max(1) && counts.accuracy() < floor
}

/// Item ids below the accuracy floor, weakest first, at most `limit`
pub fn hardest_items(records: &Snapshot, floor: f64, min_attempts: i64, limit: usize) -> Vec<String> {
    let mut items: Vec<(&String, f64)> = records
        .iter()
        .filter_map(|(id, record)| {
            let counts = SanitizedCounts::of(record);
            is_hard(&counts, floor, min_attempts).then(|| (id, counts.accuracy()))
        })
        .collect();
    // stable: equal accuracy keeps id order
    items.sort_by(|a, b| a.1.total_cmp(&b.1));
    items.into_iter().take(limit).map(|(id, _)| id.clone()).collect()
}

pub fn hardest_item_count(records: &Snapshot, floor: f64, min_attempts: i64) -> usize {
    records
        .values()
        .filter(|record| is_hard(&SanitizedCounts::of(record), floor, min_attempts))
        .count()
}

/// Per-category attempt outcomes merged across items, oldest first.
///
/// Outcomes with the same timestamp keep item-id order, so the merge is
/// deterministic for a given snapshot.
pub fn category_history(records: &Snapshot) -> BTreeMap<String, Vec<AttemptOutcome>> {
    let mut merged: BTreeMap<String, Vec<AttemptOutcome>> = BTreeMap::new();
    for record in records.values() {
        if record.history.is_empty() {
            continue;
        }
        merged
            .entry(record.category.clone())
            .or_default()
            .extend(record.history.iter().cloned());
    }
    for outcomes in merged.values_mut() {
        outcomes.sort_by_key(|outcome| outcome.at);
    }
    merged
}

/// Display label for a grouping key: `"silent-e"` -> `"Silent E"`
pub fn humanize_key(key: &str) -> String {
    key.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
