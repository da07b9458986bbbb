//! Progress Engine
//!
//! Runs the aggregator, the curriculum evaluator and the recommendation
//! engine over one snapshot and caches the last result.
//!
//! The cache holds a single `(snapshot, signals) -> report` pair. A hit needs
//! an equal fingerprint and an equal snapshot, so a hash collision can only
//! cost a recomputation. Batches of unrelated snapshots are evaluated in
//! parallel and bypass the cache.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;

use crate::aggregate::{category_accuracy, dimension_accuracy, error_patterns, hardest_item_count, hardest_items};
use crate::config::EngineConfig;
use crate::curriculum::{evaluate_curriculum, group_by_tier, validate_phases, CURRICULUM};
use crate::error::Result;
use crate::recommend::{build_study_plan, coaching_cards, difficulty_nudge};
use crate::types::{
    AccuracyBar, CoachingCard, CurriculumPhase, CurriculumProgress, DifficultyNudge, Dimension,
    ErrorPattern, ExternalSignals, PracticeRecommendation, Snapshot, TierProgress,
};

/// Everything the presentation layer needs for one snapshot
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub curriculum: CurriculumProgress,
    pub tiers: Vec<TierProgress>,
    pub category_accuracy: Vec<AccuracyBar>,
    pub pattern_accuracy: Vec<AccuracyBar>,
    pub origin_accuracy: Vec<AccuracyBar>,
    pub theme_accuracy: Vec<AccuracyBar>,
    pub error_patterns: Vec<ErrorPattern>,
    pub study_plan: Vec<PracticeRecommendation>,
    pub coaching_cards: Vec<CoachingCard>,
    pub difficulty_nudge: Option<DifficultyNudge>,
    /// Weakest items first, capped at `drill_size`
    pub hardest_items: Vec<String>,
    pub hardest_item_count: usize,
}

impl ProgressReport {
    pub fn primary_action(&self) -> Option<&PracticeRecommendation> {
        self.study_plan.first()
    }
}

struct Memo {
    fingerprint: u64,
    snapshot: Snapshot,
    signals: ExternalSignals,
    report: Arc<ProgressReport>,
}

fn fingerprint(records: &Snapshot, signals: ExternalSignals) -> u64 {
    let mut hasher = DefaultHasher::new();
    records.hash(&mut hasher);
    signals.hash(&mut hasher);
    hasher.finish()
}

pub struct ProgressEngine {
    config: EngineConfig,
    phases: &'static [CurriculumPhase],
    memo: Mutex<Option<Memo>>,
}

impl ProgressEngine {
    /// Engine over the standard curriculum
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_curriculum(config, CURRICULUM)
    }

    pub fn with_curriculum(config: EngineConfig, phases: &'static [CurriculumPhase]) -> Result<Self> {
        config.validate()?;
        validate_phases(phases)?;
        Ok(Self {
            config,
            phases,
            memo: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phases(&self) -> &'static [CurriculumPhase] {
        self.phases
    }

    /// Report for `records`, reusing the cached one when nothing changed
    pub fn evaluate(&self, records: &Snapshot, signals: ExternalSignals) -> Arc<ProgressReport> {
        let fingerprint = fingerprint(records, signals);

        if let Some(memo) = self.memo.lock().as_ref() {
            if memo.fingerprint == fingerprint && memo.signals == signals && memo.snapshot == *records {
                tracing::trace!(fingerprint, "progress report cache hit");
                return Arc::clone(&memo.report);
            }
        }

        let report = Arc::new(self.compute(records, signals));
        *self.memo.lock() = Some(Memo {
            fingerprint,
            snapshot: records.clone(),
            signals,
            report: Arc::clone(&report),
        });
        tracing::debug!(
            fingerprint,
            items = records.len(),
            current_phase = report.curriculum.current_phase_index,
            "progress report computed"
        );
        report
    }

    /// Evaluate independent snapshots in parallel; the cache is not touched
    pub fn evaluate_batch(&self, inputs: &[(Snapshot, ExternalSignals)]) -> Vec<ProgressReport> {
        inputs
            .par_iter()
            .map(|(records, signals)| self.compute(records, *signals))
            .collect()
    }

    /// Drop the cached report
    pub fn invalidate(&self) {
        *self.memo.lock() = None;
    }

    fn compute(&self, records: &Snapshot, signals: ExternalSignals) -> ProgressReport {
        let config = &self.config;

        let curriculum = evaluate_curriculum(records, self.phases);
        let tiers = group_by_tier(&curriculum.phases);
        let categories = category_accuracy(records);
        let patterns = error_patterns(records);

        let study_plan = build_study_plan(records, &categories, &curriculum, signals, config);
        let nudge = difficulty_nudge(records, &curriculum, config);
        let cards = coaching_cards(records, &categories, &patterns, nudge.as_ref(), config);

        ProgressReport {
            tiers,
            pattern_accuracy: dimension_accuracy(records, Dimension::Pattern),
            origin_accuracy: dimension_accuracy(records, Dimension::Origin),
            theme_accuracy: dimension_accuracy(records, Dimension::Theme),
            hardest_items: hardest_items(
                records,
                config.weak_item_floor,
                config.weak_item_min_attempts,
                config.drill_size,
            ),
            hardest_item_count: hardest_item_count(records, config.weak_item_floor, config.weak_item_min_attempts),
            curriculum,
            category_accuracy: categories,
            error_patterns: patterns,
            study_plan,
            coaching_cards: cards,
            difficulty_nudge: nudge,
        }
    }
}
