//! Study Recommendations
//!
//! Turns aggregates, curriculum state and the store's counters into:
//!
//! - a ranked study plan (`review > weak > explore`), see [`build_study_plan`]
//! - coaching cards, see [`coaching`]
//! - a difficulty nudge, see [`nudge`]

pub mod coaching;
pub mod nudge;

use std::cmp::Ordering;

use crate::aggregate::{category_totals, humanize_key};
use crate::config::EngineConfig;
use crate::types::{
    AccuracyBar, CurriculumProgress, ExternalSignals, PracticeRecommendation, Priority, Snapshot,
};

pub use coaching::coaching_cards;
pub use nudge::difficulty_nudge;

fn percent(ratio: f64) -> f64 {
    (ratio * 100.0).round()
}

/// Categories under the weak floor with enough attempts, worst first
pub fn weak_categories<'a>(category_accuracy: &'a [AccuracyBar], config: &EngineConfig) -> Vec<&'a AccuracyBar> {
    let mut weak: Vec<&AccuracyBar> = category_accuracy
        .iter()
        .filter(|bar| {
            bar.attempts >= config.weak_category_min_attempts && bar.accuracy < config.weak_category_floor
        })
        .collect();
    weak.sort_by(|a, b| match a.accuracy.total_cmp(&b.accuracy) {
        Ordering::Equal => a.key.cmp(&b.key),
        other => other,
    });
    weak
}

/// Current-phase categories without a single recorded attempt, in table order
pub fn unexplored_categories(records: &Snapshot, curriculum: &CurriculumProgress) -> Vec<&'static str> {
    let Some(current) = curriculum.current_phase() else {
        return Vec::new();
    };
    let totals = category_totals(records);
    current
        .phase
        .categories
        .iter()
        .copied()
        .filter(|category| totals.get(*category).map_or(true, |t| t.attempts == 0))
        .collect()
}

fn review_entry(due: u32) -> PracticeRecommendation {
    PracticeRecommendation {
        priority: Priority::Review,
        category: None,
        label: "Review due words".to_string(),
        reason: format!("{due} {} due for review", if due == 1 { "word is" } else { "words are" }),
        cta_category: None,
        count: Some(due),
    }
}

fn weak_entry(bar: &AccuracyBar) -> PracticeRecommendation {
    PracticeRecommendation {
        priority: Priority::Weak,
        category: Some(bar.key.clone()),
        label: format!("Practice {}", bar.label),
        reason: format!(
            "{:.0}% correct over {} attempts",
            percent(bar.accuracy),
            bar.attempts
        ),
        cta_category: Some(bar.key.clone()),
        count: None,
    }
}

fn drill_entry(weak_items: u32) -> PracticeRecommendation {
    PracticeRecommendation {
        priority: Priority::Weak,
        category: None,
        label: "Drill your trickiest words".to_string(),
        reason: format!("{weak_items} words keep tripping you up"),
        cta_category: None,
        count: Some(weak_items),
    }
}

fn explore_entry(category: &str, phase_name: &str) -> PracticeRecommendation {
    PracticeRecommendation {
        priority: Priority::Explore,
        category: Some(category.to_string()),
        label: format!("Try {}", humanize_key(category)),
        reason: format!("New in {phase_name}: you haven't practised these yet"),
        cta_category: Some(category.to_string()),
        count: None,
    }
}

/// Ranked study plan; the first entry is the primary call to action.
///
/// `category_accuracy` is the output of
/// [`category_accuracy`](crate::aggregate::category_accuracy).
pub fn build_study_plan(
    records: &Snapshot,
    category_accuracy: &[AccuracyBar],
    curriculum: &CurriculumProgress,
    signals: ExternalSignals,
    config: &EngineConfig,
) -> Vec<PracticeRecommendation> {
    let mut plan = Vec::new();

    if signals.review_due_count > 0 {
        plan.push(review_entry(signals.review_due_count));
    }

    let weak = weak_categories(category_accuracy, config);
    if weak.is_empty() {
        if signals.weak_item_count > 0 {
            plan.push(drill_entry(signals.weak_item_count));
        }
    } else {
        plan.extend(weak.into_iter().take(config.weak_category_cap).map(weak_entry));
    }

    if let Some(current) = curriculum.current_phase() {
        plan.extend(
            unexplored_categories(records, curriculum)
                .into_iter()
                .map(|category| explore_entry(category, current.phase.name)),
        );
    }

    plan.truncate(config.study_plan_max);
    tracing::debug!(entries = plan.len(), review_due = signals.review_due_count, "study plan built");
    plan
}

/// The designated primary call to action of a plan
pub fn primary_action(plan: &[PracticeRecommendation]) -> Option<&PracticeRecommendation> {
    plan.first()
}
