//! Difficulty nudge: suggest the next phase once the current one is easy.
//!
//! The sample is the most recent `nudge_window` attempts across the current
//! phase's categories. The window is only used when every attempted record in
//! those categories carries history; otherwise cumulative counters are summed.

use crate::aggregate::{category_history, category_totals, Totals};
use crate::config::EngineConfig;
use crate::sanitize::{safe_ratio, SanitizedCounts};
use crate::types::{AttemptOutcome, CurriculumProgress, DifficultyNudge, Snapshot};

use super::percent;

/// Attempts and correct answers backing a nudge decision
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NudgeSample {
    pub size: i64,
    pub correct: i64,
}

impl NudgeSample {
    pub fn accuracy(&self) -> f64 {
        safe_ratio(self.correct, self.size)
    }
}

/// Recent-window sample for `categories`, or cumulative totals when some
/// attempted record has no history or the window holds fewer than
/// `nudge_min_sample` attempts
pub fn nudge_sample(records: &Snapshot, categories: &[&str], config: &EngineConfig) -> NudgeSample {
    let fully_tracked = records
        .values()
        .filter(|record| categories.contains(&record.category.as_str()))
        .filter(|record| SanitizedCounts::of(record).attempts > 0)
        .all(|record| !record.history.is_empty());

    if fully_tracked {
        let history = category_history(records);
        let mut merged: Vec<&AttemptOutcome> = categories
            .iter()
            .filter_map(|category| history.get(*category))
            .flatten()
            .collect();
        merged.sort_by_key(|outcome| outcome.at);

        let recent = &merged[merged.len().saturating_sub(config.nudge_window)..];
        if recent.len() as i64 >= config.nudge_min_sample {
            return NudgeSample {
                size: recent.len() as i64,
                correct: recent.iter().filter(|o| o.correct).count() as i64,
            };
        }
    }

    let totals = category_totals(records);
    let cumulative = categories
        .iter()
        .filter_map(|category| totals.get(*category))
        .fold(Totals::default(), |acc, t| Totals {
            attempts: acc.attempts.saturating_add(t.attempts),
            correct: acc.correct.saturating_add(t.correct),
        });
    NudgeSample {
        size: cumulative.attempts,
        correct: cumulative.correct,
    }
}

/// Suggest the phase after the current one when the current categories are
/// answered above `nudge_accuracy` over a large enough sample
pub fn difficulty_nudge(
    records: &Snapshot,
    curriculum: &CurriculumProgress,
    config: &EngineConfig,
) -> Option<DifficultyNudge> {
    let index = curriculum.current_phase_index;
    let current = curriculum.phases.get(index)?;
    let next = curriculum.phases.get(index + 1)?;

    let sample = nudge_sample(records, current.phase.categories, config);
    if sample.size < config.nudge_min_sample {
        return None;
    }
    let accuracy = sample.accuracy();
    if accuracy <= config.nudge_accuracy {
        return None;
    }

    let target_category = next
        .phase
        .categories
        .first()
        .map(|c| c.to_string())
        .unwrap_or_else(|| next.phase.id.to_string());

    tracing::debug!(
        from = current.phase.id,
        to = next.phase.id,
        accuracy,
        sample = sample.size,
        "difficulty nudge"
    );

    Some(DifficultyNudge {
        target_phase_id: next.phase.id,
        target_category,
        label: next.phase.name.to_string(),
        sample_accuracy: accuracy,
        sample_size: sample.size,
        reason: format!(
            "{:.0}% correct over your last {} {} words",
            percent(accuracy),
            sample.size,
            current.phase.name
        ),
    })
}
