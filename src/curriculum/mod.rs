//! Curriculum Evaluation
//!
//! Walks the ordered phase table and derives unlock / completion / progress
//! state from cumulative mastery and accuracy.
//!
//! Phase `i > 0` unlocks once phase `i - 1` is unlocked and both of its gates
//! are met. Gates are totals over the whole history, not per-phase deltas.
//! Tables accepted by [`validate_phases`] never lower either gate.

pub mod table;

use std::collections::HashSet;

use crate::aggregate::{mastered_count, overall_totals};
use crate::error::CurriculumError;
use crate::sanitize::{clamp_unit, safe_ratio};
use crate::types::{CurriculumPhase, CurriculumProgress, PhaseProgress, Snapshot, TierProgress};

pub use table::CURRICULUM;

/// Check that a phase table is usable by [`evaluate_curriculum`]
pub fn validate_phases(phases: &[CurriculumPhase]) -> Result<(), CurriculumError> {
    if phases.is_empty() {
        return Err(CurriculumError::Empty);
    }

    let mut seen = HashSet::new();
    let mut previous_gate = 0;
    let mut previous_accuracy = 0.0;
    for phase in phases {
        if !seen.insert(phase.id) {
            return Err(CurriculumError::DuplicatePhaseId(phase.id.to_string()));
        }
        if phase.mastery_gate < 0 {
            return Err(CurriculumError::NegativeMasteryGate {
                phase: phase.id.to_string(),
                gate: phase.mastery_gate,
            });
        }
        if phase.mastery_gate < previous_gate {
            return Err(CurriculumError::DecreasingMasteryGate {
                phase: phase.id.to_string(),
                gate: phase.mastery_gate,
                previous: previous_gate,
            });
        }
        if !(0.0..=1.0).contains(&phase.accuracy_gate) {
            return Err(CurriculumError::AccuracyGateOutOfRange {
                phase: phase.id.to_string(),
                gate: phase.accuracy_gate,
            });
        }
        if phase.accuracy_gate < previous_accuracy {
            return Err(CurriculumError::DecreasingAccuracyGate {
                phase: phase.id.to_string(),
                gate: phase.accuracy_gate,
                previous: previous_accuracy,
            });
        }
        previous_gate = phase.mastery_gate;
        previous_accuracy = phase.accuracy_gate;
    }
    Ok(())
}

fn gates_met(phase: &CurriculumPhase, mastered: i64, accuracy: f64) -> bool {
    mastered >= phase.mastery_gate && accuracy >= phase.accuracy_gate
}

fn phase_progress_ratio(phase: &CurriculumPhase, mastered: i64) -> f64 {
    // a zero gate is already satisfied
    if phase.mastery_gate <= 0 {
        return 1.0;
    }
    clamp_unit(safe_ratio(mastered, phase.mastery_gate).min(1.0))
}

/// Evaluate every phase of `phases` against `records`
pub fn evaluate_curriculum(records: &Snapshot, phases: &[CurriculumPhase]) -> CurriculumProgress {
    let mastered = mastered_count(records);
    let accuracy = overall_totals(records).accuracy();

    let mut progress: Vec<PhaseProgress> = Vec::with_capacity(phases.len());
    for phase in phases {
        // unlocked and gates met == complete
        let unlocked = progress.last().map_or(true, |previous| previous.complete);
        progress.push(PhaseProgress {
            phase: *phase,
            mastered_words: mastered,
            accuracy,
            unlocked,
            complete: unlocked && gates_met(phase, mastered, accuracy),
            progress: phase_progress_ratio(phase, mastered),
        });
    }

    let current_phase_index = current_phase_index(&progress);

    tracing::trace!(
        mastered,
        accuracy,
        current_phase_index,
        "curriculum evaluated"
    );

    CurriculumProgress {
        current_phase_index,
        mastered_words: mastered,
        overall_accuracy: accuracy,
        phases: progress,
    }
}

/// Last assignment wins: the first unlocked-and-incomplete phase, or one past
/// the last completed unlocked phase, clamped to the final index
fn current_phase_index(phases: &[PhaseProgress]) -> usize {
    let last = phases.len().saturating_sub(1);
    let mut current = 0;
    for (i, phase) in phases.iter().enumerate() {
        if !phase.unlocked {
            continue;
        }
        current = if phase.complete { (i + 1).min(last) } else { i };
    }
    current
}

/// Partition phase progress by tier, in first-appearance order
pub fn group_by_tier(phases: &[PhaseProgress]) -> Vec<TierProgress> {
    let mut tiers: Vec<TierProgress> = Vec::new();
    for phase in phases {
        let tier = phase.phase.tier;
        match tiers.iter_mut().find(|t| t.tier == tier) {
            Some(group) => group.phases.push(phase.clone()),
            None => tiers.push(TierProgress {
                tier,
                phases: vec![phase.clone()],
                complete: false,
                locked: false,
                progress: 0.0,
            }),
        }
    }

    for group in &mut tiers {
        group.complete = group.phases.iter().all(|p| p.complete);
        group.locked = group.phases.iter().all(|p| !p.unlocked);
        group.progress = group.phases.last().map(|p| p.progress).unwrap_or(0.0);
    }
    tiers
}

/// Index of the phase that introduces `category`
pub fn phase_for_category(phases: &[CurriculumPhase], category: &str) -> Option<usize> {
    phases
        .iter()
        .position(|phase| phase.categories.contains(&category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PracticeRecord;

    const TWO_PHASES: &[CurriculumPhase] = &[
        CurriculumPhase {
            id: "p0",
            name: "Phase 0",
            description: "",
            tier: "A",
            categories: &["short-a"],
            mastery_gate: 20,
            accuracy_gate: 0.7,
        },
        CurriculumPhase {
            id: "p1",
            name: "Phase 1",
            description: "",
            tier: "A",
            categories: &["silent-e"],
            mastery_gate: 40,
            accuracy_gate: 0.7,
        },
        CurriculumPhase {
            id: "p2",
            name: "Phase 2",
            description: "",
            tier: "B",
            categories: &["vowel-teams"],
            mastery_gate: 60,
            accuracy_gate: 0.8,
        },
    ];

    /// `mastered` items at box 3 plus filler, with the given attempt totals
    fn history(mastered: usize, attempts: i64, correct: i64) -> Snapshot {
        let mut records = Snapshot::new();
        for i in 0..mastered {
            records.insert(format!("m{i:03}"), PracticeRecord::new("short-a", 0, 0, 3));
        }
        records.insert("totals".to_string(), PracticeRecord::new("short-a", attempts, correct, 0));
        records
    }

    // ==================== validate_phases 测试 ====================

    #[test]
    fn test_standard_table_is_valid() {
        assert_eq!(validate_phases(CURRICULUM), Ok(()));
        assert_eq!(CURRICULUM[0].mastery_gate, 20);
        assert_eq!(CURRICULUM[0].accuracy_gate, 0.7);
        assert_eq!(CURRICULUM[1].mastery_gate, 40);
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        assert_eq!(validate_phases(&[]), Err(CurriculumError::Empty));

        let mut decreasing = TWO_PHASES.to_vec();
        decreasing[1].mastery_gate = 5;
        assert!(matches!(
            validate_phases(&decreasing),
            Err(CurriculumError::DecreasingMasteryGate { gate: 5, previous: 20, .. })
        ));

        let mut duplicate = TWO_PHASES.to_vec();
        duplicate[2].id = "p0";
        assert_eq!(
            validate_phases(&duplicate),
            Err(CurriculumError::DuplicatePhaseId("p0".to_string()))
        );

        let mut accuracy = TWO_PHASES.to_vec();
        accuracy[0].accuracy_gate = 1.2;
        assert!(matches!(
            validate_phases(&accuracy),
            Err(CurriculumError::AccuracyGateOutOfRange { .. })
        ));

        let mut lowered = TWO_PHASES.to_vec();
        lowered[1].accuracy_gate = 0.5;
        lowered[2].accuracy_gate = 0.5;
        assert!(matches!(
            validate_phases(&lowered),
            Err(CurriculumError::DecreasingAccuracyGate { phase, .. }) if phase == "p1"
        ));
    }

    // ==================== evaluate_curriculum 测试 ====================

    #[test]
    fn test_empty_history() {
        let progress = evaluate_curriculum(&Snapshot::new(), TWO_PHASES);

        assert_eq!(progress.mastered_words, 0);
        assert_eq!(progress.overall_accuracy, 0.0);
        assert_eq!(progress.current_phase_index, 0);
        assert!(progress.phases[0].unlocked);
        assert!(!progress.phases[0].complete);
        assert_eq!(progress.phases[0].progress, 0.0);
        assert!(!progress.phases[1].unlocked);
    }

    #[test]
    fn test_first_phase_complete_second_in_progress() {
        let progress = evaluate_curriculum(&history(25, 30, 27), TWO_PHASES);

        assert_eq!(progress.mastered_words, 25);
        assert!((progress.overall_accuracy - 0.9).abs() < 1e-12);
        assert!(progress.phases[0].complete);
        assert!(progress.phases[1].unlocked);
        assert!(!progress.phases[1].complete);
        assert!((progress.phases[1].progress - 0.625).abs() < 1e-12);
        assert!(!progress.phases[2].unlocked);
        assert_eq!(progress.current_phase_index, 1);
    }

    #[test]
    fn test_accuracy_gate_blocks_unlock() {
        let progress = evaluate_curriculum(&history(25, 10, 6), TWO_PHASES);

        assert!(!progress.phases[0].complete);
        assert!(!progress.phases[1].unlocked);
        assert_eq!(progress.phases[0].progress, 1.0);
        assert_eq!(progress.current_phase_index, 0);
    }

    #[test]
    fn test_all_complete_clamps_to_last_index() {
        let progress = evaluate_curriculum(&history(70, 10, 10), TWO_PHASES);

        assert!(progress.phases.iter().all(|p| p.complete));
        assert_eq!(progress.current_phase_index, 2);

        let tiers = group_by_tier(&progress.phases);
        assert_eq!(tiers.len(), 2);
        assert!(tiers.iter().all(|t| t.complete && !t.locked));
        assert!(tiers.iter().all(|t| t.progress == 1.0));
    }

    #[test]
    fn test_unlock_chain_with_lowered_accuracy_gate() {
        let mut phases = TWO_PHASES.to_vec();
        for phase in &mut phases {
            phase.mastery_gate = 10;
        }
        phases[0].accuracy_gate = 0.9;
        phases[1].accuracy_gate = 0.5;
        phases[2].accuracy_gate = 0.5;

        let progress = evaluate_curriculum(&history(10, 100, 60), &phases);
        let state: Vec<(bool, bool)> = progress.phases.iter().map(|p| (p.unlocked, p.complete)).collect();

        assert_eq!(state, vec![(true, false), (false, false), (false, false)]);
        assert_eq!(progress.current_phase_index, 0);
    }

    #[test]
    fn test_zero_gate_counts_as_satisfied() {
        let mut phases = TWO_PHASES.to_vec();
        phases[0].mastery_gate = 0;
        phases[0].accuracy_gate = 0.0;
        let progress = evaluate_curriculum(&Snapshot::new(), &phases);

        assert_eq!(progress.phases[0].progress, 1.0);
        assert!(progress.phases[0].complete);
        assert!(progress.phases[1].unlocked);
        assert_eq!(progress.current_phase_index, 1);
    }

    #[test]
    fn test_empty_table() {
        let progress = evaluate_curriculum(&history(5, 5, 5), &[]);
        assert!(progress.phases.is_empty());
        assert_eq!(progress.current_phase_index, 0);
    }

    // ==================== group_by_tier 测试 ====================

    #[test]
    fn test_group_by_tier() {
        let progress = evaluate_curriculum(&history(25, 30, 27), TWO_PHASES);
        let tiers = group_by_tier(&progress.phases);

        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].tier, "A");
        assert_eq!(tiers[0].phases.len(), 2);
        assert!(!tiers[0].complete);
        assert!(!tiers[0].locked);
        // last member, not the average
        assert!((tiers[0].progress - 0.625).abs() < 1e-12);

        assert_eq!(tiers[1].tier, "B");
        assert!(tiers[1].locked);
        assert!(!tiers[1].complete);
    }

    #[test]
    fn test_group_by_tier_standard_table_order() {
        let progress = evaluate_curriculum(&Snapshot::new(), CURRICULUM);
        let tiers = group_by_tier(&progress.phases);
        let names: Vec<&str> = tiers.iter().map(|t| t.tier).collect();

        assert_eq!(names, vec![table::TIER_FOUNDATIONS, table::TIER_BUILDER, table::TIER_CHALLENGER]);
        assert_eq!(tiers.iter().map(|t| t.phases.len()).sum::<usize>(), CURRICULUM.len());
    }

    #[test]
    fn test_phase_for_category() {
        assert_eq!(phase_for_category(CURRICULUM, "short-a"), Some(0));
        assert_eq!(phase_for_category(CURRICULUM, "silent-e"), Some(2));
        assert_eq!(phase_for_category(CURRICULUM, "unknown"), None);
    }
}
