//! Coaching cards: short insights derived from the same aggregates as the plan.
//!
//! Cards come out in a fixed order: weakness, traps, improvements, level-up.

use std::collections::BTreeMap;

use crate::aggregate::{category_history, humanize_key};
use crate::config::EngineConfig;
use crate::sanitize::safe_ratio;
use crate::types::{
    AccuracyBar, AttemptOutcome, CoachingCard, CoachingKind, DifficultyNudge, ErrorPattern, Snapshot,
};

use super::percent;

/// A category whose recent window beats its earlier attempts
#[derive(Clone, Debug, PartialEq)]
pub struct Improvement {
    pub category: String,
    pub earlier_accuracy: f64,
    pub recent_accuracy: f64,
    pub window: usize,
}

impl Improvement {
    pub fn gain(&self) -> f64 {
        self.recent_accuracy - self.earlier_accuracy
    }
}

fn accuracy_of(outcomes: &[AttemptOutcome]) -> f64 {
    let correct = outcomes.iter().filter(|o| o.correct).count() as i64;
    safe_ratio(correct, outcomes.len() as i64)
}

/// Categories whose last `improvement_window` attempts beat everything before
/// by at least `improvement_min_gain`, largest gain first
pub fn improvements(history: &BTreeMap<String, Vec<AttemptOutcome>>, config: &EngineConfig) -> Vec<Improvement> {
    let window = config.improvement_window.max(1);
    let mut found: Vec<Improvement> = history
        .iter()
        .filter(|(_, outcomes)| outcomes.len() >= window.saturating_add(config.improvement_min_earlier))
        .filter_map(|(category, outcomes)| {
            let (earlier, recent) = outcomes.split_at(outcomes.len() - window);
            let improvement = Improvement {
                category: category.clone(),
                earlier_accuracy: accuracy_of(earlier),
                recent_accuracy: accuracy_of(recent),
                window,
            };
            (improvement.gain() >= config.improvement_min_gain).then_some(improvement)
        })
        .collect();
    found.sort_by(|a, b| {
        b.gain()
            .total_cmp(&a.gain())
            .then_with(|| a.category.cmp(&b.category))
    });
    found
}

fn weakness_card(bar: &AccuracyBar) -> CoachingCard {
    CoachingCard {
        kind: CoachingKind::Weakness,
        title: format!("{} needs attention", bar.label),
        detail: format!(
            "You spelled {} words correctly {} out of {} times.",
            bar.label, bar.correct, bar.attempts
        ),
        stat: Some(format!("{:.0}%", percent(bar.accuracy))),
        tip: Some("Say each sound out loud as you write it.".to_string()),
        cta_category: Some(bar.key.clone()),
    }
}

fn trap_card(pattern: &ErrorPattern) -> CoachingCard {
    CoachingCard {
        kind: CoachingKind::Trap,
        title: format!("Watch out for {}", pattern.label),
        detail: format!("{} misses in {} tries.", pattern.errors, pattern.attempts),
        stat: Some(format!("{:.0}% missed", percent(pattern.error_rate))),
        tip: Some("Spot the spelling pattern before you start writing.".to_string()),
        cta_category: Some(pattern.category.clone()),
    }
}

fn improved_card(improvement: &Improvement) -> CoachingCard {
    CoachingCard {
        kind: CoachingKind::Improved,
        title: format!("{} is improving", humanize_key(&improvement.category)),
        detail: format!(
            "Up from {:.0}% to {:.0}% over your last {} tries.",
            percent(improvement.earlier_accuracy),
            percent(improvement.recent_accuracy),
            improvement.window
        ),
        stat: Some(format!("+{:.0}%", percent(improvement.gain()))),
        tip: None,
        cta_category: None,
    }
}

fn levelup_card(nudge: &DifficultyNudge) -> CoachingCard {
    CoachingCard {
        kind: CoachingKind::Levelup,
        title: format!("Ready for {}", nudge.label),
        detail: nudge.reason.clone(),
        stat: Some(format!(
            "{:.0}% over {} tries",
            percent(nudge.sample_accuracy),
            nudge.sample_size
        )),
        tip: Some("Keep reviewing earlier words while you try the new ones.".to_string()),
        cta_category: Some(nudge.target_category.clone()),
    }
}

/// Derive coaching cards.
///
/// `category_accuracy` and `error_patterns` are the aggregator outputs for the
/// same snapshot; `nudge` is the result of
/// [`difficulty_nudge`](super::difficulty_nudge).
pub fn coaching_cards(
    records: &Snapshot,
    category_accuracy: &[AccuracyBar],
    error_patterns: &[ErrorPattern],
    nudge: Option<&DifficultyNudge>,
    config: &EngineConfig,
) -> Vec<CoachingCard> {
    let mut cards = Vec::new();

    let weakness = super::weak_categories(category_accuracy, config)
        .into_iter()
        .find(|bar| bar.attempts >= config.weakness_min_attempts);
    if let Some(bar) = weakness {
        cards.push(weakness_card(bar));
    }

    let weakness_key = weakness.map(|bar| bar.key.as_str());
    cards.extend(
        error_patterns
            .iter()
            .filter(|p| p.error_rate >= config.trap_error_rate && p.attempts >= config.trap_min_attempts)
            .filter(|p| Some(p.category.as_str()) != weakness_key)
            .take(config.max_trap_cards)
            .map(trap_card),
    );

    let history = category_history(records);
    cards.extend(
        improvements(&history, config)
            .iter()
            .take(config.max_improved_cards)
            .map(improved_card),
    );

    if let Some(nudge) = nudge {
        cards.push(levelup_card(nudge));
    }

    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{category_accuracy, error_patterns};
    use crate::types::PracticeRecord;

    fn outcomes(pattern: &str) -> Vec<AttemptOutcome> {
        pattern
            .chars()
            .enumerate()
            .map(|(i, c)| AttemptOutcome { at: i as i64 * 1000, correct: c == '1' })
            .collect()
    }

    fn cards_for(records: &Snapshot, nudge: Option<&DifficultyNudge>) -> Vec<CoachingCard> {
        let bars = category_accuracy(records);
        let patterns = error_patterns(records);
        coaching_cards(records, &bars, &patterns, nudge, &EngineConfig::default())
    }

    fn kinds(cards: &[CoachingCard]) -> Vec<CoachingKind> {
        cards.iter().map(|c| c.kind).collect()
    }

    // ==================== improvements 测试 ====================

    #[test]
    fn test_improvement_detected() {
        let mut history = BTreeMap::new();
        // earlier 1/5, recent 9/10
        history.insert("silent-e".to_string(), outcomes("001001111111110"));

        let found = improvements(&history, &EngineConfig::default());
        assert_eq!(found.len(), 1);
        assert!((found[0].earlier_accuracy - 0.2).abs() < 1e-12);
        assert!((found[0].recent_accuracy - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_improvement_needs_enough_history() {
        let mut history = BTreeMap::new();
        history.insert("silent-e".to_string(), outcomes("00001111111111"));
        assert!(improvements(&history, &EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_improvement_with_huge_minimum_earlier() {
        let mut history = BTreeMap::new();
        history.insert("silent-e".to_string(), outcomes("001001111111110"));
        let config = EngineConfig { improvement_min_earlier: usize::MAX, ..Default::default() };
        assert!(improvements(&history, &config).is_empty());
    }

    #[test]
    fn test_improvement_ignores_flat_progress() {
        let mut history = BTreeMap::new();
        history.insert("silent-e".to_string(), outcomes("101011010101010"));
        assert!(improvements(&history, &EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_improvements_sorted_by_gain() {
        let mut history = BTreeMap::new();
        history.insert("a".to_string(), outcomes("000001111111100"));
        history.insert("b".to_string(), outcomes("000001111111111"));

        let found = improvements(&history, &EngineConfig::default());
        assert_eq!(found.iter().map(|i| i.category.as_str()).collect::<Vec<_>>(), vec!["b", "a"]);
    }

    // ==================== coaching_cards 测试 ====================

    #[test]
    fn test_no_cards_for_empty_history() {
        assert!(cards_for(&Snapshot::new(), None).is_empty());
    }

    #[test]
    fn test_weakness_and_traps() {
        let records: Snapshot = vec![
            ("knight", PracticeRecord::new("silent-letters", 12, 3, 0)),
            ("their", PracticeRecord::new("homophones", 10, 5, 0)),
            ("though", PracticeRecord::new("ough-words", 10, 6, 0)),
            ("cat", PracticeRecord::new("short-a", 10, 10, 3)),
        ]
        .into_iter()
        .map(|(id, r)| (id.to_string(), r))
        .collect();

        let cards = cards_for(&records, None);
        assert_eq!(kinds(&cards), vec![CoachingKind::Weakness, CoachingKind::Trap, CoachingKind::Trap]);
        assert_eq!(cards[0].cta_category.as_deref(), Some("silent-letters"));
        assert_eq!(cards[0].stat.as_deref(), Some("25%"));
        // weakness is not repeated as a trap
        assert_eq!(cards[1].cta_category.as_deref(), Some("homophones"));
        assert_eq!(cards[2].cta_category.as_deref(), Some("ough-words"));
        assert_eq!(cards[2].stat.as_deref(), Some("40% missed"));
    }

    #[test]
    fn test_improved_and_levelup_cards() {
        let records: Snapshot = [(
            "cake".to_string(),
            PracticeRecord::new("silent-e", 15, 12, 2).with_history(outcomes("000001111111111")),
        )]
        .into_iter()
        .collect();
        let nudge = DifficultyNudge {
            target_phase_id: "vowel-teams",
            target_category: "vowel-teams-ai-ay".to_string(),
            label: "Vowel Teams".to_string(),
            sample_accuracy: 0.95,
            sample_size: 20,
            reason: "95% correct".to_string(),
        };

        let cards = cards_for(&records, Some(&nudge));
        assert_eq!(kinds(&cards), vec![CoachingKind::Improved, CoachingKind::Levelup]);
        assert_eq!(cards[0].title, "Silent E is improving");
        assert_eq!(cards[0].stat.as_deref(), Some("+100%"));
        assert_eq!(cards[1].cta_category.as_deref(), Some("vowel-teams-ai-ay"));
        assert_eq!(cards[1].stat.as_deref(), Some("95% over 20 tries"));
    }
}
