//! Common Types and Constants
//!
//! Shared data structures used by the aggregator, the curriculum evaluator
//! and the recommendation engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Box level at which an item counts as mastered
pub const MASTERY_BOX_THRESHOLD: i64 = 3;

/// Highest box level a record can hold
pub const MAX_BOX: i64 = 4;

/// Minimum attempts for a pattern / origin / theme group to be reported
pub const MIN_DIMENSION_ATTEMPTS: i64 = 3;

/// Minimum attempts for a category to count as an error pattern
pub const MIN_ERROR_PATTERN_ATTEMPTS: i64 = 5;

/// Error rate a category must exceed to count as an error pattern
pub const ERROR_PATTERN_RATE: f64 = 0.2;

// ==================== Practice Records ====================

/// One timestamped answer for a practice item
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutcome {
    /// Epoch milliseconds
    pub at: i64,
    pub correct: bool,
}

/// Performance record for one practice item, as handed over by the store
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeRecord {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Total answers recorded; negative values are treated as 0
    #[serde(default)]
    pub attempts: i64,
    /// Correct answers; clamped into `[0, attempts]`
    #[serde(default)]
    pub correct: i64,
    /// Mastery box 0-4, owned by the store's scheduling policy
    #[serde(default, rename = "box")]
    pub box_level: i64,
    /// Chronological outcomes, oldest first. Optional; only windowed
    /// coaching signals read it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<AttemptOutcome>,
}

impl PracticeRecord {
    pub fn new(category: impl Into<String>, attempts: i64, correct: i64, box_level: i64) -> Self {
        Self {
            category: category.into(),
            attempts,
            correct,
            box_level,
            ..Default::default()
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_history(mut self, history: Vec<AttemptOutcome>) -> Self {
        self.history = history;
        self
    }
}

/// Immutable view of the record store: item id -> record.
///
/// Ordered so that every aggregate iterates deterministically.
pub type Snapshot = BTreeMap<String, PracticeRecord>;

/// Counters computed by the store and passed in by value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSignals {
    /// Items due under the store's spaced-review policy
    pub review_due_count: u32,
    /// Items the store considers persistently weak
    pub weak_item_count: u32,
}

// ==================== Aggregates ====================

/// Secondary grouping dimension of a record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Category,
    Pattern,
    Origin,
    Theme,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Pattern => "pattern",
            Self::Origin => "origin",
            Self::Theme => "theme",
        }
    }

    /// Grouping key of `record` along this dimension, if tagged
    pub fn key_of<'a>(&self, record: &'a PracticeRecord) -> Option<&'a str> {
        match self {
            Self::Category => Some(record.category.as_str()),
            Self::Pattern => record.pattern.as_deref(),
            Self::Origin => record.origin.as_deref(),
            Self::Theme => record.theme.as_deref(),
        }
    }
}

/// Accuracy summary for one group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyBar {
    pub key: String,
    pub label: String,
    /// correct / attempts, 0 when there are no attempts
    pub accuracy: f64,
    pub attempts: i64,
    pub correct: i64,
}

/// Category whose error rate is high over a meaningful sample
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPattern {
    pub category: String,
    pub label: String,
    pub error_rate: f64,
    pub attempts: i64,
    pub errors: i64,
}

// ==================== Curriculum ====================

/// One entry of the static curriculum table
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumPhase {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tier: &'static str,
    pub categories: &'static [&'static str],
    /// Cumulative mastered items needed, non-decreasing along the table
    pub mastery_gate: i64,
    /// Minimum overall accuracy in [0, 1]
    pub accuracy_gate: f64,
}

/// Evaluated state of one phase
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    pub phase: CurriculumPhase,
    pub mastered_words: i64,
    pub accuracy: f64,
    pub unlocked: bool,
    pub complete: bool,
    /// min(1, mastered / mastery_gate)
    pub progress: f64,
}

/// Evaluated state of the whole table
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumProgress {
    pub current_phase_index: usize,
    pub mastered_words: i64,
    pub overall_accuracy: f64,
    pub phases: Vec<PhaseProgress>,
}

impl CurriculumProgress {
    pub fn current_phase(&self) -> Option<&PhaseProgress> {
        self.phases.get(self.current_phase_index)
    }
}

/// Phases sharing a tier label, for accordion display
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierProgress {
    pub tier: &'static str,
    pub phases: Vec<PhaseProgress>,
    pub complete: bool,
    pub locked: bool,
    /// Progress of the last member phase
    pub progress: f64,
}

// ==================== Recommendations ====================

/// Study-plan tier, in precedence order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Review,
    Weak,
    Explore,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Weak => "weak",
            Self::Explore => "explore",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeRecommendation {
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub label: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoachingKind {
    Improved,
    Trap,
    Weakness,
    Levelup,
}

impl CoachingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improved => "improved",
            Self::Trap => "trap",
            Self::Weakness => "weakness",
            Self::Levelup => "levelup",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingCard {
    pub kind: CoachingKind,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_category: Option<String>,
}

/// Suggestion to move on to harder material
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyNudge {
    pub target_phase_id: &'static str,
    pub target_category: String,
    pub label: String,
    pub sample_accuracy: f64,
    pub sample_size: i64,
    pub reason: String,
}
