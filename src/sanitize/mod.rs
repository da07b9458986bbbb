//! Data Sanitization
//!
//! Counter clamping and zero-safe ratios.
//!
//! Records come from an external store and may violate their own contract
//! (negative counters, `correct > attempts`, box out of range). Every
//! aggregate reads records through [`SanitizedCounts`] so that invalid state
//! never reaches an output.

use crate::types::{PracticeRecord, MASTERY_BOX_THRESHOLD, MAX_BOX};

/// `num / den` clamped to [0, 1]; 0 when the denominator is not positive
pub fn safe_ratio(num: i64, den: i64) -> f64 {
    if den <= 0 {
        return 0.0;
    }
    let ratio = num.max(0) as f64 / den as f64;
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Clamp a ratio that was computed elsewhere into [0, 1]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub fn clamp_attempts(attempts: i64) -> i64 {
    attempts.max(0)
}

pub fn clamp_correct(correct: i64, attempts: i64) -> i64 {
    correct.clamp(0, clamp_attempts(attempts))
}

pub fn clamp_box(box_level: i64) -> i64 {
    box_level.clamp(0, MAX_BOX)
}

/// Clamped counters of a single record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SanitizedCounts {
    pub attempts: i64,
    pub correct: i64,
    pub box_level: i64,
}

impl SanitizedCounts {
    pub fn of(record: &PracticeRecord) -> Self {
        let attempts = clamp_attempts(record.attempts);
        Self {
            attempts,
            correct: clamp_correct(record.correct, attempts),
            box_level: clamp_box(record.box_level),
        }
    }

    pub fn accuracy(&self) -> f64 {
        safe_ratio(self.correct, self.attempts)
    }

    pub fn is_mastered(&self) -> bool {
        self.box_level >= MASTERY_BOX_THRESHOLD
    }
}
