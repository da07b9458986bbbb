use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const ENV_PREFIX: &str = "DANCI_PROGRESS_";

/// Tunable thresholds of the recommendation engine.
///
/// The aggregator's own sample sizes and the curriculum gates are fixed and
/// live in [`crate::types`] and [`crate::curriculum::table`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Categories below this accuracy are "weak"
    pub weak_category_floor: f64,
    pub weak_category_min_attempts: i64,
    /// Max weak entries in the study plan
    pub weak_category_cap: usize,
    pub study_plan_max: usize,

    /// Items below this accuracy count as hardest items
    pub weak_item_floor: f64,
    pub weak_item_min_attempts: i64,
    pub drill_size: usize,

    /// Most recent attempts compared against everything earlier
    pub improvement_window: usize,
    pub improvement_min_earlier: usize,
    pub improvement_min_gain: f64,
    pub max_improved_cards: usize,

    pub trap_error_rate: f64,
    pub trap_min_attempts: i64,
    pub max_trap_cards: usize,

    pub weakness_min_attempts: i64,

    pub nudge_window: usize,
    pub nudge_min_sample: i64,
    /// Sample accuracy needed before suggesting harder material
    pub nudge_accuracy: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weak_category_floor: 0.7,
            weak_category_min_attempts: 5,
            weak_category_cap: 3,
            study_plan_max: 5,
            weak_item_floor: 0.5,
            weak_item_min_attempts: 2,
            drill_size: 10,
            improvement_window: 10,
            improvement_min_earlier: 5,
            improvement_min_gain: 0.15,
            max_improved_cards: 2,
            trap_error_rate: 0.35,
            trap_min_attempts: 10,
            max_trap_cards: 2,
            weakness_min_attempts: 8,
            nudge_window: 20,
            nudge_min_sample: 15,
            nudge_accuracy: 0.9,
        }
    }
}

fn env_value<T: std::str::FromStr>(name: &str) -> Option<T> {
    let key = format!("{ENV_PREFIX}{name}");
    let raw = std::env::var(&key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key = %key, value = %raw, "ignoring unparsable config override");
            None
        }
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, min: 0.0, max: 1.0 })
    }
}

fn check_at_least(field: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, min, max: f64::MAX })
    }
}

impl EngineConfig {
    /// Defaults overridden by `DANCI_PROGRESS_*` variables.
    ///
    /// Unparsable values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_value("WEAK_CATEGORY_FLOOR") {
            config.weak_category_floor = v;
        }
        if let Some(v) = env_value("WEAK_CATEGORY_MIN_ATTEMPTS") {
            config.weak_category_min_attempts = v;
        }
        if let Some(v) = env_value("WEAK_CATEGORY_CAP") {
            config.weak_category_cap = v;
        }
        if let Some(v) = env_value("STUDY_PLAN_MAX") {
            config.study_plan_max = v;
        }
        if let Some(v) = env_value("WEAK_ITEM_FLOOR") {
            config.weak_item_floor = v;
        }
        if let Some(v) = env_value("IMPROVEMENT_WINDOW") {
            config.improvement_window = v;
        }
        if let Some(v) = env_value("NUDGE_ACCURACY") {
            config.nudge_accuracy = v;
        }
        if let Some(v) = env_value("NUDGE_MIN_SAMPLE") {
            config.nudge_min_sample = v;
        }

        config
    }

    /// Parse a (possibly partial) JSON object; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("weakCategoryFloor", self.weak_category_floor)?;
        check_unit("weakItemFloor", self.weak_item_floor)?;
        check_unit("improvementMinGain", self.improvement_min_gain)?;
        check_unit("trapErrorRate", self.trap_error_rate)?;
        check_unit("nudgeAccuracy", self.nudge_accuracy)?;
        check_at_least("studyPlanMax", self.study_plan_max as f64, 1.0)?;
        check_at_least("improvementWindow", self.improvement_window as f64, 1.0)?;
        check_at_least("nudgeWindow", self.nudge_window as f64, 1.0)?;
        check_at_least("nudgeMinSample", self.nudge_min_sample as f64, 1.0)?;
        Ok(())
    }
}
