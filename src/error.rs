use thiserror::Error;

/// Problems with a curriculum phase table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurriculumError {
    #[error("curriculum table is empty")]
    Empty,
    #[error("duplicate phase id: {0}")]
    DuplicatePhaseId(String),
    #[error("phase {phase} lowers the mastery gate to {gate} (previous {previous})")]
    DecreasingMasteryGate {
        phase: String,
        gate: i64,
        previous: i64,
    },
    #[error("phase {phase} lowers the accuracy gate to {gate} (previous {previous})")]
    DecreasingAccuracyGate {
        phase: String,
        gate: f64,
        previous: f64,
    },
    #[error("phase {phase} has mastery gate {gate} below zero")]
    NegativeMasteryGate { phase: String, gate: i64 },
    #[error("phase {phase} has accuracy gate {gate} outside [0, 1]")]
    AccuracyGateOutOfRange { phase: String, gate: f64 },
}

/// Problems with engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Curriculum(#[from] CurriculumError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
