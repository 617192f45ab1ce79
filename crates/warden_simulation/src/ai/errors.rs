//! Guard error taxonomy (configuration vs perception).
//!
//! Ни одна ошибка не поднимается наружу как panic: всё уходит в diagnostic sink
//! (logger + `GuardDiagnostic`), агент продолжает работать в fallback состоянии.

use thiserror::Error;

use super::components::GuardState;

/// Ошибки конфигурации guard'а
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("patrol requested for a guard that cannot patrol, redirected to Watch")]
    PatrolDisabled,

    #[error("patrol requested with an empty waypoint list, redirected to Watch")]
    NoPatrolWaypoints,

    #[error("subdue target has no controllable motion component")]
    TargetNotRestrainable,

    #[error("alert_check_count must be within {min}..={max}, got {value}")]
    AlertChecksOutOfRange { value: u32, min: u32, max: u32 },

    #[error("min_wait ({min_wait}) is greater than max_wait ({max_wait})")]
    InvalidWaitRange { min_wait: f32, max_wait: f32 },

    #[error("{field} must not be negative, got {value}")]
    NegativeValue { field: &'static str, value: f32 },

    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
}

/// Ошибки восприятия (цель не найдена в registry)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PerceptionError {
    #[error("no active target resolved on entry to {state:?}, transition aborted")]
    TargetUnresolved { state: GuardState },
}

/// Отказ физического коллаборатора заморозить цель
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RestraintError {
    #[error("target has no physics body")]
    NoPhysicsBody,
}

/// Общая ошибка guard'а (то, что попадает в diagnostic sink)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuardError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Perception(#[from] PerceptionError),
}

/// Ошибка загрузки конфигурации из файла/строки
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read guard config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse guard config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid guard config: {0}")]
    Invalid(#[from] ConfigurationError),
}
