//! Guard tuning (static per-agent config, неизменяемый после создания brain).
//!
//! Загружается один раз до первого тика: из кода (`Default` + builder-поля) или из JSON.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::errors::{ConfigLoadError, ConfigurationError};

/// Минимум/максимум re-check раундов после потери цели
pub const MIN_ALERT_CHECKS: u32 = 2;
pub const MAX_ALERT_CHECKS: u32 = 10;

/// Политика patrol movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatrolMovement {
    /// Движение к patrol точке только в Patrol state
    #[default]
    Gated,
    /// Движение к patrol точке в любом состоянии, пока destination не очищен
    Leaky,
}

/// Параметры guard'а
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Скорость движения (units/sec)
    pub move_speed: f32,
    /// Радиус в котором цель считается "видимой" для Alert
    pub alert_distance: f32,
    /// Радиус захвата (и длина forward raycast в Warning)
    pub catch_distance: f32,
    /// Границы случайного ожидания в Idle (секунды)
    pub min_wait: f32,
    pub max_wait: f32,
    /// Сколько раз перепроверяем цель после потери в Alert
    pub alert_check_count: u32,
    /// Длительность одного re-check раунда (секунды)
    pub alert_check_interval: f32,
    /// Дистанция "прибыли" к точке
    pub arrival_radius: f32,
    pub can_patrol: bool,
    pub patrol_waypoints: Vec<Vec2>,
    /// Пост, куда guard возвращается после Return
    pub return_position: Vec2,
    pub patrol_movement: PatrolMovement,
    /// Seed для ожидания/выбора waypoint (None → seed из DeterministicRng)
    pub rng_seed: Option<u64>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            alert_distance: 5.0,
            catch_distance: 1.0,
            min_wait: 1.0,
            max_wait: 3.0,
            alert_check_count: 3,
            alert_check_interval: 1.0,
            arrival_radius: 1.0,
            can_patrol: false,
            patrol_waypoints: Vec::new(),
            return_position: Vec2::ZERO,
            patrol_movement: PatrolMovement::Gated,
            rng_seed: None,
        }
    }
}

impl GuardConfig {
    /// Парсит JSON и валидирует
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        let config: GuardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn with_patrol(mut self, waypoints: Vec<Vec2>) -> Self {
        self.can_patrol = true;
        self.patrol_waypoints = waypoints;
        self
    }

    pub fn with_return_position(mut self, position: Vec2) -> Self {
        self.return_position = position;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Проверяет инварианты конфигурации
    ///
    /// Пустой список waypoint'ов не ошибка здесь: он ловится при входе в Patrol.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let scalars = [
            ("move_speed", self.move_speed),
            ("alert_distance", self.alert_distance),
            ("catch_distance", self.catch_distance),
            ("min_wait", self.min_wait),
            ("max_wait", self.max_wait),
            ("alert_check_interval", self.alert_check_interval),
            ("arrival_radius", self.arrival_radius),
        ];

        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(ConfigurationError::NegativeValue { field, value });
            }
        }

        let positions = self
            .patrol_waypoints
            .iter()
            .chain(std::iter::once(&self.return_position));
        for position in positions {
            if !position.is_finite() {
                return Err(ConfigurationError::NonFinite { field: "position" });
            }
        }

        if !(MIN_ALERT_CHECKS..=MAX_ALERT_CHECKS).contains(&self.alert_check_count) {
            return Err(ConfigurationError::AlertChecksOutOfRange {
                value: self.alert_check_count,
                min: MIN_ALERT_CHECKS,
                max: MAX_ALERT_CHECKS,
            });
        }

        if self.min_wait > self.max_wait {
            return Err(ConfigurationError::InvalidWaitRange {
                min_wait: self.min_wait,
                max_wait: self.max_wait,
            });
        }

        Ok(())
    }
}
