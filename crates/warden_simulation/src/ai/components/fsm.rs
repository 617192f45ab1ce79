//! FSM guard components (state set, transition table, entry-action table).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Состояния guard FSM
///
/// Переход только через `GuardBrain::request_transition` (никаких прямых присваиваний).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum GuardState {
    /// Idle: стоим и ждём случайное время, потом перезапускаем ожидание
    Idle,

    /// Warning: идём к последней известной позиции цели
    Warning,

    /// Alert: преследуем цель напрямую
    Alert,

    /// Subdue: цель поймана, её движение заморожено
    Subdue,

    /// Return: возвращаемся на пост
    Return,

    /// Watch: пассивное состояние (fallback для ошибок конфигурации)
    Watch,

    /// Patrol: идём к случайной точке маршрута
    Patrol,
}

impl Default for GuardState {
    fn default() -> Self {
        Self::Idle
    }
}

impl GuardState {
    pub const ALL: [GuardState; 7] = [
        GuardState::Idle,
        GuardState::Warning,
        GuardState::Alert,
        GuardState::Subdue,
        GuardState::Return,
        GuardState::Watch,
        GuardState::Patrol,
    ];

    /// Требует ли состояние разрешённую цель при входе
    pub fn requires_target(self) -> bool {
        matches!(self, GuardState::Warning | GuardState::Alert | GuardState::Subdue)
    }

    /// Entry action table (one-time логика при входе в состояние)
    pub fn entry_action(self) -> EntryAction {
        match self {
            GuardState::Idle => EntryAction::SampleIdleWait,
            GuardState::Warning => EntryAction::CaptureLastKnownPosition,
            GuardState::Alert => EntryAction::ResolveTarget,
            GuardState::Subdue => EntryAction::RestrainTarget,
            GuardState::Return => EntryAction::AnnounceReturn,
            GuardState::Watch => EntryAction::Nothing,
            GuardState::Patrol => EntryAction::PickWaypoint,
        }
    }

    /// Debug indicator color (None = оставить текущий)
    pub fn indicator(self) -> Option<IndicatorColor> {
        match self {
            GuardState::Idle => Some(IndicatorColor::Blue),
            GuardState::Warning => Some(IndicatorColor::Yellow),
            GuardState::Alert => Some(IndicatorColor::Red),
            GuardState::Subdue => Some(IndicatorColor::Black),
            GuardState::Return => Some(IndicatorColor::Green),
            GuardState::Watch => None,
            GuardState::Patrol => Some(IndicatorColor::Cyan),
        }
    }

    /// Участвует ли состояние в capture check
    pub fn can_capture(self) -> bool {
        self != GuardState::Subdue
    }
}

/// Что делает состояние при входе
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    SampleIdleWait,
    CaptureLastKnownPosition,
    ResolveTarget,
    RestrainTarget,
    AnnounceReturn,
    Nothing,
    PickWaypoint,
}

/// Результат transition table для запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRule {
    /// Запрос применяется как есть
    Accept(GuardState),
    /// Запрос заменён (policy correction, не ошибка)
    Redirect {
        requested: GuardState,
        applied: GuardState,
    },
}

impl TransitionRule {
    pub fn applied(self) -> GuardState {
        match self {
            TransitionRule::Accept(state) => state,
            TransitionRule::Redirect { applied, .. } => applied,
        }
    }
}

/// Transition table: Patrol без `can_patrol` → Watch, всё остальное принимается
pub fn transition_rule(requested: GuardState, can_patrol: bool) -> TransitionRule {
    match requested {
        GuardState::Patrol if !can_patrol => TransitionRule::Redirect {
            requested,
            applied: GuardState::Watch,
        },
        state => TransitionRule::Accept(state),
    }
}

/// Цвет debug-индикатора (чисто косметика)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum IndicatorColor {
    #[default]
    White,
    Blue,
    Yellow,
    Red,
    Black,
    Green,
    Cyan,
}

/// Направление взгляда по оси X
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Знак facing (-1 / +1)
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing из x-компоненты направления; при x == 0 остаётся `current`
    pub fn from_direction(direction: Vec2, current: Facing) -> Facing {
        if direction.x > 0.0 {
            Facing::Right
        } else if direction.x < 0.0 {
            Facing::Left
        } else {
            current
        }
    }

    /// Ось взгляда (для forward raycast)
    pub fn axis(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }
}
