//! Guard events: входящие команды и исходящие уведомления
//!
//! GuardCommand: внешний код (debug triggers, скрипты) просит переход.
//! GuardStateChanged / GuardDiagnosticEvent: brain → остальной мир.

use bevy::prelude::*;

use crate::ai::brain::GuardDiagnostic;
use crate::ai::components::GuardState;

/// Запрос перехода для конкретного guard'а
///
/// Проходит через те же правила, что и внутренние переходы
/// (Patrol redirect, отмена без цели).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardCommand {
    pub guard: Entity,
    pub request: GuardState,
}

/// Применённый переход
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardStateChanged {
    pub guard: Entity,
    pub from: GuardState,
    pub to: GuardState,
    /// Что просили (Patrol при redirect в Watch)
    pub requested: GuardState,
}

/// Configuration / perception report
#[derive(Event, Debug, Clone, PartialEq)]
pub struct GuardDiagnosticEvent {
    pub guard: Entity,
    pub diagnostic: GuardDiagnostic,
}
