//! Guard AI module
//!
//! FSM для NPC guard'а: Idle / Warning / Alert / Subdue / Return / Watch / Patrol.
//! - brain: engine-agnostic state machine + perception evaluator
//! - components / systems / events: ECS обвязка brain'а

use bevy::prelude::*;

pub mod brain;
pub mod components;
pub mod config;
pub mod errors;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use brain::{GuardBrain, GuardDiagnostic, Severity, Transition};
pub use components::{Facing, Guard, GuardState, IndicatorColor};
pub use config::{GuardConfig, PatrolMovement};
pub use errors::{ConfigLoadError, ConfigurationError, GuardError, PerceptionError, RestraintError};
pub use events::{GuardCommand, GuardDiagnosticEvent, GuardStateChanged};

use crate::components::BodyRadius;

/// Guard AI Plugin
///
/// Регистрирует guard системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. apply_guard_commands: внешние запросы переходов
/// 2. tick_guards: perception tick (capture → warning → alert → return → patrol)
pub struct GuardAIPlugin;

impl Plugin for GuardAIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GuardCommand>()
            .add_event::<GuardStateChanged>()
            .add_event::<GuardDiagnosticEvent>()
            .init_resource::<crate::components::ActiveTarget>()
            .register_type::<GuardState>()
            .register_type::<IndicatorColor>()
            .add_systems(
                FixedUpdate,
                (systems::apply_guard_commands, systems::tick_guards)
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(crate::SimulationSet::Ai),
            );
    }
}

/// Spawn helper для guard'а
///
/// Конфиг валидируется здесь: невалидный guard не спавнится.
/// `seed` используется если в конфиге нет `rng_seed`.
pub fn spawn_guard(
    commands: &mut Commands,
    position: Vec3,
    config: GuardConfig,
    seed: u64,
) -> Result<Entity, ConfigurationError> {
    let guard = Guard::new(config, seed)?;

    Ok(commands
        .spawn((
            guard,
            Transform::from_translation(position),
            BodyRadius::default(),
        ))
        .id())
}
