//! Warden Simulation Core
//!
//! NPC guard FSM на Bevy 0.16 (headless ECS).
//! - ai: guard brain (state machine + perception) и его ECS обвязка
//! - components: тела, цели, target registry
//! - physics: интеграция velocity, restraint, Rapier sync

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod logger;
pub mod physics;

// Re-export базовых типов для удобства
pub use ai::{
    spawn_guard, Facing, Guard, GuardAIPlugin, GuardBrain, GuardCommand, GuardConfig,
    GuardDiagnostic, GuardDiagnosticEvent, GuardState, GuardStateChanged, IndicatorColor,
    PatrolMovement, Severity,
};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{spawn_obstacle, spawn_target_body, MotionPlugin};

/// Порядок подсистем внутри FixedUpdate
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Guard команды + perception tick (пишут velocity intent)
    Ai,
    /// Restraint + интеграция velocity
    Motion,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<DeterministicRng>()
            .register_type::<PhysicsBody>()
            .register_type::<MotionFrozen>()
            .register_type::<BodyRadius>()
            .register_type::<Target>()
            .configure_sets(FixedUpdate, (SimulationSet::Ai, SimulationSet::Motion).chain())
            .add_plugins((GuardAIPlugin, MotionPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Раздаёт seed'ы guard'ам при спавне.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Следующий seed для guard brain'а
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// SimulationPlugin не добавляется: тесты и demo решают сами.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
