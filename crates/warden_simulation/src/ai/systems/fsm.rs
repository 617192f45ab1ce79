//! Guard FSM systems: внешние команды, тик brain'а, публикация событий.
//!
//! Brain видит мир через `EcsGuardEnvironment`: snapshot позиций на начало
//! системы + мутабельные компоненты конкретного guard'а.

use bevy::prelude::*;
use bevy_rapier3d::prelude::LockedAxes;

use crate::ai::brain::geometry::ray_circle_hit;
use crate::ai::brain::{GuardBrain, Indicator, LineOfSight, MotionDriver, RayHit, TargetRegistry};
use crate::ai::components::{Guard, GuardState, IndicatorColor};
use crate::ai::errors::RestraintError;
use crate::ai::events::{GuardCommand, GuardDiagnosticEvent, GuardStateChanged};
use crate::components::{planar, ActiveTarget, BodyRadius, MotionFrozen, PhysicsBody, Target};

/// Guard'ы с мутабельными компонентами, которые трогает brain
pub type GuardQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static mut Guard,
        &'static mut GuardState,
        &'static mut IndicatorColor,
        &'static mut PhysicsBody,
        &'static Transform,
    ),
>;

/// Всё, что участвует в raycast и target registry
pub type ActorQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Transform,
        Option<&'static BodyRadius>,
        Has<Target>,
        Has<PhysicsBody>,
    ),
    Or<(With<BodyRadius>, With<Target>)>,
>;

#[derive(Debug, Clone, Copy)]
struct ActorSnapshot {
    entity: Entity,
    position: Vec2,
    radius: f32,
    is_target: bool,
    has_body: bool,
}

/// Позиции акторов на момент запуска системы
#[derive(Debug, Default)]
pub struct WorldSnapshot {
    actors: Vec<ActorSnapshot>,
    active_target: Option<Entity>,
}

impl WorldSnapshot {
    pub fn capture(actors: &ActorQuery, registry: &ActiveTarget) -> Self {
        let mut snapshot: Vec<ActorSnapshot> = actors
            .iter()
            .map(|(entity, transform, radius, is_target, has_body)| ActorSnapshot {
                entity,
                position: planar(transform.translation),
                radius: radius.copied().unwrap_or_default().0,
                is_target,
                has_body,
            })
            .collect();

        // Порядок query не гарантирован: сортируем для детерминизма raycast'а
        snapshot.sort_by_key(|actor| actor.entity.index());

        Self {
            actors: snapshot,
            active_target: registry.get(),
        }
    }

    fn actor(&self, entity: Entity) -> Option<&ActorSnapshot> {
        self.actors.iter().find(|actor| actor.entity == entity)
    }
}

/// `GuardEnvironment` поверх ECS для одного guard'а
pub struct EcsGuardEnvironment<'a> {
    guard: Entity,
    position: Vec2,
    body: &'a mut PhysicsBody,
    indicator: &'a mut IndicatorColor,
    world: &'a WorldSnapshot,
    /// Цели, которые надо заморозить (применяется через Commands после тика)
    restrained: &'a mut Vec<Entity>,
}

impl TargetRegistry for EcsGuardEnvironment<'_> {
    type Target = Entity;

    fn resolve_active_target(&self) -> Option<Entity> {
        self.world
            .active_target
            .filter(|target| self.world.actor(*target).is_some_and(|actor| actor.is_target))
    }

    fn target_position(&self, target: Entity) -> Option<Vec2> {
        self.world.actor(target).map(|actor| actor.position)
    }
}

impl MotionDriver<Entity> for EcsGuardEnvironment<'_> {
    fn agent_position(&self) -> Vec2 {
        self.position
    }

    fn set_velocity_intent(&mut self, velocity: Vec2) {
        self.body.set_planar_velocity(velocity);
    }

    fn freeze_motion(&mut self, target: Entity) -> Result<(), RestraintError> {
        match self.world.actor(target) {
            Some(actor) if actor.has_body => {
                self.restrained.push(target);
                Ok(())
            }
            _ => Err(RestraintError::NoPhysicsBody),
        }
    }
}

impl LineOfSight<Entity> for EcsGuardEnvironment<'_> {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit<Entity>> {
        self.world
            .actors
            .iter()
            .filter(|actor| actor.entity != self.guard)
            .filter_map(|actor| {
                ray_circle_hit(origin, direction, max_distance, actor.position, actor.radius)
                    .map(|distance| (distance, actor))
            })
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, actor)| {
                if actor.is_target {
                    RayHit::Target(actor.entity)
                } else {
                    RayHit::Obstacle
                }
            })
    }
}

impl Indicator for EcsGuardEnvironment<'_> {
    fn set_indicator_color(&mut self, color: IndicatorColor) {
        *self.indicator = color;
    }
}

/// Система: GuardCommand → request_transition
///
/// Команды идут через те же правила, что и внутренние переходы.
pub fn apply_guard_commands(
    mut commands: Commands,
    mut requests: EventReader<GuardCommand>,
    mut guards: GuardQuery,
    actors: ActorQuery,
    registry: Res<ActiveTarget>,
    mut changes: EventWriter<GuardStateChanged>,
    mut diagnostics: EventWriter<GuardDiagnosticEvent>,
) {
    if requests.is_empty() {
        return;
    }

    let world = WorldSnapshot::capture(&actors, &registry);
    let mut restrained = Vec::new();

    for request in requests.read() {
        let Ok((entity, mut guard, mut state, mut indicator, mut body, transform)) =
            guards.get_mut(request.guard)
        else {
            crate::log_warning(&format!(
                "GuardCommand: {:?} is not a guard (requested {:?})",
                request.guard, request.request
            ));
            continue;
        };

        let mut env = EcsGuardEnvironment {
            guard: entity,
            position: planar(transform.translation),
            body: &mut *body,
            indicator: &mut *indicator,
            world: &world,
            restrained: &mut restrained,
        };
        guard.brain.request_transition(&mut env, request.request);

        state.set_if_neq(guard.brain.state());
        publish(entity, &mut guard.brain, &mut changes, &mut diagnostics);
    }

    restrain_targets(&mut commands, restrained);
}

/// Система: perception tick для всех guard'ов
pub fn tick_guards(
    mut commands: Commands,
    mut guards: GuardQuery,
    actors: ActorQuery,
    registry: Res<ActiveTarget>,
    time: Res<Time<Fixed>>,
    mut changes: EventWriter<GuardStateChanged>,
    mut diagnostics: EventWriter<GuardDiagnosticEvent>,
) {
    let delta = time.delta_secs();
    let world = WorldSnapshot::capture(&actors, &registry);
    let mut restrained = Vec::new();

    for (entity, mut guard, mut state, mut indicator, mut body, transform) in guards.iter_mut() {
        let mut env = EcsGuardEnvironment {
            guard: entity,
            position: planar(transform.translation),
            body: &mut *body,
            indicator: &mut *indicator,
            world: &world,
            restrained: &mut restrained,
        };
        guard.brain.tick(&mut env, delta);

        state.set_if_neq(guard.brain.state());
        publish(entity, &mut guard.brain, &mut changes, &mut diagnostics);
    }

    restrain_targets(&mut commands, restrained);
}

/// Transitions + diagnostics brain'а → events
fn publish(
    guard: Entity,
    brain: &mut GuardBrain<Entity>,
    changes: &mut EventWriter<GuardStateChanged>,
    diagnostics: &mut EventWriter<GuardDiagnosticEvent>,
) {
    for transition in brain.drain_transitions() {
        changes.write(GuardStateChanged {
            guard,
            from: transition.from,
            to: transition.to,
            requested: transition.requested,
        });
    }

    for diagnostic in brain.drain_diagnostics() {
        diagnostics.write(GuardDiagnosticEvent { guard, diagnostic });
    }
}

/// Restraint: MotionFrozen + Rapier LockedAxes
fn restrain_targets(commands: &mut Commands, restrained: Vec<Entity>) {
    for target in restrained {
        let Ok(mut entity) = commands.get_entity(target) else {
            continue;
        };

        entity.try_insert((
            MotionFrozen,
            LockedAxes::TRANSLATION_LOCKED | LockedAxes::ROTATION_LOCKED,
        ));
        crate::log(&format!("Guard: target {:?} restrained", target));
    }
}
