//! Motion для guard'ов и целей
//!
//! Архитектура:
//! - AI пишет PhysicsBody.velocity (planar intent)
//! - Headless: интегрируем velocity → Transform сами
//! - С Rapier: синхронизируем PhysicsBody.velocity → Velocity.linvel
//! - MotionFrozen (restraint) обнуляет velocity до интеграции

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::{BodyRadius, MotionFrozen, PhysicsBody, Target};

/// Система: restrained тела не двигаются
pub fn freeze_restrained_bodies(mut query: Query<&mut PhysicsBody, With<MotionFrozen>>) {
    for mut body in query.iter_mut() {
        body.set_if_neq(PhysicsBody::default());
    }
}

/// Система интеграции velocity → Transform (headless режим, без Rapier)
pub fn integrate_velocity_to_transform(
    mut query: Query<(&PhysicsBody, &mut Transform), Without<MotionFrozen>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        // position += velocity * dt
        transform.translation += body.velocity * delta;
    }
}

/// Система: PhysicsBody.velocity → Rapier Velocity
///
/// Только для тел с Rapier Velocity (есть не у всех headless сущностей).
pub fn sync_velocity_to_rapier(mut query: Query<(&PhysicsBody, &mut Velocity)>) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

/// Plugin для motion систем
///
/// Регистрирует системы в FixedUpdate (после AI, см. SimulationSet).
pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                freeze_restrained_bodies,
                integrate_velocity_to_transform,
                sync_velocity_to_rapier,
            )
                .chain() // Последовательное выполнение
                .in_set(crate::SimulationSet::Motion),
        );
    }
}

/// Spawn helper для цели (игрока)
///
/// Создает entity с полным набором компонентов:
/// - Transform
/// - PhysicsBody + BodyRadius (raycast)
/// - Target marker
/// - Rapier Velocity (restraint лочит оси через LockedAxes)
pub fn spawn_target_body(commands: &mut Commands, position: Vec3, velocity: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            PhysicsBody { velocity },
            BodyRadius::default(),
            Target,
            Velocity::default(),
        ))
        .id()
}

/// Spawn helper для статичного препятствия (блокирует line of sight)
pub fn spawn_obstacle(commands: &mut Commands, position: Vec3, radius: f32) -> Entity {
    commands
        .spawn((Transform::from_translation(position), BodyRadius(radius)))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_systems(
                Update,
                (freeze_restrained_bodies, sync_velocity_to_rapier).chain(),
            );
        app
    }

    #[test]
    fn test_frozen_body_loses_velocity() {
        let mut app = motion_app();
        let entity = app
            .world_mut()
            .spawn((
                PhysicsBody {
                    velocity: Vec3::new(4.0, 0.0, 1.0),
                },
                MotionFrozen,
                Velocity::default(),
            ))
            .id();

        app.update();

        let body = app.world().get::<PhysicsBody>(entity).unwrap();
        assert_eq!(body.velocity, Vec3::ZERO);
        let rapier = app.world().get::<Velocity>(entity).unwrap();
        assert_eq!(rapier.linvel, Vec3::ZERO);
    }

    #[test]
    fn test_velocity_synced_to_rapier() {
        let mut app = motion_app();
        let entity = app
            .world_mut()
            .spawn((
                PhysicsBody {
                    velocity: Vec3::new(3.0, 0.0, 0.0),
                },
                Velocity::default(),
            ))
            .id();

        app.update();

        let rapier = app.world().get::<Velocity>(entity).unwrap();
        assert_eq!(rapier.linvel, Vec3::new(3.0, 0.0, 0.0));
    }
}
