//! In-memory environment для headless сценариев без ECS.
//!
//! Простая "физика": позиция агента интегрируется из velocity intent в `integrate`.
//! Используется в тестах brain'а и в интеграционных сценариях.

use bevy::prelude::*;

use super::environment::{Indicator, LineOfSight, MotionDriver, RayHit, TargetRegistry};
use super::geometry::ray_circle_hit;
use crate::ai::components::IndicatorColor;
use crate::ai::errors::RestraintError;

/// Цель в sandbox'е
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxTarget {
    pub id: u32,
    pub position: Vec2,
    pub radius: f32,
    /// Есть ли физическое тело (можно заморозить)
    pub has_body: bool,
    pub frozen: bool,
}

/// Препятствие для raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SandboxObstacle {
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SandboxEnvironment {
    pub agent_position: Vec2,
    pub velocity: Vec2,
    /// Что вернёт registry (id цели)
    pub active_target: Option<u32>,
    pub targets: Vec<SandboxTarget>,
    pub obstacles: Vec<SandboxObstacle>,
    pub indicator: IndicatorColor,
    /// Сколько раз вызывался resolve (для проверки entry actions)
    pub resolve_calls: std::cell::Cell<u32>,
}

impl SandboxEnvironment {
    pub fn new(agent_position: Vec2) -> Self {
        Self {
            agent_position,
            ..Default::default()
        }
    }

    /// Добавляет цель и делает её активной в registry
    pub fn with_target(mut self, id: u32, position: Vec2) -> Self {
        self.targets.push(SandboxTarget {
            id,
            position,
            radius: 0.5,
            has_body: true,
            frozen: false,
        });
        self.active_target = Some(id);
        self
    }

    pub fn with_obstacle(mut self, position: Vec2, radius: f32) -> Self {
        self.obstacles.push(SandboxObstacle { position, radius });
        self
    }

    pub fn target(&self, id: u32) -> Option<&SandboxTarget> {
        self.targets.iter().find(|target| target.id == id)
    }

    pub fn target_mut(&mut self, id: u32) -> Option<&mut SandboxTarget> {
        self.targets.iter_mut().find(|target| target.id == id)
    }

    pub fn move_target(&mut self, id: u32, position: Vec2) {
        if let Some(target) = self.target_mut(id) {
            if !target.frozen {
                target.position = position;
            }
        }
    }

    pub fn remove_target(&mut self, id: u32) {
        self.targets.retain(|target| target.id != id);
    }

    /// position += velocity * dt
    pub fn integrate(&mut self, delta: f32) {
        self.agent_position += self.velocity * delta;
    }
}

impl TargetRegistry for SandboxEnvironment {
    type Target = u32;

    fn resolve_active_target(&self) -> Option<u32> {
        self.resolve_calls.set(self.resolve_calls.get() + 1);
        self.active_target
            .filter(|id| self.targets.iter().any(|target| target.id == *id))
    }

    fn target_position(&self, target: u32) -> Option<Vec2> {
        self.target(target).map(|target| target.position)
    }
}

impl MotionDriver<u32> for SandboxEnvironment {
    fn agent_position(&self) -> Vec2 {
        self.agent_position
    }

    fn set_velocity_intent(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn freeze_motion(&mut self, target: u32) -> Result<(), RestraintError> {
        match self.target_mut(target) {
            Some(target) if target.has_body => {
                target.frozen = true;
                Ok(())
            }
            _ => Err(RestraintError::NoPhysicsBody),
        }
    }
}

impl LineOfSight<u32> for SandboxEnvironment {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit<u32>> {
        let targets = self.targets.iter().filter_map(|target| {
            ray_circle_hit(origin, direction, max_distance, target.position, target.radius)
                .map(|distance| (distance, RayHit::Target(target.id)))
        });
        let obstacles = self.obstacles.iter().filter_map(|obstacle| {
            ray_circle_hit(origin, direction, max_distance, obstacle.position, obstacle.radius)
                .map(|distance| (distance, RayHit::Obstacle))
        });

        targets
            .chain(obstacles)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, hit)| hit)
    }
}

impl Indicator for SandboxEnvironment {
    fn set_indicator_color(&mut self, color: IndicatorColor) {
        self.indicator = color;
    }
}
