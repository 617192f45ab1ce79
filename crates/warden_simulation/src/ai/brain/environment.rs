//! Collaborator boundary: всё, что guard brain делает с миром, идёт через эти traits.
//!
//! Brain не хранит ссылку на мир: environment передаётся в каждый вызов
//! (`tick`, `request_transition`). Никаких глобальных registry.

use bevy::prelude::*;

use crate::ai::components::IndicatorColor;
use crate::ai::errors::RestraintError;

/// Handle цели (weak reference: brain никогда не владеет целью)
pub trait TargetHandle: Copy + Eq + std::fmt::Debug {}

impl<T: Copy + Eq + std::fmt::Debug> TargetHandle for T {}

/// Registry "текущей цели"
pub trait TargetRegistry {
    type Target: TargetHandle;

    /// Вызывается при входе в Warning, Alert, Subdue
    fn resolve_active_target(&self) -> Option<Self::Target>;

    /// None = цель исчезла (handle протух)
    fn target_position(&self, target: Self::Target) -> Option<Vec2>;
}

/// Физический коллаборатор: позиция агента, velocity request, заморозка цели
pub trait MotionDriver<T> {
    /// Authoritative позиция (владеет физика, brain только читает)
    fn agent_position(&self) -> Vec2;

    /// Единственный канал, через который brain влияет на позицию
    fn set_velocity_intent(&mut self, velocity: Vec2);

    /// Subdue: заморозить всё движение цели
    fn freeze_motion(&mut self, target: T) -> Result<(), RestraintError>;
}

/// Что зацепил raycast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayHit<T> {
    Target(T),
    Obstacle,
}

impl<T> RayHit<T> {
    pub fn is_target(&self) -> bool {
        matches!(self, RayHit::Target(_))
    }
}

/// Line-of-sight query
pub trait LineOfSight<T> {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit<T>>;
}

/// Debug indicator (косметика)
pub trait Indicator {
    fn set_indicator_color(&mut self, color: IndicatorColor);
}

/// Полный набор коллабораторов guard'а
pub trait GuardEnvironment<T: TargetHandle>:
    TargetRegistry<Target = T> + MotionDriver<T> + LineOfSight<T> + Indicator
{
}

impl<T, E> GuardEnvironment<T> for E
where
    T: TargetHandle,
    E: TargetRegistry<Target = T> + MotionDriver<T> + LineOfSight<T> + Indicator,
{
}
