//! ECS Components для сущностей симуляции
//!
//! Организация по доменам:
//! - movement: тело и его velocity (PhysicsBody, MotionFrozen, BodyRadius)
//! - world: цели и registry (Target, ActiveTarget), planar проекция

pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use movement::*;
pub use world::*;
