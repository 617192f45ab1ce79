//! Physics simulation module
//!
//! Интеграция velocity, restraint, синхронизация с Rapier.

pub mod movement;

// Re-export основных типов
pub use movement::{
    freeze_restrained_bodies, integrate_velocity_to_transform, spawn_obstacle, spawn_target_body,
    sync_velocity_to_rapier, MotionPlugin,
};
