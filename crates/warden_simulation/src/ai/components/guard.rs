//! Guard component: brain + обязательные компоненты

use bevy::prelude::*;

use super::fsm::{GuardState, IndicatorColor};
use crate::ai::brain::GuardBrain;
use crate::ai::config::GuardConfig;
use crate::ai::errors::ConfigurationError;
use crate::components::PhysicsBody;

/// NPC guard
///
/// Brain: источник истины для состояния. `GuardState` компонент зеркалирует
/// `brain.state()` после каждой системы (для query/reflect).
#[derive(Component, Debug)]
#[require(GuardState, IndicatorColor, PhysicsBody, Transform)]
pub struct Guard {
    pub brain: GuardBrain<Entity>,
}

impl Guard {
    pub fn new(config: GuardConfig, seed: u64) -> Result<Self, ConfigurationError> {
        Ok(Self {
            brain: GuardBrain::new(config, seed)?,
        })
    }

    pub fn state(&self) -> GuardState {
        self.brain.state()
    }
}
