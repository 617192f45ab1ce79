//! World компоненты: цели, target registry, planar проекция

use bevy::prelude::*;

/// Маркер сущности, которую guard может обнаружить и задержать
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Target;

/// Target registry: кого guard'ы считают текущей целью
///
/// Один слот на мир (аналог "игрок"). None: цели нет, переходы
/// в Warning/Alert/Subdue отменяются.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveTarget(pub Option<Entity>);

impl ActiveTarget {
    pub fn set(&mut self, target: Entity) {
        self.0 = Some(target);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn get(&self) -> Option<Entity> {
        self.0
    }
}

/// World position → planar (X, Z)
pub fn planar(translation: Vec3) -> Vec2 {
    Vec2::new(translation.x, translation.z)
}

/// Planar → world position с заданной высотой
pub fn from_planar(planar: Vec2, y: f32) -> Vec3 {
    Vec3::new(planar.x, y, planar.y)
}
