//! Movement компоненты: velocity тела, restraint, размер для raycast

use bevy::prelude::*;

/// Физическое тело с нашей velocity (интегрируется в physics системах)
///
/// XZ: плоскость движения, Y: вертикаль (guard её не трогает).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
}

impl PhysicsBody {
    /// Горизонтальная velocity из planar intent (Y сохраняется)
    pub fn set_planar_velocity(&mut self, planar: Vec2) {
        self.velocity.x = planar.x;
        self.velocity.z = planar.y;
    }

    pub fn planar_velocity(&self) -> Vec2 {
        Vec2::new(self.velocity.x, self.velocity.z)
    }
}

/// Тело обездвижено (restraint после Subdue)
///
/// Снимается только внешним кодом: сам guard restraint не отпускает.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MotionFrozen;

/// Радиус тела для line-of-sight проверок (метры)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BodyRadius(pub f32);

impl Default for BodyRadius {
    fn default() -> Self {
        Self(0.5)
    }
}
