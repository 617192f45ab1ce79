//! Planar geometry helpers (ray vs circle).

use bevy::prelude::*;

/// Дистанция вдоль луча до пересечения с кругом
///
/// `direction` нормализуется; луч из точки внутри круга попадает на дистанции 0.
/// None: промах или попадание дальше `max_distance`.
pub fn ray_circle_hit(
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    center: Vec2,
    radius: f32,
) -> Option<f32> {
    let direction = direction.normalize_or_zero();
    if direction == Vec2::ZERO {
        return None;
    }

    let to_center = center - origin;
    if to_center.length_squared() <= radius * radius {
        return Some(0.0);
    }

    // Проекция центра на луч
    let along = to_center.dot(direction);
    if along < 0.0 {
        return None;
    }

    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }

    let hit = along - (radius_sq - closest_sq).sqrt();
    (hit <= max_distance).then_some(hit)
}
