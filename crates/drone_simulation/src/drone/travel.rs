//! Travel: перелёт в горизонтальной плоскости.
//!
//! Позиция считается из прошедшего времени (eased интерполяция X и Z),
//! а не интеграцией скорости. Y перелёт не трогает — им владеет hover.

use bevy::prelude::*;

use super::config::{DroneConfig, LEASH_PULL_IN, MIN_TRANSIT_DURATION};
use super::hover::ease_in_out_sine;
use crate::components::{planar, planar_distance};

/// Активный перелёт start → goal (XZ)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Transit {
    pub start: Vec2,
    pub goal: Vec2,
    pub duration: f32,
    pub elapsed: f32,
}

impl Transit {
    /// Длительность = max(0.2, d / speed)
    pub fn begin(from: Vec3, goal: Vec3, move_speed: f32) -> Self {
        let start = planar(from);
        let goal = planar(goal);
        let distance = start.distance(goal);

        Self {
            start,
            goal,
            duration: (distance / move_speed.max(f32::EPSILON)).max(MIN_TRANSIT_DURATION),
            elapsed: 0.0,
        }
    }

    /// Текущая точка на eased кривой
    pub fn position(&self) -> Vec2 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.start.lerp(self.goal, ease_in_out_sine(t))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Продвинуть и вернуть новую XZ позицию
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.position()
    }
}

/// Записать XZ в translation, Y не трогаем
pub fn apply_planar(translation: &mut Vec3, xz: Vec2) {
    translation.x = xz.x;
    translation.z = xz.y;
}

/// Цель следующего перелёта.
///
/// Обычно — patrol точка. Если дрон дальше tether от игрока, цель переносится на
/// линию игрок→дрон на расстояние `0.6 * tether` от игрока (корректируется цель,
/// не позиция). Без patrol точки дрон держит текущее место.
pub fn choose_goal(
    position: Vec3,
    patrol_point: Option<Vec3>,
    player: Option<Vec3>,
    config: &DroneConfig,
) -> Vec3 {
    let goal = patrol_point.unwrap_or(position);

    let Some(player) = player else {
        return goal;
    };

    let tether = config.max_distance_from_player;
    if planar_distance(position, player) <= tether {
        return goal;
    }

    let away = (planar(position) - planar(player)).normalize_or_zero();
    let pulled = planar(player) + away * (tether * LEASH_PULL_IN);
    Vec3::new(pulled.x, position.y, pulled.y)
}
