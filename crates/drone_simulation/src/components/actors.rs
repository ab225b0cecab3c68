//! Внешние акторы: игрок и враги.
//!
//! Симуляция дрона их только читает — spawn/despawn/движение принадлежат
//! другим системам (player controller, stage spawner).

use bevy::prelude::*;

/// Ось «вперёд» трека раннера (Bevy forward = -Z)
pub const TRACK_FORWARD: Vec3 = Vec3::NEG_Z;

/// Marker component для игрока, которого сопровождает дрон
///
/// В сцене ожидается не больше одного такого entity. Если его нет (ещё не заспавнен) —
/// патруль и поиск целей пропускают свой цикл.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct EscortedPlayer;

/// Враг, которого дрон может взять в lock
///
/// `active = false` — враг умирает (анимация смерти), но entity ещё в мире.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hostile {
    pub active: bool,
}

impl Default for Hostile {
    fn default() -> Self {
        Self { active: true }
    }
}

/// Снимок врага на текущий tick (ListHostiles)
///
/// Lock хранит только `entity` — слабая ссылка, валидность проверяется
/// по наличию в свежем снимке.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostileSnapshot {
    pub entity: Entity,
    pub position: Vec3,
    pub active: bool,
}

impl HostileSnapshot {
    /// Найти врага по handle в снимке
    pub fn find(hostiles: &[HostileSnapshot], entity: Entity) -> Option<&HostileSnapshot> {
        hostiles.iter().find(|h| h.entity == entity)
    }
}

/// Горизонтальная проекция (XZ), Y игнорируется
#[inline]
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Дистанция в горизонтальной плоскости
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}

/// Находится ли точка строго впереди игрока по оси трека
#[inline]
pub fn is_ahead_of(point: Vec3, player: Vec3) -> bool {
    point.dot(TRACK_FORWARD) > player.dot(TRACK_FORWARD)
}

/// Собрать снимок врагов из Query (используется системами дрона и оружия)
pub fn collect_hostiles<'a>(
    iter: impl Iterator<Item = (Entity, &'a Transform, &'a Hostile)>,
) -> Vec<HostileSnapshot> {
    iter.map(|(entity, transform, hostile)| HostileSnapshot {
        entity,
        position: transform.translation,
        active: hostile.active,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 100.0, 4.0);
        assert!((planar_distance(a, b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_is_ahead_of_uses_track_forward() {
        let player = Vec3::new(0.0, 0.0, 10.0);
        assert!(is_ahead_of(Vec3::new(5.0, 0.0, 2.0), player)); // z меньше → впереди
        assert!(!is_ahead_of(Vec3::new(0.0, 0.0, 10.0), player)); // на одной линии — не впереди
        assert!(!is_ahead_of(Vec3::new(0.0, 0.0, 12.0), player));
    }

    #[test]
    fn test_find_snapshot_by_handle() {
        let e1 = Entity::from_raw(1);
        let e2 = Entity::from_raw(2);
        let hostiles = vec![
            HostileSnapshot { entity: e1, position: Vec3::X, active: true },
            HostileSnapshot { entity: e2, position: Vec3::Z, active: false },
        ];

        assert_eq!(HostileSnapshot::find(&hostiles, e2).map(|h| h.position), Some(Vec3::Z));
        assert!(HostileSnapshot::find(&hostiles, Entity::from_raw(3)).is_none());
    }
}
