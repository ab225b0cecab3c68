//! Burst-стрельба дрона: N выстрелов с интервалом, потом пауза.
//!
//! Решает только КОГДА и КУДА стрелять. Сам снаряд (полёт, коллизии) —
//! внешняя система, подписанная на `ShotFired`.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::drone::config::finite_or;

/// Параметры оружия дрона
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct DroneWeapon {
    /// Пауза между началами очередей (секунды)
    pub burst_interval: f32,
    pub shots_per_burst: u32,
    /// Интервал между выстрелами внутри очереди (секунды)
    pub shot_spacing: f32,
    pub damage: u32,
    /// Полный угол разброса (градусы), 0 = идеальная точность
    pub aim_spread_angle: f32,
    pub projectile_speed: f32,
    /// Стрельба строго горизонтально (Y направления обнуляется)
    pub flat_shot: bool,
    /// Снаряд доворачивает к цели сам
    pub homing: bool,
    /// Смещение дула в локальных координатах дрона
    pub muzzle_offset: [f32; 3],
}

impl Default for DroneWeapon {
    fn default() -> Self {
        Self {
            burst_interval: 2.0,
            shots_per_burst: 3,
            shot_spacing: 0.1,
            damage: 5,
            aim_spread_angle: 3.0,
            projectile_speed: 20.0,
            flat_shot: false,
            homing: false,
            muzzle_offset: [0.0, 0.0, -0.5],
        }
    }
}

impl DroneWeapon {
    /// Зажать параметры в рабочие диапазоны (NaN/inf → default)
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut w = self.clone();

        w.burst_interval = finite_or(w.burst_interval, defaults.burst_interval).max(0.0);
        w.shot_spacing = finite_or(w.shot_spacing, defaults.shot_spacing).max(0.0);
        w.aim_spread_angle = finite_or(w.aim_spread_angle, defaults.aim_spread_angle).clamp(0.0, 180.0);
        w.projectile_speed = finite_or(w.projectile_speed, defaults.projectile_speed).max(0.0);
        for (axis, fallback) in w.muzzle_offset.iter_mut().zip(defaults.muzzle_offset) {
            *axis = finite_or(*axis, fallback);
        }

        w
    }

    pub fn muzzle(&self, transform: &Transform) -> Vec3 {
        transform.translation + transform.rotation * Vec3::from_array(self.muzzle_offset)
    }
}

/// Runtime состояние очереди
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponState {
    /// До следующей очереди (0 — готов, первая очередь сразу при наличии цели)
    pub cooldown: f32,
    /// Сколько выстрелов осталось в текущей очереди
    pub shots_left: u32,
    /// До следующего выстрела внутри очереди
    pub shot_timer: f32,
    /// Цель, захваченная в начале очереди
    pub burst_target: Option<Entity>,
}

impl WeaponState {
    pub fn is_bursting(&self) -> bool {
        self.shots_left > 0
    }

    /// Продвинуть таймеры; вернуть число выстрелов, которые нужно сделать в этом tick.
    ///
    /// Новая очередь начинается только при наличии цели и истёкшем cooldown;
    /// начатая очередь доигрывается, даже если lock уже потерян.
    pub fn advance(&mut self, weapon: &DroneWeapon, dt: f32, target: Option<Entity>) -> u32 {
        let dt = dt.max(0.0);
        self.cooldown = (self.cooldown - dt).max(0.0);

        let mut due = 0;
        if self.shots_left > 0 {
            self.shot_timer -= dt;
            due += self.drain_due_shots(weapon);
        }

        if self.shots_left == 0 && self.cooldown <= 0.0 {
            if let Some(target) = target {
                self.cooldown = weapon.burst_interval;
                self.burst_target = Some(target);
                self.shots_left = weapon.shots_per_burst;
                self.shot_timer = 0.0;
                due += self.drain_due_shots(weapon);
            }
        }

        due
    }

    fn drain_due_shots(&mut self, weapon: &DroneWeapon) -> u32 {
        let mut due = 0;
        while self.shots_left > 0 && self.shot_timer <= 0.0 {
            due += 1;
            self.shots_left -= 1;
            self.shot_timer += weapon.shot_spacing;
        }
        if self.shots_left == 0 {
            self.shot_timer = 0.0;
        }
        due
    }

    /// Stage reset: очередь обрывается, следующая — через полный burst_interval
    pub fn reset(&mut self, weapon: &DroneWeapon) {
        self.cooldown = weapon.burst_interval;
        self.shots_left = 0;
        self.shot_timer = 0.0;
        self.burst_target = None;
    }
}

/// Направление выстрела: к цели (если она ещё есть) или вдоль forward, плюс разброс.
pub fn shot_direction(
    origin: Vec3,
    target_position: Option<Vec3>,
    forward: Vec3,
    weapon: &DroneWeapon,
    rng: &mut impl Rng,
) -> Vec3 {
    let mut direction = target_position.map(|p| p - origin).unwrap_or(forward);
    if weapon.flat_shot {
        direction.y = 0.0;
    }
    let direction = direction.try_normalize().unwrap_or(forward);

    if !weapon.aim_spread_angle.is_finite() || weapon.aim_spread_angle <= 0.0 {
        return direction;
    }

    let half = weapon.aim_spread_angle * 0.5;
    let yaw = rng.gen_range(-half..=half).to_radians();
    let pitch = rng.gen_range(-half..=half).to_radians();
    let jitter = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);

    (jitter * direction).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_no_target_no_burst() {
        let weapon = DroneWeapon::default();
        let mut state = WeaponState::default();

        for _ in 0..300 {
            assert_eq!(state.advance(&weapon, DT, None), 0);
        }
        assert!(!state.is_bursting());
    }

    #[test]
    fn test_burst_fires_shots_with_spacing_then_waits() {
        let weapon = DroneWeapon::default(); // 3 выстрела, 0.1с, пауза 2с
        let mut state = WeaponState::default();
        let target = Some(Entity::from_raw(1));

        let mut fired_at = Vec::new();
        for tick in 0..240 {
            let shots = state.advance(&weapon, DT, target);
            for _ in 0..shots {
                fired_at.push(tick);
            }
        }

        // 4 секунды: две очереди по 3 выстрела
        assert_eq!(fired_at.len(), 6);
        assert_eq!(fired_at[0], 0); // первая очередь сразу
        assert!(fired_at[1] >= 5 && fired_at[1] <= 7);
        assert!(fired_at[3] >= 119 && fired_at[3] <= 121);
    }

    #[test]
    fn test_started_burst_finishes_after_lock_loss() {
        let weapon = DroneWeapon::default();
        let mut state = WeaponState::default();

        assert_eq!(state.advance(&weapon, DT, Some(Entity::from_raw(1))), 1);
        let mut rest = 0;
        for _ in 0..30 {
            rest += state.advance(&weapon, DT, None);
        }
        assert_eq!(rest, 2);
        assert_eq!(state.burst_target, Some(Entity::from_raw(1)));
    }

    #[test]
    fn test_reset_cancels_burst_and_delays_next() {
        let weapon = DroneWeapon::default();
        let mut state = WeaponState::default();
        let target = Some(Entity::from_raw(1));

        state.advance(&weapon, DT, target);
        assert!(state.is_bursting());

        state.reset(&weapon);
        assert!(!state.is_bursting());
        assert_eq!(state.cooldown, weapon.burst_interval);

        // Пока не прошёл burst_interval — тишина
        for _ in 0..110 {
            assert_eq!(state.advance(&weapon, DT, target), 0);
        }
    }

    #[test]
    fn test_shot_direction_toward_target_within_spread() {
        let weapon = DroneWeapon::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let origin = Vec3::new(0.0, 2.0, 0.0);
        let target = Vec3::new(0.0, 2.0, -10.0);

        for _ in 0..500 {
            let dir = shot_direction(origin, Some(target), Vec3::NEG_Z, &weapon, &mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-4);
            // yaw и pitch по ±1.5° → отклонение не больше ~2.2°
            assert!(dir.angle_between(Vec3::NEG_Z).to_degrees() <= 2.2);
        }
    }

    #[test]
    fn test_sanitized_replaces_non_finite_and_negative_values() {
        let weapon = DroneWeapon {
            burst_interval: -1.0,
            shot_spacing: f32::NAN,
            aim_spread_angle: f32::NAN,
            projectile_speed: f32::INFINITY,
            muzzle_offset: [f32::NAN, 0.2, -0.5],
            ..Default::default()
        };

        let clean = weapon.sanitized();
        assert_eq!(clean.burst_interval, 0.0);
        assert_eq!(clean.shot_spacing, 0.1);
        assert_eq!(clean.aim_spread_angle, 3.0);
        assert_eq!(clean.projectile_speed, 20.0);
        assert_eq!(clean.muzzle_offset, [0.0, 0.2, -0.5]);

        let wide = DroneWeapon { aim_spread_angle: 720.0, ..Default::default() }.sanitized();
        assert_eq!(wide.aim_spread_angle, 180.0);

        assert_eq!(DroneWeapon::default().sanitized(), DroneWeapon::default());
    }

    #[test]
    fn test_nan_spread_shoots_straight_without_panic() {
        let weapon = DroneWeapon { aim_spread_angle: f32::NAN, ..Default::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let dir = shot_direction(Vec3::ZERO, Some(Vec3::new(0.0, 0.0, -10.0)), Vec3::NEG_Z, &weapon, &mut rng);
        assert!((dir - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_flat_shot_without_spread_is_horizontal() {
        let weapon = DroneWeapon {
            flat_shot: true,
            aim_spread_angle: 0.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let dir = shot_direction(Vec3::new(0.0, 3.0, 0.0), Some(Vec3::new(3.0, 0.0, -4.0)), Vec3::NEG_Z, &weapon, &mut rng);
        assert_eq!(dir.y, 0.0);
        assert!((dir - Vec3::new(0.6, 0.0, -0.8)).length() < 1e-5);

        // Цели нет — вдоль forward
        let dir = shot_direction(Vec3::ZERO, None, Vec3::X, &weapon, &mut rng);
        assert_eq!(dir, Vec3::X);
    }
}
