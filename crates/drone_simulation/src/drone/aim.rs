//! Aim: поворот дрона к цели или спокойный idle.
//!
//! Оба режима — slerp с фиксированной скоростью, поэтому угловая скорость
//! ограничена и поворот никогда не «щёлкает».

use bevy::prelude::*;

use super::config::{ENGAGED_SLERP_RATE, IDLE_SLERP_RATE, IDLE_YAW_LIMIT_DEG};

/// Угол (градусы) в диапазон (-180, 180]
pub fn normalize_angle(degrees: f32) -> f32 {
    let mut a = degrees % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Look rotation от `from` к `to` (up = +Y).
///
/// Совпадающие точки дают Bevy fallback (взгляд вдоль -Z).
pub fn look_rotation(from: Vec3, to: Vec3) -> Quat {
    Transform::from_translation(from).looking_to(to - from, Vec3::Y).rotation
}

/// Pitch look rotation в градусах, нормализованный
pub fn pitch_degrees(rotation: Quat) -> f32 {
    let (_, pitch, _) = rotation.to_euler(EulerRot::YXZ);
    normalize_angle(pitch.to_degrees())
}

/// Yaw в градусах, нормализованный
pub fn yaw_degrees(rotation: Quat) -> f32 {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    normalize_angle(yaw.to_degrees())
}

/// Укладывается ли требуемый pitch в потолок
pub fn pitch_within_limit(look: Quat, max_pitch_degrees: f32) -> bool {
    pitch_degrees(look).abs() <= max_pitch_degrees
}

/// Engaged: slerp к look rotation
pub fn track_target(current: Quat, look: Quat, dt: f32) -> Quat {
    let t = (dt * ENGAGED_SLERP_RATE).clamp(0.0, 1.0);
    current.slerp(look, t).normalize()
}

/// Idle: yaw мягко зажимается в ±10°, pitch/roll уходят в ноль (медленнее engaged)
pub fn idle_pose(current: Quat, dt: f32) -> Quat {
    let yaw = yaw_degrees(current).clamp(-IDLE_YAW_LIMIT_DEG, IDLE_YAW_LIMIT_DEG);
    let aim = Quat::from_rotation_y(yaw.to_radians());

    let t = (dt * IDLE_SLERP_RATE).clamp(0.0, 1.0);
    current.slerp(aim, t).normalize()
}
