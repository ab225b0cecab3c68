//! Настройки дрона-эскорта (hover, движение, патруль, поиск целей).
//!
//! Все значения валидируются клампингом, а не отказом: `sanitized()` вызывается при spawn
//! и каждый раз, когда компонент меняется в runtime.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Минимальная длительность одного перелёта (секунды)
pub const MIN_TRANSIT_DURATION: f32 = 0.2;
/// Куда подтягивается цель перелёта при выходе за tether (доля от tether)
pub const LEASH_PULL_IN: f32 = 0.6;
/// Hysteresis: lock держится до `search_range * LOCK_HYSTERESIS`
pub const LOCK_HYSTERESIS: f32 = 1.2;
/// Добавка к дистанции в весе кандидата (1 / (d + ε))
pub const WEIGHT_EPSILON: f32 = 0.01;
/// Скорость slerp к цели (1/сек)
pub const ENGAGED_SLERP_RATE: f32 = 4.0;
/// Скорость slerp в idle (1/сек), медленнее engaged
pub const IDLE_SLERP_RATE: f32 = 1.5;
/// Idle yaw мягко удерживается в ±10°
pub const IDLE_YAW_LIMIT_DEG: f32 = 10.0;
/// Задержка первого поиска целей после spawn/reset (секунды)
pub const SEARCH_INITIAL_DELAY: f32 = 0.2;

/// Параметры дрона
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct DroneConfig {
    // --- Hover / altitude ---
    /// Минимальная допустимая высота (Y)
    pub min_altitude: f32,
    /// Максимальная допустимая высота (Y)
    pub max_altitude: f32,
    /// Амплитуда покачивания, [0, 1]
    pub hover_amplitude: f32,
    /// Время перехода -A → +A (секунды), [0.1, 10]
    pub hover_half_period: f32,
    /// Скорость экспоненциального сглаживания Y, [1, 30]
    pub hover_smoothing: f32,
    pub hover_enabled: bool,

    // --- Movement ---
    /// Скорость перелёта (м/с), задаёт длительность transit
    pub move_speed: f32,
    /// Tether: максимальная горизонтальная дистанция до игрока
    pub max_distance_from_player: f32,

    // --- Patrol ---
    pub patrol_radius: f32,
    /// Период смены patrol точки, [0.1, 30]
    pub patrol_interval: f32,
    /// Задержка первого периодического патруля, [0, 10]
    pub patrol_initial_delay: f32,

    // --- Search / targeting ---
    pub search_range: f32,
    pub search_interval: f32,
    /// Lock «липкий» минимум столько секунд
    pub min_target_lock_time: f32,
    /// Максимальный |pitch| (градусы), при котором цель ещё держится
    pub max_pitch_for_target: f32,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            min_altitude: 1.5,
            max_altitude: 3.0,
            hover_amplitude: 0.2,
            hover_half_period: 4.0,
            hover_smoothing: 8.0,
            hover_enabled: true,
            move_speed: 3.0,
            max_distance_from_player: 8.0,
            patrol_radius: 4.0,
            patrol_interval: 2.0,
            patrol_initial_delay: 1.5,
            search_range: 12.0,
            search_interval: 0.6,
            min_target_lock_time: 2.0,
            max_pitch_for_target: 45.0,
        }
    }
}

/// Параметры, при изменении которых hover перезапускается
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct HoverParams {
    pub amplitude: f32,
    pub half_period: f32,
    pub enabled: bool,
}

impl DroneConfig {
    /// Копия с каждым полем, зажатым в допустимый диапазон.
    ///
    /// Противоречивые высоты разрешаются так: min ≤ max, затем амплитуда
    /// урезается до (max - min) / 2, чтобы коридор базовой высоты был непустым.
    pub fn sanitized(&self) -> Self {
        let mut c = self.clone();

        c.min_altitude = finite_or(c.min_altitude, 1.5);
        c.max_altitude = finite_or(c.max_altitude, 3.0);
        if c.max_altitude < c.min_altitude {
            c.max_altitude = c.min_altitude;
        }

        let corridor_half = (c.max_altitude - c.min_altitude) * 0.5;
        c.hover_amplitude = finite_or(c.hover_amplitude, 0.0).clamp(0.0, 1.0).min(corridor_half);
        c.hover_half_period = finite_or(c.hover_half_period, 4.0).clamp(0.1, 10.0);
        c.hover_smoothing = finite_or(c.hover_smoothing, 8.0).clamp(1.0, 30.0);

        c.move_speed = finite_or(c.move_speed, 3.0).max(0.01);
        c.max_distance_from_player = finite_or(c.max_distance_from_player, 8.0).max(0.0);

        c.patrol_radius = finite_or(c.patrol_radius, 4.0).max(0.0);
        c.patrol_interval = finite_or(c.patrol_interval, 2.0).clamp(0.1, 30.0);
        c.patrol_initial_delay = finite_or(c.patrol_initial_delay, 1.5).clamp(0.0, 10.0);

        c.search_range = finite_or(c.search_range, 12.0).max(0.0);
        c.search_interval = finite_or(c.search_interval, 0.6).max(0.05);
        c.min_target_lock_time = finite_or(c.min_target_lock_time, 2.0).max(0.0);
        c.max_pitch_for_target = finite_or(c.max_pitch_for_target, 45.0).clamp(0.0, 180.0);

        c
    }

    /// Коридор базовой высоты: [min + A, max - A]
    pub fn base_altitude_bounds(&self) -> (f32, f32) {
        let lo = self.min_altitude + self.hover_amplitude;
        let hi = (self.max_altitude - self.hover_amplitude).max(lo);
        (lo, hi)
    }

    pub fn clamp_base_altitude(&self, y: f32) -> f32 {
        let (lo, hi) = self.base_altitude_bounds();
        y.clamp(lo, hi)
    }

    pub fn hover_params(&self) -> HoverParams {
        HoverParams {
            amplitude: self.hover_amplitude,
            half_period: self.hover_half_period,
            enabled: self.hover_enabled,
        }
    }

    /// Радиус, за которым lock сбрасывается (шире радиуса захвата)
    pub fn lock_release_range(&self) -> f32 {
        self.search_range * LOCK_HYSTERESIS
    }
}

pub(crate) fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
