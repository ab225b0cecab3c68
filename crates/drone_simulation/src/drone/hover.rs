//! Hover: вертикальное покачивание дрона.
//!
//! Два независимых шага:
//! 1. `HoverOscillator` — ping-pong offset в [-A, +A] с ease-in-out sine
//! 2. `blend_altitude` — late pass: Y экспоненциально тянется к clamp(base + offset)
//!
//! Осциллятор никогда не пишет в Transform напрямую, поэтому смена параметров
//! в runtime не даёт рывка по Y.

use bevy::prelude::*;
use std::f32::consts::PI;

use super::config::{DroneConfig, HoverParams};

/// Ease-in-out sine: 0 → 1 с нулевой скоростью на концах
#[inline]
pub fn ease_in_out_sine(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    -((PI * t).cos() - 1.0) * 0.5
}

/// Yoyo-осциллятор hover offset
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct HoverOscillator {
    offset: f32,
    from: f32,
    to: f32,
    leg_duration: f32,
    elapsed: f32,
    params: HoverParams,
    running: bool,
}

impl HoverOscillator {
    /// Осциллятор в нижней точке (-A), ещё не запущен
    pub fn new(params: HoverParams) -> Self {
        Self {
            offset: -params.amplitude,
            from: -params.amplitude,
            to: params.amplitude,
            leg_duration: params.half_period,
            elapsed: 0.0,
            params,
            running: false,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn params(&self) -> HoverParams {
        self.params
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// (Пере)запуск волны с текущего offset.
    ///
    /// Offset зажимается в новую амплитуду; первый отрезок идёт к +A (или к -A,
    /// если уже стоим на +A) за время, пропорциональное оставшемуся пути.
    /// Выключенный hover обнуляет offset и стоит.
    pub fn start(&mut self, params: HoverParams) {
        self.params = params;
        self.elapsed = 0.0;

        let amplitude = params.amplitude;
        if !params.enabled || amplitude <= 0.0 {
            self.offset = 0.0;
            self.running = false;
            return;
        }

        self.offset = self.offset.clamp(-amplitude, amplitude);
        self.from = self.offset;
        self.to = if self.offset < amplitude { amplitude } else { -amplitude };

        let span = (self.to - self.from).abs() / (2.0 * amplitude);
        self.leg_duration = (params.half_period * span).max(f32::EPSILON);
        self.running = true;
    }

    /// Reset: offset в -A и полный перезапуск
    pub fn restart_from_bottom(&mut self, params: HoverParams) {
        self.offset = -params.amplitude;
        self.start(params);
    }

    /// Остановить без завершения текущего отрезка (offset замирает)
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    /// Продвинуть волну; сколько бы отрезков ни уместилось в `dt`, счёт без цикла
    pub fn advance(&mut self, dt: f32) {
        if !self.running || dt.is_nan() || dt <= 0.0 {
            return;
        }

        self.elapsed += dt;
        if !self.elapsed.is_finite() {
            self.elapsed = 0.0;
        }

        if self.elapsed >= self.leg_duration {
            // Текущий отрезок закончен, дальше только полные half period
            let overshoot = self.elapsed - self.leg_duration;
            self.from = self.to;
            self.to = -self.to;
            self.leg_duration = self.params.half_period;

            let legs = (overshoot / self.leg_duration).floor();
            if legs % 2.0 == 1.0 {
                self.from = self.to;
                self.to = -self.to;
            }
            self.elapsed = overshoot.rem_euclid(self.leg_duration);
        }

        let t = self.elapsed / self.leg_duration;
        self.offset = self.from + (self.to - self.from) * ease_in_out_sine(t);
    }
}

/// Late pass: сгладить текущий Y к целевой высоте.
///
/// Цель = clamp(base + offset, min, max); Y двигается экспоненциально со скоростью
/// `hover_smoothing`, результат тоже зажимается в [min, max]. Дрон, заспавненный
/// вне коридора, оказывается на границе уже в первом tick.
///
/// `config` должен быть sanitized (min ≤ max, значения конечные).
pub fn blend_altitude(current_y: f32, base_altitude: f32, offset: f32, config: &DroneConfig, dt: f32) -> f32 {
    let target = (base_altitude + offset).clamp(config.min_altitude, config.max_altitude);
    let t = (dt * config.hover_smoothing).clamp(0.0, 1.0);
    (current_y + (target - current_y) * t).clamp(config.min_altitude, config.max_altitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(amplitude: f32, half_period: f32) -> HoverParams {
        HoverParams { amplitude, half_period, enabled: true }
    }

    #[test]
    fn test_ease_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_sine(0.0), 0.0);
        assert!((ease_in_out_sine(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out_sine(0.5) - 0.5).abs() < 1e-6);
        assert!(ease_in_out_sine(0.25) < 0.25); // ease-in: медленный старт
    }

    #[test]
    fn test_oscillator_stays_within_amplitude() {
        let mut osc = HoverOscillator::new(params(0.3, 1.0));
        osc.start(params(0.3, 1.0));

        for _ in 0..2000 {
            osc.advance(1.0 / 60.0);
            assert!(osc.offset().abs() <= 0.3 + 1e-5, "offset {} out of bounds", osc.offset());
        }
    }

    #[test]
    fn test_oscillator_reverses_at_bounds() {
        let mut osc = HoverOscillator::new(params(0.5, 1.0));
        osc.start(params(0.5, 1.0)); // -A → +A за 1 сек

        osc.advance(0.5);
        assert!(osc.offset().abs() < 1e-4, "midway should cross zero");

        osc.advance(0.5);
        assert!((osc.offset() - 0.5).abs() < 1e-4);

        osc.advance(0.5);
        assert!(osc.offset().abs() < 1e-4, "on the way back down");

        osc.advance(0.5);
        assert!((osc.offset() + 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_live_change_clamps_without_jump() {
        let mut osc = HoverOscillator::new(params(1.0, 2.0));
        osc.start(params(1.0, 2.0));
        osc.advance(1.9); // почти +1.0
        let before = osc.offset();
        assert!(before > 0.9);

        // Уменьшаем амплитуду — offset зажимается в новую границу
        osc.start(params(0.4, 2.0));
        assert!((osc.offset() - 0.4).abs() < 1e-6);

        osc.advance(1.0 / 60.0);
        assert!(osc.offset() <= 0.4 + 1e-6);
        assert!(osc.offset() >= -0.4 - 1e-6);
    }

    #[test]
    fn test_restart_mid_wave_continues_from_current_offset() {
        let mut osc = HoverOscillator::new(params(0.5, 1.0));
        osc.start(params(0.5, 1.0));
        osc.advance(0.5);
        let current = osc.offset();

        osc.start(params(0.5, 3.0));
        assert_eq!(osc.offset(), current);

        osc.advance(0.001);
        assert!((osc.offset() - current).abs() < 0.01);
    }

    #[test]
    fn test_disable_zeroes_and_halts() {
        let mut osc = HoverOscillator::new(params(0.5, 1.0));
        osc.start(params(0.5, 1.0));
        osc.advance(0.3);

        osc.start(HoverParams { enabled: false, ..params(0.5, 1.0) });
        assert_eq!(osc.offset(), 0.0);
        assert!(!osc.is_running());

        osc.advance(5.0);
        assert_eq!(osc.offset(), 0.0);
    }

    #[test]
    fn test_stop_freezes_offset() {
        let mut osc = HoverOscillator::new(params(0.5, 1.0));
        osc.start(params(0.5, 1.0));
        osc.advance(0.25);
        let frozen = osc.offset();

        osc.stop();
        osc.advance(1.0);
        assert_eq!(osc.offset(), frozen);
    }

    #[test]
    fn test_huge_step_returns_and_stays_bounded() {
        let mut osc = HoverOscillator::new(params(0.5, 1.0));
        osc.start(params(0.5, 1.0));

        osc.advance(1.0e8);
        assert!(osc.offset().abs() <= 0.5 + 1e-5);

        osc.advance(f32::INFINITY);
        assert!(osc.offset().abs() <= 0.5 + 1e-5);

        osc.advance(f32::NAN);
        assert!(osc.offset().is_finite());
    }

    #[test]
    fn test_step_over_several_legs_matches_small_steps() {
        let mut coarse = HoverOscillator::new(params(0.5, 1.0));
        coarse.start(params(0.5, 1.0));
        let mut fine = coarse;

        // 1 отрезок от -A до +A, потом 2 полных + четверть
        coarse.advance(3.25);
        for _ in 0..13 {
            fine.advance(0.25);
        }

        assert!((coarse.offset() - fine.offset()).abs() < 1e-4);
        // Четвёртый отрезок: +A → -A, пройдена четверть
        assert!(coarse.offset() > 0.0);
    }

    #[test]
    fn test_blend_altitude_snaps_out_of_range_y_into_corridor() {
        let config = DroneConfig::default(); // [1.5, 3.0]

        let y = blend_altitude(10.0, 2.8, 0.0, &config, 1.0 / 60.0);
        assert_eq!(y, config.max_altitude);

        let y = blend_altitude(-4.0, 1.7, 0.0, &config, 1.0 / 60.0);
        assert_eq!(y, config.min_altitude);
    }

    #[test]
    fn test_blend_altitude_is_smoothed_and_bounded() {
        let config = DroneConfig::default(); // [1.5, 3.0]
        let y = blend_altitude(2.0, 2.8, 0.2, &config, 1.0 / 60.0);
        assert!(y > 2.0 && y < 3.0, "smoothed, not snapped: {}", y);

        // Цель за пределами коридора зажимается
        let mut y = 2.0;
        for _ in 0..600 {
            y = blend_altitude(y, 10.0, 1.0, &config, 1.0 / 60.0);
            assert!(y >= config.min_altitude && y <= config.max_altitude);
        }
        assert!((y - config.max_altitude).abs() < 1e-3);
    }
}
