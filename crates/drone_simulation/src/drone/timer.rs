//! Периодический trigger на accumulate-and-fire счётчике.
//!
//! Заменяет «повторяющийся callback» движка: продвигается внутри tick,
//! отменяется простым `restart()`.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PeriodicTrigger {
    initial_delay: f32,
    interval: f32,
    /// Секунд до следующего срабатывания
    remaining: f32,
}

impl PeriodicTrigger {
    pub fn new(initial_delay: f32, interval: f32) -> Self {
        let initial_delay = initial_delay.max(0.0);
        Self {
            initial_delay,
            interval: interval.max(f32::EPSILON),
            remaining: initial_delay,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn initial_delay(&self) -> f32 {
        self.initial_delay
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Сдвинуть время. Возвращает true, если за этот шаг истёк хотя бы один интервал.
    ///
    /// Несколько пропущенных интервалов схлопываются в одно срабатывание,
    /// остаток переносится.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt.max(0.0);
        if self.remaining > 0.0 {
            return false;
        }

        // Остаток без цикла (dt может покрывать много интервалов)
        self.remaining = if self.remaining.is_finite() {
            self.interval - (-self.remaining).rem_euclid(self.interval)
        } else {
            self.interval
        };
        true
    }

    /// Начать заново с initial delay
    pub fn restart(&mut self) {
        self.remaining = self.initial_delay;
    }

    /// Новый интервал/задержка (config change), отсчёт начинается заново
    pub fn reconfigure(&mut self, initial_delay: f32, interval: f32) {
        *self = Self::new(initial_delay, interval);
    }
}
