//! Drone component: всё внутреннее состояние контроллера и шаги одного tick.
//!
//! Поза (position/orientation) живёт в `Transform`, остальное — здесь.
//! Шаги вызываются в фиксированном порядке (см. `Drone::tick` и `DronePlugin`):
//! triggers → lock validation → aim → travel → hover (late pass).

use bevy::prelude::*;
use rand::Rng;

use super::aim::{idle_pose, look_rotation, pitch_within_limit, track_target};
use super::config::{DroneConfig, HoverParams, SEARCH_INITIAL_DELAY};
use super::hover::{blend_altitude, HoverOscillator};
use super::patrol::sample_patrol_point;
use super::targeting::{collect_candidates, pick_weighted, validate_lock, LockLoss, TargetLock};
use super::timer::PeriodicTrigger;
use super::travel::{apply_planar, choose_goal, Transit};
use crate::components::HostileSnapshot;

/// Изменение lock за tick (для логов и внешних наблюдателей)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockChange {
    Acquired(Entity),
    Lost(Entity, LockLoss),
}

/// Данные для debug-визуализации (радиус поиска, линия до цели)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneDebugView {
    pub origin: Vec3,
    pub search_range: f32,
    pub release_range: f32,
    pub target: Option<Entity>,
    pub target_position: Option<Vec3>,
}

/// Escort-дрон
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Drone {
    initial_position: Vec3,
    initial_rotation: Quat,
    /// Центр hover (Y без offset), всегда в [min + A, max - A]
    base_altitude: f32,
    hover: HoverOscillator,
    transit: Option<Transit>,
    patrol_point: Option<Vec3>,
    /// Немедленный patrol sample на ближайшем tick (после spawn/reset)
    patrol_pending: bool,
    patrol_timer: PeriodicTrigger,
    search_timer: PeriodicTrigger,
    lock: Option<TargetLock>,
    /// Локальные часы дрона (секунды с spawn/reset)
    clock: f32,
}

impl Drone {
    /// Захватить начальную позу и запустить hover + таймеры
    pub fn new(transform: &Transform, config: &DroneConfig) -> Self {
        let mut drone = Self {
            initial_position: transform.translation,
            initial_rotation: transform.rotation,
            base_altitude: config.clamp_base_altitude(transform.translation.y),
            hover: HoverOscillator::new(config.hover_params()),
            transit: None,
            patrol_point: None,
            patrol_pending: true,
            patrol_timer: PeriodicTrigger::new(config.patrol_initial_delay, config.patrol_interval),
            search_timer: PeriodicTrigger::new(SEARCH_INITIAL_DELAY, config.search_interval),
            lock: None,
            clock: 0.0,
        };
        drone.hover.restart_from_bottom(config.hover_params());
        drone
    }

    // --- Accessors ---

    /// Текущая цель (для оружия)
    pub fn current_target(&self) -> Option<Entity> {
        self.lock.map(|lock| lock.target)
    }

    pub fn lock(&self) -> Option<TargetLock> {
        self.lock
    }

    pub fn is_engaged(&self) -> bool {
        self.lock.is_some()
    }

    pub fn is_transiting(&self) -> bool {
        self.transit.is_some()
    }

    pub fn transit(&self) -> Option<&Transit> {
        self.transit.as_ref()
    }

    pub fn patrol_point(&self) -> Option<Vec3> {
        self.patrol_point
    }

    pub fn base_altitude(&self) -> f32 {
        self.base_altitude
    }

    pub fn hover_offset(&self) -> f32 {
        self.hover.offset()
    }

    pub fn hover(&self) -> &HoverOscillator {
        &self.hover
    }

    pub fn patrol_timer(&self) -> &PeriodicTrigger {
        &self.patrol_timer
    }

    pub fn search_timer(&self) -> &PeriodicTrigger {
        &self.search_timer
    }

    pub fn initial_pose(&self) -> (Vec3, Quat) {
        (self.initial_position, self.initial_rotation)
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn debug_view(&self, transform: &Transform, config: &DroneConfig, hostiles: &[HostileSnapshot]) -> DroneDebugView {
        let target = self.current_target();
        DroneDebugView {
            origin: transform.translation,
            search_range: config.search_range,
            release_range: config.lock_release_range(),
            target,
            target_position: target
                .and_then(|entity| HostileSnapshot::find(hostiles, entity))
                .map(|h| h.position),
        }
    }

    // --- Lifecycle ---

    /// Полный reset к позе spawn.
    ///
    /// Перелёт и hover обрываются без завершения, таймеры стартуют с initial delay,
    /// lock сбрасывается. Повторный вызов даёт то же состояние.
    pub fn reset_to_start(&mut self, transform: &mut Transform, config: &DroneConfig) {
        self.transit = None;
        self.hover.stop();

        transform.translation = self.initial_position;
        transform.rotation = self.initial_rotation;

        self.lock = None;
        self.clock = 0.0;
        self.patrol_point = None;
        self.patrol_pending = true;

        self.base_altitude = config.clamp_base_altitude(transform.translation.y);

        self.search_timer.reconfigure(SEARCH_INITIAL_DELAY, config.search_interval);
        self.patrol_timer.reconfigure(config.patrol_initial_delay, config.patrol_interval);

        self.hover.restart_from_bottom(config.hover_params());
    }

    /// Применить изменённый (уже sanitized) config.
    ///
    /// Hover перезапускается только если поменялись его параметры; offset
    /// зажимается в новую амплитуду, base altitude — в новый коридор.
    pub fn apply_config(&mut self, config: &DroneConfig) -> bool {
        let params: HoverParams = config.hover_params();
        let hover_changed = self.hover.params() != params;
        if hover_changed {
            self.hover.start(params);
        }
        self.base_altitude = config.clamp_base_altitude(self.base_altitude);

        if self.search_timer.interval() != config.search_interval {
            self.search_timer.reconfigure(SEARCH_INITIAL_DELAY, config.search_interval);
        }
        if self.patrol_timer.interval() != config.patrol_interval
            || self.patrol_timer.initial_delay() != config.patrol_initial_delay
        {
            self.patrol_timer.reconfigure(config.patrol_initial_delay, config.patrol_interval);
        }

        hover_changed
    }

    // --- Tick steps ---

    /// Часы + patrol sampler
    pub fn step_patrol(&mut self, dt: f32, player: Option<Vec3>, config: &DroneConfig, rng: &mut impl Rng) {
        self.clock += dt.max(0.0);

        let fired = self.patrol_timer.advance(dt);
        let due = std::mem::take(&mut self.patrol_pending) || fired;
        if !due {
            return;
        }

        if let Some(player) = player {
            self.patrol_point = Some(sample_patrol_point(player, config.patrol_radius, rng));
        }
    }

    /// Периодический поиск целей
    pub fn step_search(
        &mut self,
        dt: f32,
        position: Vec3,
        player: Option<Vec3>,
        hostiles: &[HostileSnapshot],
        config: &DroneConfig,
        rng: &mut impl Rng,
    ) -> Option<LockChange> {
        if !self.search_timer.advance(dt) {
            return None;
        }

        let player = player?;

        if let Some(lock) = self.lock {
            if lock.age(self.clock) < config.min_target_lock_time {
                return None;
            }
        }

        let candidates = collect_candidates(position, player, hostiles, config.search_range);
        let target = pick_weighted(&candidates, rng)?;

        let previous = self.current_target();
        self.lock = Some(TargetLock {
            target,
            locked_at: self.clock,
        });

        if previous == Some(target) {
            None
        } else {
            Some(LockChange::Acquired(target))
        }
    }

    /// Каждый tick: lock сбрасывается, если цель пропала, неактивна или ушла за hysteresis
    pub fn step_validate_lock(
        &mut self,
        position: Vec3,
        hostiles: &[HostileSnapshot],
        config: &DroneConfig,
    ) -> Option<LockChange> {
        let lock = self.lock?;

        match validate_lock(&lock, position, hostiles, config.lock_release_range()) {
            Ok(_) => None,
            Err(reason) => {
                self.lock = None;
                Some(LockChange::Lost(lock.target, reason))
            }
        }
    }

    /// Aim: к цели (с потолком pitch) или idle
    pub fn step_aim(
        &mut self,
        transform: &mut Transform,
        hostiles: &[HostileSnapshot],
        config: &DroneConfig,
        dt: f32,
    ) -> Option<LockChange> {
        let mut change = None;

        if let Some(lock) = self.lock {
            match HostileSnapshot::find(hostiles, lock.target) {
                Some(hostile) => {
                    let look = look_rotation(transform.translation, hostile.position);
                    if pitch_within_limit(look, config.max_pitch_for_target) {
                        transform.rotation = track_target(transform.rotation, look, dt);
                        return None;
                    }
                    // Жёсткое ограничение: цель бросаем и в этом же tick уходим в idle
                    change = Some(LockChange::Lost(lock.target, LockLoss::PitchExceeded));
                }
                None => {
                    change = Some(LockChange::Lost(lock.target, LockLoss::Despawned));
                }
            }
            self.lock = None;
        }

        transform.rotation = idle_pose(transform.rotation, dt);
        change
    }

    /// Travel: продвинуть активный перелёт, либо выбрать цель и начать новый
    pub fn step_travel(&mut self, transform: &mut Transform, player: Option<Vec3>, config: &DroneConfig, dt: f32) {
        if let Some(transit) = self.transit.as_mut() {
            let xz = transit.advance(dt);
            apply_planar(&mut transform.translation, xz);
            if transit.is_finished() {
                self.transit = None;
            }
            return;
        }

        let goal = choose_goal(transform.translation, self.patrol_point, player, config);
        self.transit = Some(Transit::begin(transform.translation, goal, config.move_speed));
    }

    /// Late pass: hover offset + сглаживание Y (после того как XZ уже посчитаны)
    pub fn step_hover(&mut self, transform: &mut Transform, config: &DroneConfig, dt: f32) {
        self.hover.advance(dt);
        transform.translation.y =
            blend_altitude(transform.translation.y, self.base_altitude, self.hover.offset(), config, dt);
    }

    /// Полный tick на обычных данных (тот же порядок, что у систем `DronePlugin`).
    ///
    /// Config прогоняется через `sanitized()`: отдельные `step_*` ждут уже
    /// исправленный config (системы гарантируют это через `Changed<DroneConfig>`).
    pub fn tick(
        &mut self,
        transform: &mut Transform,
        config: &DroneConfig,
        player: Option<Vec3>,
        hostiles: &[HostileSnapshot],
        rng: &mut impl Rng,
        dt: f32,
    ) -> Vec<LockChange> {
        let config = &config.sanitized();
        let mut changes = Vec::new();

        self.step_patrol(dt, player, config, rng);
        changes.extend(self.step_search(dt, transform.translation, player, hostiles, config, rng));
        changes.extend(self.step_validate_lock(transform.translation, hostiles, config));
        changes.extend(self.step_aim(transform, hostiles, config, dt));
        self.step_travel(transform, player, config, dt);
        self.step_hover(transform, config, dt);

        changes
    }
}
