//! Escort Drone Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: автономный дрон сопровождает бегущего игрока,
//! патрулирует вокруг него, берёт врагов в lock и стреляет очередями.
//!
//! Всё, что связано с движком (рендер, анимации, звук, снаряды, spawn врагов),
//! остаётся снаружи: симуляция читает `EscortedPlayer`/`Hostile` и пишет
//! `Transform` дрона + `ShotFired` события.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use std::time::Duration;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod drone;
pub mod logger;
pub mod weapon;

// Re-export базовых типов для удобства
pub use components::*;
pub use drone::{
    drone_bundle, spawn_drone, Drone, DroneConfig, DroneDebugView, DronePlugin, DroneResetRequested, DroneSet, LockChange,
    LockLoss, TargetLock,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use weapon::{DroneWeapon, ShotFired, WeaponPlugin, WeaponState};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins((DronePlugin, WeaponPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Частота simulation tick
pub const TICK_HZ: f64 = 60.0;

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную (ровно один FixedUpdate на `app.update()`, кроме самого
/// первого — там Bevy только инициализирует часы), поэтому прогон не зависит от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ)) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / TICK_HZ)));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
