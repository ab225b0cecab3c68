//! Escort drone: hover, patrol, target lock, aim, travel.
//!
//! Один tick (FixedUpdate) выполняет шаги строго по порядку:
//! 1. handle_drone_reset — reset по запросу stage
//! 2. apply_drone_config_changes — sanitize + live hover restart
//! 3. drone_patrol_and_search — часы, patrol sampler, поиск целей
//! 4. drone_validate_locks — потеря цели (despawn / inactive / hysteresis)
//! 5. drone_aim — slerp к цели или idle, pitch-потолок
//! 6. drone_travel — eased перелёт XZ
//! 7. drone_hover — late pass по Y
//!
//! Hover, travel и aim — три независимых автомата, общий у них только `Transform`.

use bevy::prelude::*;

pub mod aim;
pub mod config;
pub mod hover;
pub mod patrol;
pub mod state;
pub mod systems;
pub mod targeting;
pub mod timer;
pub mod travel;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod config_tests;

pub use config::DroneConfig;
pub use hover::HoverOscillator;
pub use state::{Drone, DroneDebugView, LockChange};
pub use targeting::{LockLoss, TargetLock};
pub use timer::PeriodicTrigger;
pub use travel::Transit;

/// Event: stage перезапускается — вернуть дрон(ы) в стартовое состояние
///
/// `drone: None` — все дроны в мире.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct DroneResetRequested {
    pub drone: Option<Entity>,
}

/// System set для упорядочивания внешних систем относительно дрона
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DroneSet;

/// Drone Plugin
pub struct DronePlugin;

impl Plugin for DronePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DroneResetRequested>().add_systems(
            FixedUpdate,
            (
                systems::handle_drone_reset,
                systems::apply_drone_config_changes,
                systems::drone_patrol_and_search,
                systems::drone_validate_locks,
                systems::drone_aim,
                systems::drone_travel,
                systems::drone_hover,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(DroneSet),
        );
    }
}

/// Bundle дрона: sanitized config + захваченная стартовая поза
pub fn drone_bundle(transform: Transform, config: DroneConfig) -> (Transform, DroneConfig, Drone) {
    let config = config.sanitized();
    let drone = Drone::new(&transform, &config);

    (transform, config, drone)
}

/// Spawn helper для систем (через Commands)
pub fn spawn_drone(commands: &mut Commands, transform: Transform, config: DroneConfig) -> Entity {
    commands.spawn(drone_bundle(transform, config)).id()
}
