//! Weapon: burst-стрельба дрона по текущему lock.
//!
//! Оружие получает цель через типизированный accessor `Drone::current_target()`,
//! результат — `ShotFired` события для внешней projectile-системы.

use bevy::prelude::*;

pub mod burst;

pub use burst::{shot_direction, DroneWeapon, WeaponState};

use crate::components::{collect_hostiles, HostileSnapshot, Hostile};
use crate::drone::systems::DroneFilter;
use crate::drone::{Drone, DroneResetRequested, DroneSet};
use crate::DeterministicRng;

/// Event: дрон выстрелил (ECS → projectile system)
#[derive(Event, Debug, Clone)]
pub struct ShotFired {
    pub shooter: Entity,
    /// Цель очереди (для homing снарядов)
    pub target: Option<Entity>,
    /// Позиция дула
    pub origin: Vec3,
    /// Нормализованное направление (с разбросом)
    pub direction: Vec3,
    pub damage: u32,
    pub speed: f32,
    pub homing: bool,
}

/// Система: sanitize изменённого DroneWeapon
pub fn apply_weapon_config_changes(mut weapons: Query<(Entity, &mut DroneWeapon), Changed<DroneWeapon>>) {
    for (entity, mut weapon) in weapons.iter_mut() {
        let sanitized = weapon.sanitized();
        if sanitized != *weapon {
            crate::log_warning(&format!(
                "⚠️ Drone {:?}: weapon config out of range, clamped ({:?} → {:?})",
                entity, *weapon, sanitized
            ));
            *weapon = sanitized;
        }
    }
}

/// Система: очереди по текущей цели дрона
pub fn drone_weapon_fire(
    mut drones: Query<(Entity, &Drone, &Transform, &DroneWeapon, &mut WeaponState), DroneFilter>,
    hostiles: Query<(Entity, &Transform, &Hostile)>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut shots: EventWriter<ShotFired>,
) {
    let dt = time.delta_secs();
    let snapshot = collect_hostiles(hostiles.iter());

    for (entity, drone, transform, weapon, mut state) in drones.iter_mut() {
        let was_bursting = state.is_bursting();
        let due = state.advance(weapon, dt, drone.current_target());
        if due == 0 {
            continue;
        }

        if !was_bursting {
            crate::log(&format!("🔫 Drone {:?}: burst at {:?}", entity, state.burst_target));
        }

        let origin = weapon.muzzle(transform);
        let forward = transform.forward().as_vec3();
        let target_position = state
            .burst_target
            .and_then(|target| HostileSnapshot::find(&snapshot, target))
            .map(|h| h.position);

        for _ in 0..due {
            shots.write(ShotFired {
                shooter: entity,
                target: state.burst_target,
                origin,
                direction: shot_direction(origin, target_position, forward, weapon, &mut rng.rng),
                damage: weapon.damage,
                speed: weapon.projectile_speed,
                homing: weapon.homing,
            });
        }
    }
}

/// Система: stage reset обрывает очереди
pub fn handle_weapon_reset(
    mut requests: EventReader<DroneResetRequested>,
    mut weapons: Query<(Entity, &DroneWeapon, &mut WeaponState)>,
) {
    for request in requests.read() {
        for (entity, weapon, mut state) in weapons.iter_mut() {
            if request.drone.is_some_and(|target| target != entity) {
                continue;
            }
            state.reset(weapon);
        }
    }
}

/// Weapon Plugin (после DroneSet — читает уже обновлённые lock и позу)
pub struct WeaponPlugin;

impl Plugin for WeaponPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DroneResetRequested>()
            .add_event::<ShotFired>()
            .add_systems(
                FixedUpdate,
                (apply_weapon_config_changes, handle_weapon_reset, drone_weapon_fire)
                    .chain()
                    .after(DroneSet),
            );
    }
}
