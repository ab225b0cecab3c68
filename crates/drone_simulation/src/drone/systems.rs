//! Drone systems (FixedUpdate, строго последовательно).
//!
//! Каждая система — тонкая обёртка над шагом `Drone`: собирает входы из ECS
//! (игрок, снимок врагов, dt) и логирует изменения lock.

use bevy::prelude::*;

use super::config::DroneConfig;
use super::state::{Drone, LockChange};
use super::DroneResetRequested;
use crate::components::{collect_hostiles, EscortedPlayer, Hostile};
use crate::DeterministicRng;

/// Дрон не может быть одновременно игроком или врагом — это делает Query
/// на `&mut Transform` дизъюнктным с запросами игрока/врагов
pub type DroneFilter = (Without<EscortedPlayer>, Without<Hostile>);

/// GetPlayerPosition: первый EscortedPlayer, если он уже есть
pub fn player_position(players: &Query<&Transform, With<EscortedPlayer>>) -> Option<Vec3> {
    players.iter().next().map(|t| t.translation)
}

fn log_lock_change(entity: Entity, change: LockChange) {
    match change {
        LockChange::Acquired(target) => {
            crate::log_info(&format!("🎯 Drone {:?}: lock acquired → {:?}", entity, target));
        }
        LockChange::Lost(target, reason) => {
            crate::log_info(&format!("❌ Drone {:?}: lock on {:?} lost ({})", entity, target, reason.as_str()));
        }
    }
}

/// Система: reset дронов по запросу stage orchestrator
pub fn handle_drone_reset(
    mut requests: EventReader<DroneResetRequested>,
    mut drones: Query<(Entity, &mut Drone, &mut Transform, &DroneConfig), DroneFilter>,
) {
    for request in requests.read() {
        for (entity, mut drone, mut transform, config) in drones.iter_mut() {
            if request.drone.is_some_and(|target| target != entity) {
                continue;
            }

            drone.reset_to_start(&mut transform, config);
            crate::log_info(&format!("🔄 Drone {:?}: reset to start {:?}", entity, transform.translation));
        }
    }
}

/// Система: sanitize изменённого DroneConfig + live-перезапуск hover
pub fn apply_drone_config_changes(
    mut drones: Query<(Entity, &mut Drone, &mut DroneConfig), Changed<DroneConfig>>,
) {
    for (entity, mut drone, mut config) in drones.iter_mut() {
        let sanitized = config.sanitized();
        if sanitized != *config {
            crate::log_warning(&format!(
                "⚠️ Drone {:?}: config out of range, clamped ({:?} → {:?})",
                entity, *config, sanitized
            ));
            *config = sanitized;
        }

        if drone.apply_config(&config) {
            crate::log(&format!(
                "Drone {:?}: hover restarted (amplitude {}, half period {}, enabled {})",
                entity, config.hover_amplitude, config.hover_half_period, config.hover_enabled
            ));
        }
    }
}

/// Система: часы дрона, patrol sampler и периодический поиск целей
pub fn drone_patrol_and_search(
    mut drones: Query<(Entity, &mut Drone, &Transform, &DroneConfig), DroneFilter>,
    players: Query<&Transform, With<EscortedPlayer>>,
    hostiles: Query<(Entity, &Transform, &Hostile)>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();
    let player = player_position(&players);
    let snapshot = collect_hostiles(hostiles.iter());

    for (entity, mut drone, transform, config) in drones.iter_mut() {
        drone.step_patrol(dt, player, config, &mut rng.rng);

        if let Some(change) = drone.step_search(dt, transform.translation, player, &snapshot, config, &mut rng.rng) {
            log_lock_change(entity, change);
        }
    }
}

/// Система: инвалидация lock (каждый tick, независимо от интервала поиска)
pub fn drone_validate_locks(
    mut drones: Query<(Entity, &mut Drone, &Transform, &DroneConfig), DroneFilter>,
    hostiles: Query<(Entity, &Transform, &Hostile)>,
) {
    let snapshot = collect_hostiles(hostiles.iter());

    for (entity, mut drone, transform, config) in drones.iter_mut() {
        if let Some(change) = drone.step_validate_lock(transform.translation, &snapshot, config) {
            log_lock_change(entity, change);
        }
    }
}

/// Система: aim (к цели с pitch-потолком или idle)
pub fn drone_aim(
    mut drones: Query<(Entity, &mut Drone, &mut Transform, &DroneConfig), DroneFilter>,
    hostiles: Query<(Entity, &Transform, &Hostile)>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();
    let snapshot = collect_hostiles(hostiles.iter());

    for (entity, mut drone, mut transform, config) in drones.iter_mut() {
        if let Some(change) = drone.step_aim(&mut transform, &snapshot, config, dt) {
            log_lock_change(entity, change);
        }
    }
}

/// Система: travel (eased XZ перелёты, leash к игроку)
pub fn drone_travel(
    mut drones: Query<(&mut Drone, &mut Transform, &DroneConfig), DroneFilter>,
    players: Query<&Transform, With<EscortedPlayer>>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();
    let player = player_position(&players);

    for (mut drone, mut transform, config) in drones.iter_mut() {
        drone.step_travel(&mut transform, player, config, dt);
    }
}

/// Система: hover late pass — должна идти после travel, читает уже обновлённый XZ
pub fn drone_hover(
    mut drones: Query<(&mut Drone, &mut Transform, &DroneConfig), DroneFilter>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();

    for (mut drone, mut transform, config) in drones.iter_mut() {
        drone.step_hover(&mut transform, config, dt);
    }
}
