//! Headless симуляция escort-дрона
//!
//! Игрок бежит вперёд по треку, впереди стоят враги, дрон сопровождает и стреляет.
//! На середине прогона stage перезапускается.

use bevy::prelude::*;
use drone_simulation::*;

const TICKS: usize = 1200;
const PLAYER_SPEED: f32 = 4.0;

fn main() {
    let seed = 42;
    println!("Starting escort drone headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let player_start = Vec3::ZERO;
    let player = app
        .world_mut()
        .spawn((Transform::from_translation(player_start), EscortedPlayer))
        .id();

    for i in 0..12 {
        let x = if i % 2 == 0 { -3.0 } else { 3.0 };
        app.world_mut()
            .spawn((Transform::from_xyz(x, 0.5, -8.0 - i as f32 * 6.0), Hostile::default()));
    }

    let drone = app
        .world_mut()
        .spawn((
            drone_bundle(Transform::from_xyz(1.5, 2.0, 1.0), DroneConfig::default()),
            DroneWeapon::default(),
            WeaponState::default(),
        ))
        .id();

    let dt = (1.0 / TICK_HZ) as f32;
    let mut shots = 0usize;
    for tick in 0..TICKS {
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
            transform.translation.z -= PLAYER_SPEED * dt;
        }

        if tick == TICKS / 2 {
            println!("Tick {}: stage restart", tick);
            if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
                transform.translation = player_start;
            }
            app.world_mut().send_event(DroneResetRequested::default());
        }

        app.update();
        shots += app
            .world_mut()
            .resource_mut::<Events<ShotFired>>()
            .drain()
            .count();

        if tick % 100 == 0 {
            let world = app.world();
            if let (Some(state), Some(transform)) = (world.get::<Drone>(drone), world.get::<Transform>(drone)) {
                println!(
                    "Tick {}: drone at {:.2?}, target {:?}, transiting {}, shots so far {}",
                    tick,
                    transform.translation,
                    state.current_target(),
                    state.is_transiting(),
                    shots
                );
            }
        }
    }

    println!("Simulation complete! {} shots fired", shots);
}
