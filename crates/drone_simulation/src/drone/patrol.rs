//! Patrol: случайная точка вокруг игрока.

use bevy::prelude::*;
use rand::Rng;

/// Точка в диске радиуса `radius` вокруг игрока (XZ).
///
/// Простая полярная выборка: угол и радиус независимо равномерные,
/// поэтому точки гуще к центру (не area-uniform). Y берётся от игрока,
/// но travel всё равно использует только XZ.
pub fn sample_patrol_point(player: Vec3, radius: f32, rng: &mut impl Rng) -> Vec3 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let distance = rng.gen::<f32>() * radius.max(0.0);

    player + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::planar_distance;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_patrol_points_stay_inside_disk() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let player = Vec3::new(10.0, 0.5, -40.0);

        for _ in 0..1000 {
            let point = sample_patrol_point(player, 4.0, &mut rng);
            assert!(planar_distance(point, player) <= 4.0 + 1e-4);
            assert_eq!(point.y, player.y);
        }
    }

    #[test]
    fn test_polar_sampling_is_denser_near_center() {
        // При независимом радиусе половина точек ближе R/2 (area-uniform дал бы 1/4)
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let samples = 20_000;
        let inner = (0..samples)
            .map(|_| sample_patrol_point(Vec3::ZERO, 2.0, &mut rng))
            .filter(|p| planar_distance(*p, Vec3::ZERO) < 1.0)
            .count();

        let ratio = inner as f32 / samples as f32;
        assert!((ratio - 0.5).abs() < 0.03, "inner ratio {}", ratio);
    }

    #[test]
    fn test_zero_radius_returns_player_position() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let player = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(sample_patrol_point(player, 0.0, &mut rng), player);
    }
}
