//! Tests for DroneConfig validation.

#[cfg(test)]
mod tests {
    use super::super::config::*;

    #[test]
    fn test_default_config_is_already_sane() {
        let config = DroneConfig::default();
        assert_eq!(config.sanitized(), config);
        assert_eq!(config.search_range, 12.0);
        assert_eq!(config.max_pitch_for_target, 45.0);
    }

    #[test]
    fn test_sanitize_clamps_hover_ranges() {
        let config = DroneConfig {
            hover_amplitude: 5.0,
            hover_half_period: 0.0,
            hover_smoothing: 100.0,
            min_altitude: 0.0,
            max_altitude: 10.0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.hover_amplitude, 1.0);
        assert_eq!(config.hover_half_period, 0.1);
        assert_eq!(config.hover_smoothing, 30.0);
    }

    #[test]
    fn test_sanitize_resolves_contradictory_altitudes() {
        // min + A > max - A → амплитуда урезается до половины коридора
        let config = DroneConfig {
            min_altitude: 2.0,
            max_altitude: 2.4,
            hover_amplitude: 0.5,
            ..Default::default()
        }
        .sanitized();

        assert!((config.hover_amplitude - 0.2).abs() < 1e-5);
        let (lo, hi) = config.base_altitude_bounds();
        assert!(lo <= hi);

        // max < min → max поднимается до min
        let inverted = DroneConfig {
            min_altitude: 3.0,
            max_altitude: 1.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(inverted.max_altitude, 3.0);
        assert_eq!(inverted.hover_amplitude, 0.0);
    }

    #[test]
    fn test_sanitize_replaces_non_finite_values() {
        let config = DroneConfig {
            move_speed: f32::NAN,
            patrol_interval: f32::INFINITY,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.move_speed, 3.0);
        assert_eq!(config.patrol_interval, 2.0);
    }

    #[test]
    fn test_clamp_base_altitude_respects_amplitude() {
        let config = DroneConfig::default(); // [1.5, 3.0], A = 0.2
        assert!((config.clamp_base_altitude(0.0) - 1.7).abs() < 1e-5);
        assert!((config.clamp_base_altitude(10.0) - 2.8).abs() < 1e-5);
        assert_eq!(config.clamp_base_altitude(2.0), 2.0);
        assert!((config.lock_release_range() - 14.4).abs() < 1e-4);
    }
}
