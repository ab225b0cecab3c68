//! Target acquisition: фильтр кандидатов, weighted-random выбор, валидация lock.
//!
//! Вес кандидата `1 / (d + ε)` — ближние враги выбираются заметно чаще,
//! но дальние тоже иногда получают lock (дрон не «залипает» на одном).

use bevy::prelude::*;
use rand::Rng;

use super::config::WEIGHT_EPSILON;
use crate::components::{is_ahead_of, planar_distance, HostileSnapshot};

/// Текущий lock: handle врага + момент захвата (часы дрона)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TargetLock {
    pub target: Entity,
    pub locked_at: f32,
}

impl TargetLock {
    pub fn age(&self, now: f32) -> f32 {
        now - self.locked_at
    }
}

/// Почему lock потерян
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockLoss {
    /// Враг удалён из мира
    Despawned,
    /// Враг ещё в мире, но неактивен (умирает)
    Inactive,
    /// Вышел за search_range * hysteresis
    OutOfRange,
    /// Требуемый pitch больше max_pitch_for_target
    PitchExceeded,
}

impl LockLoss {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockLoss::Despawned => "despawned",
            LockLoss::Inactive => "inactive",
            LockLoss::OutOfRange => "out of range",
            LockLoss::PitchExceeded => "pitch exceeded",
        }
    }
}

/// Кандидаты на lock с весами.
///
/// Фильтры (по порядку): активен → горизонтальная дистанция до дрона ≤ `search_range`
/// → враг строго впереди игрока по оси трека.
pub fn collect_candidates(
    self_position: Vec3,
    player_position: Vec3,
    hostiles: &[HostileSnapshot],
    search_range: f32,
) -> Vec<(Entity, f32)> {
    hostiles
        .iter()
        .filter(|h| h.active)
        .filter_map(|h| {
            let distance = planar_distance(h.position, self_position);
            if distance > search_range {
                return None;
            }
            if !is_ahead_of(h.position, player_position) {
                return None;
            }
            Some((h.entity, 1.0 / (distance + WEIGHT_EPSILON)))
        })
        .collect()
}

/// Weighted-random выбор.
///
/// Draw ∈ [0, total), проходим накопленные суммы и берём первого, у кого
/// сумма ≥ draw. На float edge-case — последний кандидат.
pub fn pick_weighted<T: Copy>(candidates: &[(T, f32)], rng: &mut impl Rng) -> Option<T> {
    let (last, _) = candidates.last()?;

    let total: f32 = candidates.iter().map(|(_, w)| *w).sum();
    let draw = rng.gen::<f32>() * total;

    let mut accum = 0.0;
    for (candidate, weight) in candidates {
        accum += weight;
        if draw <= accum {
            return Some(*candidate);
        }
    }

    Some(*last)
}

/// Проверка lock на текущем tick (без pitch — его проверяет aim).
///
/// Возвращает позицию цели, если lock ещё валиден.
pub fn validate_lock(
    lock: &TargetLock,
    self_position: Vec3,
    hostiles: &[HostileSnapshot],
    release_range: f32,
) -> Result<Vec3, LockLoss> {
    let Some(hostile) = HostileSnapshot::find(hostiles, lock.target) else {
        return Err(LockLoss::Despawned);
    };

    if !hostile.active {
        return Err(LockLoss::Inactive);
    }

    if planar_distance(hostile.position, self_position) > release_range {
        return Err(LockLoss::OutOfRange);
    }

    Ok(hostile.position)
}
