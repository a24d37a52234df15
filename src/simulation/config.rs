//! Creature construction from stat-range configuration, and arena placement.
//!
//! Stat ranges mirror the experiment configuration consumed by batch
//! drivers: each stat is rolled uniformly from an inclusive range at
//! construction time. Construction-time randomness is outside the
//! deterministic stepping contract.

use ndarray::Array1;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::creature::{Creature, CreatureStats};
use super::entity::GameObject;
use super::game::{Arena, Game};
use super::geometry::distance;

/// Placement gives up after this many rejected candidates.
const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// A malformed construction parameter. Fails that single construction, not
/// the whole run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A stat range with `min > max`.
    #[error("empty {field} range: min exceeds max")]
    EmptyRange {
        /// Name of the offending stat.
        field: &'static str,
    },
    /// No valid position found under the minimum-distance constraint.
    #[error("no valid placement found after {attempts} attempts")]
    PlacementFailed {
        /// Number of candidates tried.
        attempts: u32,
    },
}

/// Stat ranges for one creature type, rolled per individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureSpec {
    /// Type name; individuals are named `"{name} {index}"`.
    pub name: String,
    /// Sprite used by out-of-process renderers.
    pub sprite_filename: String,
    /// Starting health (fixed, not rolled).
    pub health: f32,
    /// Travel speed range per tick.
    pub speed_range: (u32, u32),
    /// Maximum turn rate range in degrees per tick.
    pub max_turn_rate_range: (u32, u32),
    /// Shot cooldown range in ticks.
    pub shoot_cooldown_range: (u32, u32),
    /// Collider footprint `(width, height)` (fixed, not rolled).
    pub bounding_box_size: (f32, f32),
    /// Damage range per hit.
    pub damage_range: (u32, u32),
    /// Projectile speed range per tick.
    pub bullet_speed_range: (u32, u32),
    /// Projectile range range.
    pub bullet_range_range: (u32, u32),
    /// Braking speed-multiplier range, in `(0, 1)`.
    pub brake_power_range: (f32, f32),
    /// Brake cooldown range in ticks.
    pub brake_cooldown_range: (u32, u32),
}

impl CreatureSpec {
    /// Rolls an individual from this spec at `position` with a random
    /// heading. An empty range fails this construction only.
    pub fn roll(
        &self,
        index: usize,
        position: Array1<f32>,
        rng: &mut impl Rng,
    ) -> Result<Creature, ConfigError> {
        let stats = CreatureStats {
            name: format!("{} {}", self.name, index),
            sprite_filename: self.sprite_filename.clone(),
            health: self.health,
            speed: roll_int("speed", self.speed_range, rng)? as f32,
            max_turn_rate: roll_int("max_turn_rate", self.max_turn_rate_range, rng)? as f32,
            shoot_cooldown: roll_int("shoot_cooldown", self.shoot_cooldown_range, rng)?,
            bounding_box_size: self.bounding_box_size,
            damage: roll_int("damage", self.damage_range, rng)? as f32,
            bullet_speed: roll_int("bullet_speed", self.bullet_speed_range, rng)? as f32,
            bullet_range: roll_int("bullet_range", self.bullet_range_range, rng)? as f32,
            brake_power: roll_float("brake_power", self.brake_power_range, rng)?,
            brake_cooldown: roll_int("brake_cooldown", self.brake_cooldown_range, rng)?,
        };
        let angle = rng.random_range(0..360) as f32;
        Ok(Creature::new(position, angle, stats))
    }
}

fn roll_int(
    field: &'static str,
    (min, max): (u32, u32),
    rng: &mut impl Rng,
) -> Result<u32, ConfigError> {
    if min > max {
        return Err(ConfigError::EmptyRange { field });
    }
    Ok(rng.random_range(min..=max))
}

fn roll_float(
    field: &'static str,
    (min, max): (f32, f32),
    rng: &mut impl Rng,
) -> Result<f32, ConfigError> {
    if min > max {
        return Err(ConfigError::EmptyRange { field });
    }
    Ok(rng.random_range(min..=max))
}

/// A uniformly random position inside the arena.
pub fn random_position(arena: &Arena) -> Array1<f32> {
    Array1::random(2, Uniform::new(0.0, 1.0)) * arena.center() * 2.0
}

/// Whether `position` keeps at least `min_distance` from every registered
/// creature, clears every obstacle by its half-width plus `min_distance`,
/// and lies inside the half-open arena bounds `[0, width) x [0, height)`.
///
/// Placement accepts the zero edge; the movement bound
/// ([`Arena::contains`]) keeps the interior strict.
pub fn is_valid_position(game: &Game, position: &Array1<f32>, min_distance: f32) -> bool {
    for obj in game.live_objects() {
        match obj {
            GameObject::Creature(c) => {
                if distance(position, &c.body.pose.position) < min_distance {
                    return false;
                }
            }
            GameObject::Obstacle(o) => {
                let clearance = o.body.collider.size().0 / 2.0 + min_distance;
                if distance(position, &o.body.pose.position) < clearance {
                    return false;
                }
            }
            GameObject::Projectile(_) => {}
        }
    }
    let arena = game.arena();
    position[0] >= 0.0
        && position[0] < arena.width
        && position[1] >= 0.0
        && position[1] < arena.height
}

/// Rolls an individual from `spec` and registers it at a random valid
/// position. Used by batch drivers to fill an arena before the first turn.
pub fn place_creature(
    game: &mut Game,
    spec: &CreatureSpec,
    index: usize,
    min_distance: f32,
    rng: &mut impl Rng,
) -> Result<u32, ConfigError> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let position = random_position(game.arena());
        if is_valid_position(game, &position, min_distance) {
            let creature = spec.roll(index, position, rng)?;
            return Ok(game.add_game_object(GameObject::Creature(creature)));
        }
    }
    Err(ConfigError::PlacementFailed {
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}
