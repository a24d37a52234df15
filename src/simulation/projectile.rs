//! Ballistic projectiles fired by creatures.
//!
//! A projectile travels in a straight line at constant speed from its spawn
//! heading, expires once its displacement from the start position exceeds
//! its range, and resolves hits against everything except entities sharing
//! its origin.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::collider::Collider;
use super::creature::Creature;
use super::entity::{Body, GameObject};
use super::game::Game;
use super::geometry::{Pose, distance};

/// Collider footprint of a projectile.
pub const PROJECTILE_SIZE: (f32, f32) = (4.0, 4.0);

/// A projectile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Identity, pose and collider.
    pub body: Body,
    /// Id of the creature that fired this projectile; prevents self-damage
    /// and friendly fire between a shooter's own bullets.
    pub origin_id: u32,
    /// Damage dealt on impact.
    pub damage: f32,
    /// Maximum displacement from the start position before expiring.
    pub range: f32,
    /// Travel speed per tick.
    pub speed: f32,
    /// Position at spawn, the origin for range bookkeeping.
    pub start_position: Array1<f32>,
    /// Set once the projectile has been destroyed.
    pub destroyed: bool,
}

/// What a projectile's committed move ran into.
enum Impact {
    None,
    Creature(u32),
    Projectile(u32),
    Obstacle,
}

impl Projectile {
    /// Creates an unregistered projectile inheriting the shooter's pose and
    /// ballistic stats.
    pub fn from_shooter(shooter: &Creature) -> Self {
        let position = shooter.body.pose.position.clone();
        let angle = shooter.body.pose.angle;
        let pose = Pose::new(position.clone(), angle);
        let collider = Collider::rect(position.clone(), PROJECTILE_SIZE, angle);
        Self {
            body: Body::new(pose, collider),
            origin_id: shooter.body.id,
            damage: shooter.damage,
            range: shooter.bullet_range,
            speed: shooter.bullet_speed,
            start_position: position,
            destroyed: false,
        }
    }

    /// Movement phase: advance along the heading, expire on range or bounds,
    /// then resolve hits against every other live entity.
    pub fn act(&mut self, game: &mut Game) {
        let candidate = &self.body.pose.position + &self.body.pose.heading_vector(self.speed);

        // Range cutoff applies to the candidate, before any collision test.
        let traveled = distance(&candidate, &self.start_position);
        debug_assert!(traveled.is_finite(), "traveled range must be finite");
        if traveled > self.range {
            self.die(game);
            return;
        }
        if !game.arena().contains(&candidate) {
            self.die(game);
            return;
        }

        self.set_position(game, candidate);

        match self.resolve_impact(game) {
            Impact::None => {}
            Impact::Creature(id) => {
                game.damage_creature(id, self.damage, self.origin_id);
                self.die(game);
            }
            Impact::Projectile(id) => {
                // Cross-origin projectiles destroy each other.
                game.destroy_object(id);
                self.die(game);
            }
            Impact::Obstacle => self.die(game),
        }
    }

    /// Records this projectile's destruction; the game retires it once its
    /// turn finishes.
    pub fn die(&mut self, game: &mut Game) {
        log::trace!("projectile {} destroyed", self.body.id);
        self.destroyed = true;
        game.record_destroy(self.body.id, self.body.pose.position.clone());
    }

    /// First entity the projectile overlaps at its committed position, in
    /// ascending id order. Entities sharing this projectile's origin never
    /// interact with it.
    fn resolve_impact(&self, game: &Game) -> Impact {
        for obj in game.live_objects() {
            let hit = match obj {
                GameObject::Creature(c) if c.body.id == self.origin_id => continue,
                GameObject::Projectile(p) if p.origin_id == self.origin_id => continue,
                GameObject::Creature(c) => {
                    self.body.collider.intersects(&c.body.collider).then(|| Impact::Creature(c.body.id))
                }
                GameObject::Projectile(p) => {
                    self.body.collider.intersects(&p.body.collider).then(|| Impact::Projectile(p.body.id))
                }
                GameObject::Obstacle(o) => {
                    self.body.collider.intersects(&o.body.collider).then_some(Impact::Obstacle)
                }
            };
            if let Some(hit) = hit {
                return hit;
            }
        }
        Impact::None
    }

    /// Commits a new position, recording the change.
    pub fn set_position(&mut self, game: &mut Game, position: Array1<f32>) {
        self.body.relocate(position);
        game.record_field_change(
            self.body.id,
            "position",
            json!([self.body.pose.position[0], self.body.pose.position[1]]),
        );
    }
}
