//! Creature behavior, state, and lifecycle.
//!
//! Each tick a creature runs `think()` (sense the arena, enqueue an action
//! plan) followed by `act()` (drain the plan, apply braking dynamics, attempt
//! one move, resolve collisions). Every tracked mutation goes through a
//! setter that records a field-change event with the owning game.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::VecDeque;

use super::collider::Collider;
use super::entity::{Body, GameObject};
use super::game::Game;
use super::geometry::{Pose, angle_difference, bearing, distance, normalize_angle};

/// Braking snaps the speed to zero once its magnitude drops below this.
const STOP_SPEED: f32 = 5.0;

/// A pending intent decided in `think()` and consumed in `act()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Rotate by a signed delta in degrees, pre-clamped to the turn rate.
    Turn(f32),
    /// Fire a projectile along the current heading.
    Shoot,
    /// Start braking.
    Brake,
    /// Turn 180 degrees; recovery from a blocked move.
    Reverse,
    /// Marker left by a blocked move, converted to [`Action::Reverse`] by
    /// the next tick's `think()`.
    Blocked,
}

/// Combat and movement stats a creature is constructed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureStats {
    /// Display name, also used by statistics consumers to classify types.
    pub name: String,
    /// Sprite used by out-of-process renderers.
    pub sprite_filename: String,
    /// Starting (and maximum) health.
    pub health: f32,
    /// Nominal travel speed per tick.
    pub speed: f32,
    /// Maximum turn per tick in degrees.
    pub max_turn_rate: f32,
    /// Ticks between shots.
    pub shoot_cooldown: u32,
    /// Collider footprint `(width, height)`.
    pub bounding_box_size: (f32, f32),
    /// Damage per projectile hit.
    pub damage: f32,
    /// Projectile travel speed per tick.
    pub bullet_speed: f32,
    /// Maximum projectile travel distance.
    pub bullet_range: f32,
    /// Per-tick speed multiplier while braking, in `(0, 1)`.
    pub brake_power: f32,
    /// Ticks before braking is available again.
    pub brake_cooldown: u32,
}

/// An autonomous fighting creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Identity, pose and collider.
    pub body: Body,
    /// Display name.
    pub name: String,
    /// Sprite filename for out-of-process renderers.
    pub sprite_filename: String,
    /// Current health; the creature dies at 0.
    pub health: f32,
    /// Health at construction.
    pub max_health: f32,
    /// Nominal travel speed per tick.
    pub nominal_speed: f32,
    /// Current travel speed per tick (differs from nominal while braking).
    pub speed: f32,
    /// Maximum turn per tick in degrees.
    pub max_turn_rate: f32,
    /// Ticks between shots.
    pub shoot_cooldown: u32,
    /// Ticks until the next shot is allowed.
    pub shoot_timer: u32,
    /// Damage per projectile hit.
    pub damage: f32,
    /// Projectile travel speed per tick.
    pub bullet_speed: f32,
    /// Maximum projectile travel distance.
    pub bullet_range: f32,
    /// Per-tick speed multiplier while braking.
    pub brake_power: f32,
    /// Ticks before braking is available again.
    pub brake_cooldown: u32,
    /// Ticks until braking is available again.
    pub brake_timer: u32,
    /// Whether the creature is currently braking.
    pub is_braking: bool,
    /// Match score.
    pub score: i32,
    /// Pending intents, decided in `think()` and consumed in `act()`.
    pub action_queue: VecDeque<Action>,
    /// Current aim point, if any.
    pub target: Option<Array1<f32>>,
    /// Position at registration, reported in the match header.
    pub initial_position: Array1<f32>,
    /// Angle at registration, reported in the match header.
    pub initial_angle: f32,
}

/// Result of testing a candidate move against the rest of the arena.
enum MoveOutcome {
    /// No collision; the move commits.
    Clear,
    /// Collision with a creature, an obstacle or the arena bounds.
    Blocked,
    /// Collision with an enemy projectile.
    HitProjectile { id: u32, damage: f32, origin_id: u32 },
}

impl Creature {
    /// Creates an unregistered creature at `position` facing `angle`.
    pub fn new(position: Array1<f32>, angle: f32, stats: CreatureStats) -> Self {
        let angle = normalize_angle(angle);
        let pose = Pose::new(position.clone(), angle);
        let collider = Collider::rect(position.clone(), stats.bounding_box_size, angle);
        Self {
            body: Body::new(pose, collider),
            name: stats.name,
            sprite_filename: stats.sprite_filename,
            health: stats.health,
            max_health: stats.health,
            nominal_speed: stats.speed,
            speed: stats.speed,
            max_turn_rate: stats.max_turn_rate,
            shoot_cooldown: stats.shoot_cooldown,
            shoot_timer: 0,
            damage: stats.damage,
            bullet_speed: stats.bullet_speed,
            bullet_range: stats.bullet_range,
            brake_power: stats.brake_power,
            brake_cooldown: stats.brake_cooldown,
            brake_timer: 0,
            is_braking: false,
            score: 0,
            action_queue: VecDeque::new(),
            target: None,
            initial_position: position,
            initial_angle: angle,
        }
    }

    /// True while health is above zero.
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Signed turn towards `target`, clamped to the creature's turn rate.
    pub fn calculate_turn(&self, target: &Array1<f32>) -> f32 {
        let desired = bearing(&self.body.pose.position, target);
        angle_difference(self.body.pose.angle, desired)
            .clamp(-self.max_turn_rate, self.max_turn_rate)
    }

    /// Decision phase: pick a target, enqueue this tick's action plan.
    ///
    /// The caller passes the game with this creature removed from the live
    /// registry, so every creature the query sees is an enemy.
    pub fn think(&mut self, game: &mut Game) {
        let nearest = game.nearest_creature(&self.body.pose.position);

        let (target, enemy_distance) = match nearest {
            Some((_, position, dist)) => (position, Some(dist)),
            None => (game.arena().center(), None),
        };
        self.set_target(game, Some(target.clone()));

        if let Some(dist) = enemy_distance {
            if dist <= self.bullet_range && self.brake_timer == 0 && !self.is_braking {
                self.action_queue.push_back(Action::Brake);
            }
        }

        // A blocked move last tick becomes a reverse this tick.
        if let Some(idx) = self
            .action_queue
            .iter()
            .position(|a| matches!(a, Action::Blocked))
        {
            self.action_queue.remove(idx);
            self.action_queue.push_back(Action::Reverse);
        }

        let delta = self.calculate_turn(&target);
        self.action_queue.push_back(Action::Turn(delta));

        if self.shoot_timer == 0 && distance(&self.body.pose.position, &target) <= self.bullet_range
        {
            self.action_queue.push_back(Action::Shoot);
            self.shoot_timer = self.shoot_cooldown;
        }
    }

    /// Movement phase: drain the action plan, apply braking dynamics,
    /// attempt one move and resolve the outcome.
    pub fn act(&mut self, game: &mut Game) {
        let mut angle = self.body.pose.angle;
        let mut angle_changed = false;
        let mut shoot = false;

        while let Some(action) = self.action_queue.pop_front() {
            match action {
                Action::Reverse => {
                    angle = normalize_angle(angle + 180.0);
                    angle_changed = true;
                }
                Action::Turn(delta) => {
                    angle = normalize_angle(angle + delta);
                    angle_changed = true;
                }
                Action::Shoot => shoot = true,
                Action::Brake => self.set_braking(game, true),
                // Stale marker; think() normally consumes it first.
                Action::Blocked => {}
            }
        }

        if angle_changed {
            self.set_angle(game, angle);
        }
        if shoot {
            game.spawn_projectile(self);
        }

        if self.is_braking {
            self.speed *= self.brake_power;
            if self.speed.abs() < STOP_SPEED {
                self.speed = 0.0;
                self.brake_timer = self.brake_cooldown;
                self.set_braking(game, false);
            }
        } else if self.speed != self.nominal_speed {
            self.speed = self.nominal_speed;
        }

        let candidate = &self.body.pose.position + &self.body.pose.heading_vector(self.speed);
        match self.resolve_move(game, &candidate) {
            MoveOutcome::Clear => self.set_position(game, candidate),
            MoveOutcome::Blocked => self.mark_blocked(),
            MoveOutcome::HitProjectile {
                id,
                damage,
                origin_id,
            } => {
                self.mark_blocked();
                self.take_damage(game, damage, origin_id);
                game.destroy_object(id);
            }
        }

        self.shoot_timer = self.shoot_timer.saturating_sub(1);
        self.brake_timer = self.brake_timer.saturating_sub(1);
    }

    /// Applies `amount` damage attributed to `attacker_id`, adjusting both
    /// sides' scores; an attacker id that no longer resolves simply skips
    /// the attacker-side adjustments.
    pub fn take_damage(&mut self, game: &mut Game, amount: f32, attacker_id: u32) {
        let scores = *game.score_values();
        self.set_health(game, (self.health - amount).max(0.0));
        self.set_score(game, self.score + scores.hit_taken);
        game.award_score(attacker_id, scores.hit_given);

        if self.health <= 0.0 {
            self.die(game);
            self.set_score(game, self.score + scores.death_penalty);
            game.award_score(attacker_id, scores.kill_bonus);
        }
    }

    /// Records this creature's destruction. The game moves it to the
    /// cemetery once its turn finishes.
    pub fn die(&mut self, game: &mut Game) {
        log::debug!("creature {} ({}) destroyed", self.body.id, self.name);
        self.health = 0.0;
        game.record_destroy(self.body.id, self.body.pose.position.clone());
    }

    fn mark_blocked(&mut self) {
        self.action_queue.clear();
        self.action_queue.push_back(Action::Blocked);
    }

    /// Tests a scratch-relocated collider at `candidate` against the arena
    /// bounds and every other live entity, in ascending id order.
    fn resolve_move(&self, game: &Game, candidate: &Array1<f32>) -> MoveOutcome {
        if !game.arena().contains(candidate) {
            return MoveOutcome::Blocked;
        }

        let scratch = self
            .body
            .collider
            .relocated(candidate.clone(), self.body.pose.angle);

        for obj in game.live_objects() {
            match obj {
                // Own projectiles pass through freely.
                GameObject::Projectile(p) if p.origin_id == self.body.id => {}
                GameObject::Projectile(p) => {
                    if scratch.intersects(&p.body.collider) {
                        return MoveOutcome::HitProjectile {
                            id: p.body.id,
                            damage: p.damage,
                            origin_id: p.origin_id,
                        };
                    }
                }
                GameObject::Creature(_) | GameObject::Obstacle(_) => {
                    if scratch.intersects(&obj.body().collider) {
                        return MoveOutcome::Blocked;
                    }
                }
            }
        }
        MoveOutcome::Clear
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

    /// Rotates to `angle` degrees, recording the change.
    pub fn set_angle(&mut self, game: &mut Game, angle: f32) {
        self.body.rotate_to(normalize_angle(angle));
        game.record_field_change(self.body.id, "angle", json!(self.body.pose.angle));
    }

    /// Sets health, recording the change.
    pub fn set_health(&mut self, game: &mut Game, health: f32) {
        self.health = health;
        game.record_field_change(self.body.id, "health", json!(self.health));
    }

    /// Sets the score, recording the change.
    pub fn set_score(&mut self, game: &mut Game, score: i32) {
        self.score = score;
        game.record_field_change(self.body.id, "score", json!(self.score));
    }

    /// Sets the aim point, recording the change.
    pub fn set_target(&mut self, game: &mut Game, target: Option<Array1<f32>>) {
        let value = match &target {
            Some(t) => json!([t[0], t[1]]),
            None => json!(null),
        };
        self.target = target;
        game.record_field_change(self.body.id, "target", value);
    }

    /// Sets the braking flag, recording the change.
    pub fn set_braking(&mut self, game: &mut Game, braking: bool) {
        self.is_braking = braking;
        game.record_field_change(self.body.id, "is_braking", json!(self.is_braking));
    }
}
