//! Base identity shared by every simulated object, and the closed set of
//! entity kinds the game can register.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::collider::Collider;
use super::creature::Creature;
use super::events::SpawnDetails;
use super::game::Game;
use super::geometry::Pose;
use super::obstacle::Obstacle;
use super::projectile::Projectile;

/// Identity, pose and collision shape shared by every entity kind.
///
/// The id is 0 until the entity is registered with a [`Game`], which assigns
/// ids exactly once, monotonically, at insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Unique id, assigned at registration and never reused.
    pub id: u32,
    /// Position and heading.
    pub pose: Pose,
    /// Collision shape, kept centered on the pose.
    pub collider: Collider,
}

impl Body {
    /// Creates an unregistered body; the collider is centered on the pose.
    pub fn new(pose: Pose, collider: Collider) -> Self {
        let mut collider = collider;
        collider.set_center(pose.position.clone());
        collider.set_angle(pose.angle);
        Self {
            id: 0,
            pose,
            collider,
        }
    }

    /// Moves the body, keeping the collider centered on it.
    pub fn relocate(&mut self, position: Array1<f32>) {
        self.collider.set_center(position.clone());
        self.pose.position = position;
    }

    /// Rotates the body and its collider to `angle` degrees.
    pub fn rotate_to(&mut self, angle: f32) {
        self.pose.angle = angle;
        self.collider.set_angle(angle);
    }
}

/// Closed set of entity kinds, dispatched by exhaustive match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameObject {
    /// An autonomous fighting creature.
    Creature(Creature),
    /// A ballistic projectile fired by a creature.
    Projectile(Projectile),
    /// A static obstacle.
    Obstacle(Obstacle),
}

impl GameObject {
    /// Shared identity and pose.
    pub fn body(&self) -> &Body {
        match self {
            Self::Creature(c) => &c.body,
            Self::Projectile(p) => &p.body,
            Self::Obstacle(o) => &o.body,
        }
    }

    /// Mutable shared identity and pose.
    pub fn body_mut(&mut self) -> &mut Body {
        match self {
            Self::Creature(c) => &mut c.body,
            Self::Projectile(p) => &mut p.body,
            Self::Obstacle(o) => &mut o.body,
        }
    }

    /// The entity's id.
    pub fn id(&self) -> u32 {
        self.body().id
    }

    /// Kind name used in serialized spawn events.
    pub fn object_type(&self) -> &'static str {
        match self {
            Self::Creature(_) => "Creature",
            Self::Projectile(_) => "Projectile",
            Self::Obstacle(_) => "Obstacle",
        }
    }

    /// Id of the entity responsible for this one existing: a projectile's
    /// shooter, otherwise the entity itself.
    pub fn origin_id(&self) -> u32 {
        match self {
            Self::Projectile(p) => p.origin_id,
            _ => self.id(),
        }
    }

    /// Whether the entity is still part of the live simulation.
    pub fn is_alive(&self) -> bool {
        match self {
            Self::Creature(c) => c.is_alive(),
            Self::Projectile(p) => !p.destroyed,
            Self::Obstacle(_) => true,
        }
    }

    /// Pose and shape details for the spawn event emitted at registration.
    pub fn spawn_details(&self) -> SpawnDetails {
        let body = self.body();
        let speed = match self {
            Self::Creature(c) => c.speed,
            Self::Projectile(p) => p.speed,
            Self::Obstacle(_) => 0.0,
        };
        SpawnDetails {
            position: body.pose.position.clone(),
            angle: body.pose.angle,
            speed,
            size: body.collider.size(),
        }
    }

    /// Decision phase of the tick. Only creatures think; the game is passed
    /// with this entity removed from its registry.
    pub fn think(&mut self, game: &mut Game) {
        if let Self::Creature(c) = self {
            c.think(game);
        }
    }

    /// Movement phase of the tick.
    pub fn act(&mut self, game: &mut Game) {
        match self {
            Self::Creature(c) => c.act(game),
            Self::Projectile(p) => p.act(game),
            Self::Obstacle(_) => {}
        }
    }
}
