//! Static obstacles.
//!
//! Obstacles never think or move. They block creature movement like a
//! creature would and destroy projectiles on contact.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::collider::Collider;
use super::entity::Body;
use super::geometry::Pose;

/// An inert rectangular obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Identity, pose and collider.
    pub body: Body,
}

impl Obstacle {
    /// Creates an unregistered obstacle.
    pub fn new(position: Array1<f32>, angle: f32, size: (f32, f32)) -> Self {
        let pose = Pose::new(position.clone(), angle);
        let collider = Collider::rect(position, size, angle);
        Self {
            body: Body::new(pose, collider),
        }
    }
}
