//! Pose and angle math shared by every simulated entity.
//!
//! Angles are measured in degrees and normalized to `[0, 360)`; positions are
//! 2-element vectors.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Position plus orientation angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in 2D space.
    pub position: Array1<f32>,
    /// Orientation angle in degrees, normalized to `[0, 360)`.
    pub angle: f32,
}

impl Pose {
    /// Creates a pose at `position` facing `angle` degrees.
    pub fn new(position: Array1<f32>, angle: f32) -> Self {
        Self {
            position,
            angle: normalize_angle(angle),
        }
    }

    /// Unit-step displacement along the pose's heading, scaled by `speed`.
    pub fn heading_vector(&self, speed: f32) -> Array1<f32> {
        let radians = self.angle.to_radians();
        Array1::from_vec(vec![radians.cos() * speed, radians.sin() * speed])
    }
}

/// Normalizes an angle in degrees to `[0, 360)`.
pub fn normalize_angle(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Signed angular difference `to - from` in degrees, mapped to `(-180, 180]`.
///
/// The sign gives the shortest turn direction: positive is counter-clockwise
/// in arena coordinates.
pub fn angle_difference(from: f32, to: f32) -> f32 {
    let diff = normalize_angle(to) - normalize_angle(from);
    if diff > 180.0 {
        diff - 360.0
    } else if diff <= -180.0 {
        diff + 360.0
    } else {
        diff
    }
}

/// Euclidean distance between two 2D points.
pub fn distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    (a - b).mapv(|x| x.powi(2)).sum().sqrt()
}

/// Bearing in degrees from `from` towards `to`, normalized to `[0, 360)`.
pub fn bearing(from: &Array1<f32>, to: &Array1<f32>) -> f32 {
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    normalize_angle(dy.atan2(dx).to_degrees())
}
