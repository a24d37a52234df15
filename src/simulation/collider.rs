//! Collision shapes: oriented rectangles tested with the separating axis
//! theorem, plus circles for completeness.
//!
//! Interval comparisons are strict, so exact edge contact (zero-width
//! overlap) counts as *not* colliding.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// An oriented bounding box: center, size and rotation angle in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectCollider {
    /// Center of the rectangle.
    pub center: Array1<f32>,
    /// Width and height before rotation.
    pub size: (f32, f32),
    /// Rotation angle in degrees.
    pub angle: f32,
}

impl RectCollider {
    /// Creates a rectangle collider centered at `center`.
    pub fn new(center: Array1<f32>, size: (f32, f32), angle: f32) -> Self {
        Self {
            center,
            size,
            angle,
        }
    }

    /// The four corners of the rectangle, rotated by `angle` and translated
    /// to `center`.
    pub fn vertices(&self) -> [Array1<f32>; 4] {
        let (w, h) = self.size;
        let radians = self.angle.to_radians();
        let (sin, cos) = radians.sin_cos();
        let corner = |x: f32, y: f32| {
            Array1::from_vec(vec![
                self.center[0] + x * cos - y * sin,
                self.center[1] + x * sin + y * cos,
            ])
        };
        [
            corner(-w / 2.0, -h / 2.0),
            corner(w / 2.0, -h / 2.0),
            corner(w / 2.0, h / 2.0),
            corner(-w / 2.0, h / 2.0),
        ]
    }

    /// The two unit face axes of the rectangle.
    pub fn axes(&self) -> [Array1<f32>; 2] {
        let radians = self.angle.to_radians();
        let (sin, cos) = radians.sin_cos();
        [
            Array1::from_vec(vec![cos, sin]),
            Array1::from_vec(vec![-sin, cos]),
        ]
    }
}

/// A circle collider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleCollider {
    /// Center of the circle.
    pub center: Array1<f32>,
    /// Radius of the circle.
    pub radius: f32,
}

/// Closed set of collision shapes with a total pairwise intersection test.
///
/// No current entity uses [`Collider::Circle`], but the capability set stays
/// polymorphic so new entity kinds can pick either shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Collider {
    /// Oriented rectangle.
    Rect(RectCollider),
    /// Circle.
    Circle(CircleCollider),
}

impl Collider {
    /// Creates a rectangle collider.
    pub fn rect(center: Array1<f32>, size: (f32, f32), angle: f32) -> Self {
        Self::Rect(RectCollider::new(center, size, angle))
    }

    /// Creates a circle collider.
    pub fn circle(center: Array1<f32>, radius: f32) -> Self {
        Self::Circle(CircleCollider { center, radius })
    }

    /// The shape's center.
    pub fn center(&self) -> &Array1<f32> {
        match self {
            Self::Rect(r) => &r.center,
            Self::Circle(c) => &c.center,
        }
    }

    /// Moves the shape's center.
    pub fn set_center(&mut self, center: Array1<f32>) {
        match self {
            Self::Rect(r) => r.center = center,
            Self::Circle(c) => c.center = center,
        }
    }

    /// Rotates the shape. A no-op for circles.
    pub fn set_angle(&mut self, angle: f32) {
        if let Self::Rect(r) = self {
            r.angle = angle;
        }
    }

    /// Axis-aligned footprint of the shape, `(width, height)` before
    /// rotation.
    pub fn size(&self) -> (f32, f32) {
        match self {
            Self::Rect(r) => r.size,
            Self::Circle(c) => (c.radius * 2.0, c.radius * 2.0),
        }
    }

    /// A copy of the shape relocated to `center` and rotated to `angle`,
    /// used as a scratch shape for candidate-move testing.
    pub fn relocated(&self, center: Array1<f32>, angle: f32) -> Self {
        let mut scratch = self.clone();
        scratch.set_center(center);
        scratch.set_angle(angle);
        scratch
    }

    /// Tests whether two shapes overlap. Symmetric; edge contact does not
    /// count as overlap.
    pub fn intersects(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rect(a), Self::Rect(b)) => rects_intersect(a, b),
            (Self::Circle(a), Self::Circle(b)) => circles_intersect(a, b),
            (Self::Rect(r), Self::Circle(c)) | (Self::Circle(c), Self::Rect(r)) => {
                circle_rect_intersect(c, r)
            }
        }
    }
}

/// Projects `vertices` onto `axis` and returns the covered interval.
fn project(vertices: &[Array1<f32>; 4], axis: &Array1<f32>) -> (f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for v in vertices {
        let p = v.dot(axis);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

/// SAT over the 4 face axes of the two rectangles: colliding iff every axis
/// shows strict interval overlap.
fn rects_intersect(a: &RectCollider, b: &RectCollider) -> bool {
    let verts_a = a.vertices();
    let verts_b = b.vertices();
    let [ax0, ax1] = a.axes();
    let [bx0, bx1] = b.axes();

    for axis in [&ax0, &ax1, &bx0, &bx1] {
        let (min_a, max_a) = project(&verts_a, axis);
        let (min_b, max_b) = project(&verts_b, axis);
        if max_a <= min_b || max_b <= min_a {
            return false;
        }
    }
    true
}

fn circles_intersect(a: &CircleCollider, b: &CircleCollider) -> bool {
    let dist = (&a.center - &b.center).mapv(|x| x.powi(2)).sum().sqrt();
    dist < a.radius + b.radius
}

/// Clamps the circle center into the rectangle's local frame and compares
/// the closest-point distance against the radius.
fn circle_rect_intersect(c: &CircleCollider, r: &RectCollider) -> bool {
    let radians = r.angle.to_radians();
    let (sin, cos) = radians.sin_cos();
    let dx = c.center[0] - r.center[0];
    let dy = c.center[1] - r.center[1];
    // Rotate the center delta into the rectangle's local axes.
    let local_x = dx * cos + dy * sin;
    let local_y = -dx * sin + dy * cos;

    let (w, h) = r.size;
    let clamped_x = local_x.clamp(-w / 2.0, w / 2.0);
    let clamped_y = local_y.clamp(-h / 2.0, h / 2.0);

    let dist_sq = (local_x - clamped_x).powi(2) + (local_y - clamped_y).powi(2);
    dist_sq < c.radius.powi(2)
}
