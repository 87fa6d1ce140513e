//! Rotation axis and per-element rotation description.

use glam::{Mat3, Vec3};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit_vector(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// A single-element rotation: rotate by `angle` degrees about `axis`,
/// pivoting around `origin`. No `rescale` field — not part of this
/// document's JSON schema.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ElementRotation {
    pub origin: [f32; 3],
    pub axis: Axis,
    pub angle: f32,
}

impl ElementRotation {
    pub fn origin_vec(&self) -> Vec3 {
        Vec3::from(self.origin)
    }

    pub fn angle_radians(&self) -> f32 {
        self.angle.to_radians()
    }

    /// The rotation matrix for this element, built from axis + angle.
    pub fn matrix(&self) -> Mat3 {
        match self.axis {
            Axis::X => Mat3::from_rotation_x(self.angle_radians()),
            Axis::Y => Mat3::from_rotation_y(self.angle_radians()),
            Axis::Z => Mat3::from_rotation_z(self.angle_radians()),
        }
    }

    /// Rotate `point` about `self.origin` by this rotation.
    pub fn apply_to_point(&self, point: Vec3) -> Vec3 {
        let origin = self.origin_vec();
        self.matrix() * (point - origin) + origin
    }

    /// Rotate a direction vector (no translation component).
    pub fn apply_to_normal(&self, normal: Vec3) -> Vec3 {
        self.matrix() * normal
    }
}
