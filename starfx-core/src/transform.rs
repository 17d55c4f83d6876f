/// Axis rotations and the running rotation state of the wireframe
use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Rotate about the X axis (right-hand rule)
pub fn rotate_x(point: &Point3<f32>, angle: f32) -> Point3<f32> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle) * point
}

/// Rotate about the Y axis (right-hand rule)
pub fn rotate_y(point: &Point3<f32>, angle: f32) -> Point3<f32> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), angle) * point
}

/// Rotate about the Z axis (right-hand rule)
pub fn rotate_z(point: &Point3<f32>, angle: f32) -> Point3<f32> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle) * point
}

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Apply X, then Y, then Z
    pub fn apply(&self, point: &Point3<f32>) -> Point3<f32> {
        let rotated = rotate_x(point, self.x);
        let rotated = rotate_y(&rotated, self.y);
        rotate_z(&rotated, self.z)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}
