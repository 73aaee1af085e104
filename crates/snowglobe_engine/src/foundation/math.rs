//! Math utilities and types
//!
//! Thin aliases over `nalgebra` shared by the scene graph and the physics
//! wrapper. `rapier3d` is built on the same `nalgebra` release, so these
//! types cross the physics boundary without conversion.

pub use nalgebra::{
    Vector3,
    Matrix4,
    Quaternion,
    Translation3,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Rigid transform (rotation followed by translation, no scale)
pub type Isometry = nalgebra::Isometry3<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Build a unit-scale transform from a rigid isometry
    pub fn from_isometry(isometry: &Isometry) -> Self {
        Self::from_position_rotation(isometry.translation.vector, isometry.rotation)
    }

    /// The rigid part of this transform (scale is dropped)
    pub fn to_isometry(&self) -> Isometry {
        Isometry::from_parts(Translation3::from(self.position), self.rotation)
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        let matrix = self.to_matrix();
        matrix.transform_point(&point)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Rotation about the world Y axis
pub fn yaw(angle: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_isometry_roundtrip() {
        let transform = Transform::from_position_rotation(
            Vec3::new(1.0, 2.0, 3.0),
            yaw(constants::HALF_PI),
        );

        let back = Transform::from_isometry(&transform.to_isometry());
        assert_relative_eq!(back.position, transform.position, epsilon = EPSILON);
        assert_relative_eq!(back.rotation, transform.rotation, epsilon = EPSILON);
        assert_eq!(back.scale, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_yaw_rotates_x_towards_negative_z() {
        // Right-handed Y-up: +X rotated a quarter turn about +Y lands on -Z
        let rotated = yaw(constants::HALF_PI) * Vec3::x();
        assert_relative_eq!(rotated, Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_transform_point_applies_translation() {
        let transform = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
        let moved = transform.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Point3::new(1.0, 5.0, 0.0), epsilon = EPSILON);
    }
}
