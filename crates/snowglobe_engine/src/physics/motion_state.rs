//! Published world transforms of simulated bodies

use crate::foundation::math::{Isometry, Quat, Translation3, Vec3};

/// The world transform of a rigid body as last published by the solver
///
/// When a frame's elapsed time is not a whole number of sub-steps, the
/// leftover is not simulated; the published pose is the simulated pose
/// extrapolated over that leftover using the body's velocities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    world_transform: Isometry,
}

impl MotionState {
    /// Start from a known pose
    pub fn new(world_transform: Isometry) -> Self {
        Self { world_transform }
    }

    /// Current world transform
    pub fn world_transform(&self) -> &Isometry {
        &self.world_transform
    }

    /// Current world position
    pub fn position(&self) -> Vec3 {
        self.world_transform.translation.vector
    }

    /// Current world orientation
    pub fn rotation(&self) -> Quat {
        self.world_transform.rotation
    }

    pub(crate) fn publish(&mut self, world_transform: Isometry) {
        self.world_transform = world_transform;
    }
}

/// Advance `pose` by `dt` seconds at constant linear and angular velocity
pub(crate) fn integrate_transform(pose: &Isometry, linvel: &Vec3, angvel: &Vec3, dt: f32) -> Isometry {
    if dt <= 0.0 {
        return *pose;
    }

    let translation = Translation3::from(pose.translation.vector + linvel * dt);
    let rotation = Quat::new(angvel * dt) * pose.rotation;
    Isometry::from_parts(translation, rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrate_translation() {
        let pose = Isometry::translation(0.0, 10.0, 0.0);
        let moved = integrate_transform(&pose, &Vec3::new(0.0, -6.0, 0.0), &Vec3::zeros(), 0.5);

        assert_relative_eq!(moved.translation.vector, Vec3::new(0.0, 7.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(moved.rotation, Quat::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_integrate_rotation() {
        let pose = Isometry::identity();
        let spin = Vec3::new(0.0, std::f32::consts::PI, 0.0);
        let turned = integrate_transform(&pose, &Vec3::zeros(), &spin, 0.5);

        let expected = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(turned.rotation, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let pose = Isometry::translation(1.0, 2.0, 3.0);
        let same = integrate_transform(&pose, &Vec3::new(5.0, 5.0, 5.0), &Vec3::new(1.0, 0.0, 0.0), 0.0);
        assert_eq!(same, pose);
    }

    #[test]
    fn test_publish_replaces_pose() {
        let mut state = MotionState::new(Isometry::identity());
        state.publish(Isometry::translation(0.0, -1.0, 0.0));
        assert_relative_eq!(state.position(), Vec3::new(0.0, -1.0, 0.0));
    }
}
