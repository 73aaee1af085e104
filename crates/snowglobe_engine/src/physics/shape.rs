//! Collision shape factory
//!
//! Turns a `(sphere, radius, height)` request into a rapier collider plus
//! the local inertia tensor for a given mass. Pure functions only; nothing
//! here touches the dynamics world.

use rapier3d::prelude::{ColliderBuilder, MassProperties, Point};

use crate::foundation::math::Vec3;
use crate::physics::PhysicsError;

/// Requested collision geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeRequest {
    /// Solid sphere
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Solid Y-axis cylinder with flat caps
    Cylinder {
        /// Cap radius
        radius: f32,
        /// Full height along Y
        height: f32,
    },
}

impl ShapeRequest {
    /// Build a request from the flag form used by scene construction code
    ///
    /// `height` is ignored for spheres.
    pub fn from_flags(sphere: bool, radius: f32, height: f32) -> Self {
        if sphere {
            Self::Sphere { radius }
        } else {
            Self::Cylinder { radius, height }
        }
    }

    /// Short name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Cylinder { .. } => "cylinder",
        }
    }

    /// Check the dimension constraints
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let invalid = |reason: String| PhysicsError::InvalidShape {
            kind: self.kind(),
            reason,
        };

        match *self {
            Self::Sphere { radius } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(invalid(format!("radius must be positive, got {radius}")));
                }
            }
            Self::Cylinder { radius, height } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(invalid(format!("radius must be positive, got {radius}")));
                }
                if !(height.is_finite() && height > 0.0) {
                    return Err(invalid(format!("height must be positive, got {height}")));
                }
            }
        }

        Ok(())
    }

    /// Principal inertia of the solid shape about its centroid
    ///
    /// Zero for `mass == 0`, which is what marks a body static.
    pub fn local_inertia(&self, mass: f32) -> Vec3 {
        if mass == 0.0 {
            return Vec3::zeros();
        }

        match *self {
            Self::Sphere { radius } => {
                let i = 0.4 * mass * radius * radius;
                Vec3::new(i, i, i)
            }
            Self::Cylinder { radius, height } => {
                let r2 = radius * radius;
                let lateral = mass * (3.0 * r2 + height * height) / 12.0;
                let axial = 0.5 * mass * r2;
                Vec3::new(lateral, axial, lateral)
            }
        }
    }
}

/// A validated shape ready to become a collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionShape {
    request: ShapeRequest,
    margin: f32,
    mass: f32,
    local_inertia: Vec3,
}

impl CollisionShape {
    /// The geometry this shape was built from
    pub fn request(&self) -> ShapeRequest {
        self.request
    }

    /// Collision margin applied to the shape
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Body mass (0 for static bodies)
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Principal inertia about the centroid
    pub fn local_inertia(&self) -> Vec3 {
        self.local_inertia
    }

    /// Whether the owning body is static
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    /// Translate into a rapier collider builder
    ///
    /// Spheres are all margin already. Cylinders get a rounded core shrunk
    /// by the margin so the outer dimensions stay those requested.
    pub fn to_collider(&self) -> ColliderBuilder {
        let builder = match self.request {
            ShapeRequest::Sphere { radius } => ColliderBuilder::ball(radius),
            ShapeRequest::Cylinder { radius, height } => {
                let half_height = height * 0.5;
                let margin = self.margin;
                if margin > 0.0 && half_height > margin && radius > margin {
                    ColliderBuilder::round_cylinder(half_height - margin, radius - margin, margin)
                } else {
                    ColliderBuilder::cylinder(half_height, radius)
                }
            }
        };

        if self.is_static() {
            builder
        } else {
            builder.mass_properties(MassProperties::new(
                Point::origin(),
                self.mass,
                self.local_inertia,
            ))
        }
    }
}

/// Builds collision shapes with a fixed margin
#[derive(Debug, Clone, Copy)]
pub struct ShapeFactory {
    margin: f32,
}

impl ShapeFactory {
    /// Create a factory applying `margin` to every shape
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    /// Margin applied to built shapes
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Validate a request and compute its inertia for `mass`
    pub fn build(&self, request: ShapeRequest, mass: f32) -> Result<CollisionShape, PhysicsError> {
        if !(mass.is_finite() && mass >= 0.0) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        request.validate()?;

        Ok(CollisionShape {
            request,
            margin: self.margin,
            mass,
            local_inertia: request.local_inertia(mass),
        })
    }
}

impl Default for ShapeFactory {
    fn default() -> Self {
        Self::new(crate::core::config::DEFAULT_COLLISION_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_flags_picks_shape() {
        assert_eq!(
            ShapeRequest::from_flags(true, 1.0, 0.0),
            ShapeRequest::Sphere { radius: 1.0 }
        );
        assert_eq!(
            ShapeRequest::from_flags(false, 17.0, 1.3),
            ShapeRequest::Cylinder { radius: 17.0, height: 1.3 }
        );
    }

    #[test]
    fn test_static_shape_has_zero_inertia() {
        let shape = ShapeFactory::default()
            .build(ShapeRequest::Cylinder { radius: 17.0, height: 1.3 }, 0.0)
            .unwrap();

        assert!(shape.is_static());
        assert_eq!(shape.local_inertia(), Vec3::zeros());
    }

    #[test]
    fn test_sphere_inertia() {
        let shape = ShapeFactory::default()
            .build(ShapeRequest::Sphere { radius: 2.0 }, 5.0)
            .unwrap();

        // 2/5 * 5 * 4
        assert_relative_eq!(shape.local_inertia(), Vec3::new(8.0, 8.0, 8.0), epsilon = 1e-5);
    }

    #[test]
    fn test_cylinder_inertia() {
        let inertia = ShapeRequest::Cylinder { radius: 1.0, height: 2.0 }.local_inertia(6.0);

        // lateral: 6 * (3 + 4) / 12, axial: 6 / 2
        assert_relative_eq!(inertia, Vec3::new(3.5, 3.0, 3.5), epsilon = 1e-5);
    }

    #[test]
    fn test_margin_is_recorded() {
        let factory = ShapeFactory::new(0.05);
        let shape = factory.build(ShapeRequest::Sphere { radius: 1.0 }, 1.0).unwrap();
        assert_relative_eq!(shape.margin(), 0.05);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let factory = ShapeFactory::default();

        assert!(matches!(
            factory.build(ShapeRequest::Sphere { radius: 0.0 }, 1.0),
            Err(PhysicsError::InvalidShape { kind: "sphere", .. })
        ));
        assert!(matches!(
            factory.build(ShapeRequest::Sphere { radius: -1.0 }, 1.0),
            Err(PhysicsError::InvalidShape { .. })
        ));
        assert!(matches!(
            factory.build(ShapeRequest::Cylinder { radius: 1.0, height: 0.0 }, 0.0),
            Err(PhysicsError::InvalidShape { kind: "cylinder", .. })
        ));
        assert!(matches!(
            factory.build(ShapeRequest::Cylinder { radius: f32::NAN, height: 1.0 }, 0.0),
            Err(PhysicsError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_mass() {
        let factory = ShapeFactory::default();
        assert_eq!(
            factory.build(ShapeRequest::Sphere { radius: 1.0 }, -1.0),
            Err(PhysicsError::InvalidMass(-1.0))
        );
    }
}
