//! Boundary geometry and collision response.
//!
//! Three boundaries are resolved after integration, always in this order:
//! - the domain box (particles kept inside)
//! - a movable sphere obstacle (particles kept outside)
//! - an optional static triangle mesh (see [`crate::mesh`])
//!
//! Every response uses the same rule: move the particle back onto the surface, then scale the velocity component pointing into the surface by
//! `bound_damping`, a coefficient in [-1, 0]. The negative sign flips the
//! component; its magnitude is the fraction of speed kept.

use glam::Vec3;

use crate::error::{Result, SphError};
use crate::mesh::TriangleMesh;

/// Axis-aligned containing box centered on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainBox {
    pub half_extents: Vec3,
}

impl DomainBox {
    /// Box from its full size.
    pub fn from_size(size: Vec3) -> Self {
        Self {
            half_extents: size * 0.5,
        }
    }

    /// Check if a point is inside the box (walls included).
    pub fn contains(&self, point: Vec3) -> bool {
        point.abs().cmple(self.half_extents).all()
    }

    /// Clamp a particle that crossed any of the six walls back onto it.
    pub fn collide(&self, position: &mut Vec3, velocity: &mut Vec3, bound_damping: f32) {
        let limit = self.half_extents;

        for axis in 0..3 {
            if position[axis] < -limit[axis] {
                position[axis] = -limit[axis];
                if velocity[axis] < 0.0 {
                    velocity[axis] *= bound_damping;
                }
            } else if position[axis] > limit[axis] {
                position[axis] = limit[axis];
                if velocity[axis] > 0.0 {
                    velocity[axis] *= bound_damping;
                }
            }
        }
    }
}

/// Spherical obstacle. Its pose is owned by the caller and may change between steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Get signed distance to the sphere surface.
    /// Negative = inside, positive = outside.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.center).length() - self.radius
    }

    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() {
            return Err(SphError::boundary(format!(
                "sphere center must be finite, got {}",
                self.center
            )));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(SphError::boundary(format!(
                "sphere radius must be finite and non-negative, got {}",
                self.radius
            )));
        }
        Ok(())
    }

    /// Push a particle that is strictly inside the sphere out to its surface.
    ///
    /// A particle exactly at the center has no outward direction; it is pushed
    /// along +Y.
    pub fn collide(&self, position: &mut Vec3, velocity: &mut Vec3, bound_damping: f32) {
        let offset = *position - self.center;
        let dist = offset.length();

        if dist >= self.radius {
            return;
        }

        let normal = if dist > 1e-6 { offset / dist } else { Vec3::Y };
        *position = self.center + normal * self.radius;

        let vn = velocity.dot(normal);
        if vn < 0.0 {
            // Keep the tangential part, damp and flip the normal part
            *velocity += normal * (vn * bound_damping - vn);
        }
    }
}

/// Static and per-step collision geometry supplied by the host.
///
/// The mesh is validated when it is built and never changes afterwards. The sphere
/// may be replaced between steps.
#[derive(Clone, Debug, Default)]
pub struct BoundaryGeometry {
    pub sphere: Option<Sphere>,
    pub mesh: Option<TriangleMesh>,
}

impl BoundaryGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sphere(mut self, sphere: Sphere) -> Self {
        self.sphere = Some(sphere);
        self
    }

    pub fn with_mesh(mut self, mesh: TriangleMesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(sphere) = &self.sphere {
            sphere.validate()?;
        }
        Ok(())
    }
}
