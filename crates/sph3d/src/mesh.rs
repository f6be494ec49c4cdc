//! Static triangle mesh boundary (the tube wall).
//!
//! The mesh is an open surface, so there is no inside/outside test. A particle
//! collides when it comes within one particle radius of the nearest surface point;
//! it is pushed straight away from that point back to that distance. On a face
//! that is along the normal, at the open rim it is away from the edge.

use glam::Vec3;

use crate::error::{Result, SphError};

/// Nearest point on the mesh surface to a query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    /// Unit face normal of the triangle containing `point` (winding order, not
    /// oriented toward the query)
    pub normal: Vec3,
    pub distance_sq: f32,
}

/// Immutable collision mesh. Built once and validated at construction.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    /// Unit face normals; zero for zero-area triangles, which are never hit
    normals: Vec<Vec3>,
    aabb_min: Vec3,
    aabb_max: Vec3,
}

impl TriangleMesh {
    /// Build from a vertex buffer and a flat index buffer (three indices per
    /// triangle), the layout mesh assets and GPU buffers use.
    pub fn from_buffers(vertices: Vec<Vec3>, indices: &[u32]) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(SphError::boundary(format!(
                "mesh index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();
        Self::from_triangles(vertices, triangles)
    }

    pub fn from_triangles(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(SphError::boundary("mesh has no vertices"));
        }
        if triangles.is_empty() {
            return Err(SphError::boundary("mesh has no triangles"));
        }
        if let Some(bad) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(SphError::boundary(format!("mesh vertex {bad} is not finite")));
        }
        for (t, tri) in triangles.iter().enumerate() {
            if let Some(&idx) = tri.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(SphError::boundary(format!(
                    "triangle {t} references vertex {idx}, mesh has {}",
                    vertices.len()
                )));
            }
        }

        let normals: Vec<Vec3> = triangles
            .iter()
            .map(|&[a, b, c]| {
                let (a, b, c) = (vertices[a as usize], vertices[b as usize], vertices[c as usize]);
                (b - a).cross(c - a).normalize_or_zero()
            })
            .collect();

        if normals.iter().all(|n| *n == Vec3::ZERO) {
            return Err(SphError::boundary("every mesh triangle has zero area"));
        }

        let (aabb_min, aabb_max) = vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        );

        Ok(Self {
            vertices,
            triangles,
            normals,
            aabb_min,
            aabb_max,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.aabb_min, self.aabb_max)
    }

    /// Nearest surface point over all non-degenerate triangles.
    pub fn closest_point(&self, point: Vec3) -> Option<SurfaceHit> {
        let mut best: Option<SurfaceHit> = None;

        for (t, &[a, b, c]) in self.triangles.iter().enumerate() {
            let normal = self.normals[t];
            if normal == Vec3::ZERO {
                continue;
            }
            let closest = closest_point_on_triangle(
                point,
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            );
            let distance_sq = (point - closest).length_squared();
            if best.map_or(true, |hit| distance_sq < hit.distance_sq) {
                best = Some(SurfaceHit {
                    point: closest,
                    normal,
                    distance_sq,
                });
            }
        }

        best
    }

    /// Keep a particle at least `particle_radius` away from the surface.
    pub fn collide(
        &self,
        position: &mut Vec3,
        velocity: &mut Vec3,
        particle_radius: f32,
        bound_damping: f32,
    ) {
        let margin = Vec3::splat(particle_radius);
        if position.cmplt(self.aabb_min - margin).any() || position.cmpgt(self.aabb_max + margin).any()
        {
            return;
        }

        let Some(hit) = self.closest_point(*position) else {
            return;
        };
        if hit.distance_sq >= particle_radius * particle_radius {
            return;
        }

        // Face the normal toward the particle's side of the wall
        let offset = *position - hit.point;
        let face_normal = if offset.dot(hit.normal) < 0.0 {
            -hit.normal
        } else {
            hit.normal
        };
        // Off the face interior the nearest point is on an edge or vertex
        let normal = offset.normalize_or(face_normal);

        *position = hit.point + normal * particle_radius;

        let vn = velocity.dot(normal);
        if vn < 0.0 {
            *velocity += normal * (vn * bound_damping - vn);
        }
    }
}

/// Closest point on triangle `abc` to `p` (Ericson, Real-Time Collision Detection 5.1.5).
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    // Inside the face
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
