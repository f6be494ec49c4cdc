//! Test Geometry for Boundary Collision
//!
//! Parametric meshes for exercising mesh collision in tests and the demo:
//! - `tube_buffers`: raw vertex/index buffers of an open cylinder
//! - `tube_mesh`: the same cylinder as a validated `TriangleMesh`
//!
//! The tube stands on the y = 0 plane around the Y axis. Each height level is a
//! ring of `radial_segments + 1` vertices (the seam vertex is duplicated, so ring
//! index `radial_segments` sits on top of index 0), and every quad between two rings
//! is split into two triangles.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::error::Result;
use crate::mesh::TriangleMesh;

/// Vertex and index buffers of an open cylinder.
pub fn tube_buffers(
    radius: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> (Vec<Vec3>, Vec<u32>) {
    let ring = radial_segments + 1;
    let mut vertices = Vec::with_capacity((ring * (height_segments + 1)) as usize);
    let mut indices = Vec::with_capacity((radial_segments * height_segments * 6) as usize);

    let angle_step = if radial_segments > 0 {
        TAU / radial_segments as f32
    } else {
        0.0
    };
    let height_step = if height_segments > 0 {
        height / height_segments as f32
    } else {
        0.0
    };

    for i in 0..=height_segments {
        let y = i as f32 * height_step;
        for j in 0..=radial_segments {
            let angle = j as f32 * angle_step;
            vertices.push(Vec3::new(angle.cos() * radius, y, angle.sin() * radius));

            if i < height_segments && j < radial_segments {
                let start = i * ring + j;
                let next = start + ring;
                indices.extend_from_slice(&[start, next, start + 1, start + 1, next, next + 1]);
            }
        }
    }

    (vertices, indices)
}

/// Open cylinder as a collision mesh.
///
/// Fails with `DegenerateBoundary` when the parameters produce no usable
/// triangles (zero segments, or zero radius or height).
pub fn tube_mesh(
    radius: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> Result<TriangleMesh> {
    let (vertices, indices) = tube_buffers(radius, height, radial_segments, height_segments);
    TriangleMesh::from_buffers(vertices, &indices)
}
