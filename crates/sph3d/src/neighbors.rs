//! Uniform-grid neighbor search over the domain box.
//!
//! Cells are at least one smoothing radius wide, so every neighbor of a particle
//! lies in the 3x3x3 block of cells around it. Positions outside the box are
//! clamped into the edge cells. Clamping never moves two points further apart,
//! so the 27-cell stencil still finds every pair within the radius.

use glam::{IVec3, Vec3};

use crate::particle::Particle;

/// Upper bound on grid cells. Tiny radii in a large box fall back to wider cells.
const MAX_CELLS: usize = 1 << 21;

pub(crate) struct NeighborGrid {
    origin: Vec3,
    cell_size: f32,
    dims: IVec3,
    /// First particle in each cell, -1 when empty
    grid_heads: Vec<i32>,
    /// Next particle in the same cell, -1 at the end of the chain
    grid_next: Vec<i32>,
}

impl NeighborGrid {
    pub(crate) fn new(half_extents: Vec3, smoothing_radius: f32) -> Self {
        let size = half_extents * 2.0;
        let mut cell_size = smoothing_radius;
        let mut dims = cell_dims(size, cell_size);

        while cell_count(dims) > MAX_CELLS {
            cell_size *= 2.0;
            dims = cell_dims(size, cell_size);
        }

        Self {
            origin: -half_extents,
            cell_size,
            dims,
            grid_heads: vec![-1; cell_count(dims)],
            grid_next: Vec::new(),
        }
    }

    pub(crate) fn rebuild(&mut self, particles: &[Particle]) {
        self.grid_heads.fill(-1);
        self.grid_next.clear();
        self.grid_next.resize(particles.len(), -1);

        for (i, p) in particles.iter().enumerate() {
            let cell = self.flat_index(self.cell_of(p.position));
            self.grid_next[i] = self.grid_heads[cell];
            self.grid_heads[cell] = i as i32;
        }
    }

    /// Cell coordinate of a position, clamped into the grid. NaN lands in cell 0.
    fn cell_of(&self, position: Vec3) -> IVec3 {
        let rel = (position - self.origin) / self.cell_size;
        // `as` saturates and maps NaN to 0
        let raw = IVec3::new(rel.x.floor() as i32, rel.y.floor() as i32, rel.z.floor() as i32);
        raw.clamp(IVec3::ZERO, self.dims - IVec3::ONE)
    }

    fn flat_index(&self, cell: IVec3) -> usize {
        (cell.x + self.dims.x * (cell.y + self.dims.y * cell.z)) as usize
    }

    /// Call `f` with every particle index in the 27 cells around `position`.
    pub(crate) fn for_each_candidate(&self, position: Vec3, mut f: impl FnMut(usize)) {
        let center = self.cell_of(position);
        let lo = (center - IVec3::ONE).max(IVec3::ZERO);
        let hi = (center + IVec3::ONE).min(self.dims - IVec3::ONE);

        for z in lo.z..=hi.z {
            for y in lo.y..=hi.y {
                for x in lo.x..=hi.x {
                    let mut j = self.grid_heads[self.flat_index(IVec3::new(x, y, z))];
                    while j >= 0 {
                        f(j as usize);
                        j = self.grid_next[j as usize];
                    }
                }
            }
        }
    }
}

fn cell_dims(size: Vec3, cell_size: f32) -> IVec3 {
    let cells = (size / cell_size).ceil().max(Vec3::ONE);
    // Cap each axis before the cast so huge boxes cannot overflow i32
    let cells = cells.min(Vec3::splat(MAX_CELLS as f32));
    IVec3::new(cells.x as i32, cells.y as i32, cells.z as i32)
}

fn cell_count(dims: IVec3) -> usize {
    dims.x as usize * dims.y as usize * dims.z as usize
}

/// Which particles a stage must test against a query position.
#[derive(Clone, Copy)]
pub(crate) enum Candidates<'a> {
    /// Every particle, for `NeighborSearch::BruteForce`
    All(usize),
    Grid(&'a NeighborGrid),
}

impl Candidates<'_> {
    pub(crate) fn for_each(&self, position: Vec3, mut f: impl FnMut(usize)) {
        match self {
            Candidates::All(count) => (0..*count).for_each(&mut f),
            Candidates::Grid(grid) => grid.for_each_candidate(position, f),
        }
    }
}
