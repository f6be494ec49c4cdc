//! 3D SPH Fluid Simulation
//!
//! A CPU implementation of Smoothed Particle Hydrodynamics (Müller et al. 2003):
//! poly6 density, linear equation of state, spiky pressure gradient, viscosity
//! Laplacian, and semi-implicit Euler integration with collisions against a box,
//! a movable sphere and a static triangle mesh.
//!
//! Each step runs three data-parallel stages over every particle, with a barrier
//! between them:
//! 1. density and pressure
//! 2. pressure, viscosity and gravity forces
//! 3. integration and collision
//!
//! # Example
//!
//! ```
//! use sph3d::{BoundaryGeometry, SimulationConfig, SphSimulation, Sphere};
//! use glam::{UVec3, Vec3};
//!
//! let config = SimulationConfig::default().with_spawn_counts(UVec3::new(4, 4, 4));
//! let geometry = BoundaryGeometry::new().with_sphere(Sphere::new(Vec3::ZERO, 0.5));
//! let mut sim = SphSimulation::new(config, geometry).unwrap();
//!
//! sim.step_n(10).unwrap();
//! assert_eq!(sim.particles().len(), 64);
//! assert_eq!(sim.particle_bytes().len(), 64 * 44);
//! ```

pub mod boundary;
pub mod config;
pub mod constants;
mod density;
pub mod error;
mod forces;
mod integrate;
pub mod kernels;
pub mod mesh;
pub mod metrics;
mod neighbors;
pub mod particle;
pub mod serde_utils;
pub mod test_geometry;

pub use boundary::{BoundaryGeometry, DomainBox, Sphere};
pub use config::{NeighborSearch, SimulationConfig};
pub use error::{Result, SphError};
pub use glam::Vec3;
pub use kernels::KernelConstants;
pub use mesh::TriangleMesh;
pub use metrics::StepMetrics;
pub use particle::Particle;

use log::{debug, error, info, log_enabled, warn, Level};
use rayon::prelude::*;

use neighbors::{Candidates, NeighborGrid};

/// 3D SPH fluid simulation.
///
/// Owns the configuration, the particle array and the boundary geometry. The
/// particle count is fixed at construction; particle `i` keeps index `i` for the
/// lifetime of the simulation.
pub struct SphSimulation {
    config: SimulationConfig,
    /// Derived once from `config.smoothing_radius`
    kernel: KernelConstants,
    domain: DomainBox,
    geometry: BoundaryGeometry,
    particles: Vec<Particle>,

    /// `None` in brute-force mode
    grid: Option<NeighborGrid>,

    /// Steps completed
    frame: u64,
    /// Simulated time (s)
    elapsed: f64,
}

impl SphSimulation {
    /// Validate the configuration and geometry, then spawn the particle lattice.
    pub fn new(config: SimulationConfig, geometry: BoundaryGeometry) -> Result<Self> {
        config.validate()?;
        let particles = particle::spawn(&config);
        Self::from_particles(config, geometry, particles)
    }

    /// Start from an existing particle array instead of the spawn lattice.
    ///
    /// Used to restore a saved state or to set up hand-placed scenarios.
    pub fn from_particles(
        config: SimulationConfig,
        geometry: BoundaryGeometry,
        particles: Vec<Particle>,
    ) -> Result<Self> {
        config.validate()?;
        geometry.validate()?;

        let kernel = KernelConstants::new(config.smoothing_radius);
        let domain = DomainBox::from_size(config.box_size);
        let grid = match config.neighbor_search {
            NeighborSearch::Grid => Some(NeighborGrid::new(domain.half_extents, kernel.h)),
            NeighborSearch::BruteForce => None,
        };

        info!(
            "SPH init: {} particles, h={} (poly6={:.6e}, spiky={:.6e}, visc={:.6e}), box={}, dt={}, {:?} search",
            particles.len(),
            kernel.h,
            kernel.density_weight,
            kernel.spiky_gradient,
            kernel.visc_laplacian,
            config.box_size,
            config.timestep,
            config.neighbor_search,
        );
        if let Some(sphere) = &geometry.sphere {
            info!("SPH init: sphere at {} r={}", sphere.center, sphere.radius);
        }
        if let Some(mesh) = &geometry.mesh {
            info!(
                "SPH init: mesh with {} vertices, {} triangles",
                mesh.vertices().len(),
                mesh.triangle_count()
            );
        }

        Ok(Self {
            config,
            kernel,
            domain,
            geometry,
            particles,
            grid,
            frame: 0,
            elapsed: 0.0,
        })
    }

    /// Advance the simulation by one timestep.
    ///
    /// Geometry is checked before any particle is touched, so an `Err` leaves the
    /// particle array exactly as it was.
    pub fn step(&mut self) -> Result<()> {
        if let Err(err) = self.geometry.validate() {
            error!("SPH step {} rejected: {}", self.frame, err);
            return Err(err);
        }

        // Positions only change in the last stage, so one rebuild serves both
        // neighbor passes
        let candidates = match &mut self.grid {
            Some(grid) => {
                grid.rebuild(&self.particles);
                Candidates::Grid(grid)
            }
            None => Candidates::All(self.particles.len()),
        };

        density::compute_density_pressure(&mut self.particles, &self.config, &self.kernel, candidates);
        forces::compute_forces(&mut self.particles, &self.config, &self.kernel, candidates);
        integrate::integrate(&mut self.particles, &self.config, &self.domain, &self.geometry);

        self.frame += 1;
        self.elapsed += self.config.timestep as f64;

        let non_finite = self.particles.par_iter().filter(|p| !p.is_finite()).count();
        if non_finite > 0 {
            warn!(
                "SPH step {}: {} of {} particles have non-finite state",
                self.frame,
                non_finite,
                self.particles.len()
            );
        }
        if log_enabled!(Level::Debug) {
            debug!("SPH step {}: {}", self.frame, self.metrics());
        }

        Ok(())
    }

    /// Run `n` steps, stopping at the first error.
    pub fn step_n(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Move, resize or remove the sphere obstacle before the next step.
    ///
    /// An invalid sphere is rejected and the previous one stays in place.
    pub fn set_sphere(&mut self, sphere: Option<Sphere>) -> Result<()> {
        if let Some(sphere) = &sphere {
            sphere.validate()?;
        }
        self.geometry.sphere = sphere;
        Ok(())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The particle array as raw bytes in the 44-byte record layout.
    pub fn particle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn kernel(&self) -> &KernelConstants {
        &self.kernel
    }

    pub fn domain(&self) -> &DomainBox {
        &self.domain
    }

    pub fn geometry(&self) -> &BoundaryGeometry {
        &self.geometry
    }

    /// Number of completed steps.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn metrics(&self) -> StepMetrics {
        StepMetrics::from_particles(&self.particles)
    }

    /// True when every particle's pressure, density, force, velocity and position is finite.
    pub fn all_finite(&self) -> bool {
        self.particles.par_iter().all(|p| p.is_finite())
    }
}
