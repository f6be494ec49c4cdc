//! Simulation configuration: spawn layout, fluid constants, domain and timestep.
//!
//! The configuration is immutable for the lifetime of a simulation. Kernel constants
//! are derived from it once (see [`crate::kernels::KernelConstants`]) and are not
//! part of the serialized form.

use std::path::Path;

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Result, SphError};
use crate::kernels::KernelConstants;
use crate::serde_utils::{UVec3Def, Vec3Def};

/// How the density and force stages find neighbors.
///
/// Both modes produce the same result up to floating-point summation order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborSearch {
    /// Uniform grid with cell size `h`, 27-cell stencil.
    #[default]
    Grid,
    /// All pairs. O(n²), kept as the reference for the grid.
    BruteForce,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Particles per axis in the initial lattice
    #[serde(with = "UVec3Def")]
    pub spawn_counts: UVec3,
    #[serde(with = "Vec3Def")]
    pub spawn_center: Vec3,
    /// Full size of the spawn region
    #[serde(with = "Vec3Def")]
    pub spawn_extent: Vec3,
    pub particle_radius: f32,
    pub jitter_seed: u64,

    pub particle_mass: f32,
    pub viscosity: f32,
    pub gas_constant: f32,
    pub resting_density: f32,
    /// Multiplier for the velocity component into a wall; in [-1, 0]
    pub bound_damping: f32,
    pub smoothing_radius: f32,
    #[serde(with = "Vec3Def")]
    pub gravity: Vec3,

    /// Full size of the containing box, centered on the origin
    #[serde(with = "Vec3Def")]
    pub box_size: Vec3,
    pub timestep: f32,

    pub neighbor_search: NeighborSearch,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spawn_counts: DEFAULT_SPAWN_COUNTS,
            spawn_center: DEFAULT_SPAWN_CENTER,
            spawn_extent: DEFAULT_SPAWN_EXTENT,
            particle_radius: DEFAULT_PARTICLE_RADIUS,
            jitter_seed: DEFAULT_JITTER_SEED,
            particle_mass: DEFAULT_PARTICLE_MASS,
            viscosity: DEFAULT_VISCOSITY,
            gas_constant: DEFAULT_GAS_CONSTANT,
            resting_density: DEFAULT_RESTING_DENSITY,
            bound_damping: DEFAULT_BOUND_DAMPING,
            smoothing_radius: DEFAULT_SMOOTHING_RADIUS,
            gravity: GRAVITY_VEC,
            box_size: DEFAULT_BOX_SIZE,
            timestep: DEFAULT_TIMESTEP,
            neighbor_search: NeighborSearch::Grid,
        }
    }
}

impl SimulationConfig {
    pub fn with_spawn_counts(mut self, counts: UVec3) -> Self {
        self.spawn_counts = counts;
        self
    }

    pub fn with_spawn_region(mut self, center: Vec3, extent: Vec3) -> Self {
        self.spawn_center = center;
        self.spawn_extent = extent;
        self
    }

    pub fn with_particle_radius(mut self, radius: f32) -> Self {
        self.particle_radius = radius;
        self
    }

    pub fn with_smoothing_radius(mut self, h: f32) -> Self {
        self.smoothing_radius = h;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_viscosity(mut self, viscosity: f32) -> Self {
        self.viscosity = viscosity;
        self
    }

    pub fn with_particle_mass(mut self, mass: f32) -> Self {
        self.particle_mass = mass;
        self
    }

    pub fn with_gas_constant(mut self, k: f32) -> Self {
        self.gas_constant = k;
        self
    }

    pub fn with_resting_density(mut self, rho0: f32) -> Self {
        self.resting_density = rho0;
        self
    }

    pub fn with_bound_damping(mut self, damping: f32) -> Self {
        self.bound_damping = damping;
        self
    }

    pub fn with_box_size(mut self, size: Vec3) -> Self {
        self.box_size = size;
        self
    }

    pub fn with_timestep(mut self, dt: f32) -> Self {
        self.timestep = dt;
        self
    }

    pub fn with_neighbor_search(mut self, mode: NeighborSearch) -> Self {
        self.neighbor_search = mode;
        self
    }

    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = seed;
        self
    }

    /// Total number of particles the spawn will produce.
    pub fn particle_count(&self) -> usize {
        self.spawn_counts.x as usize * self.spawn_counts.y as usize * self.spawn_counts.z as usize
    }

    /// Box half-extents.
    pub fn half_extents(&self) -> Vec3 {
        self.box_size * 0.5
    }

    /// Minimum corner of the spawn region. The lattice grows from here.
    pub fn spawn_origin(&self) -> Vec3 {
        self.spawn_center - self.spawn_extent * 0.5
    }

    /// Check every field. Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        positive("timestep", self.timestep)?;
        positive("smoothing_radius", self.smoothing_radius)?;
        positive("particle_radius", self.particle_radius)?;
        positive("particle_mass", self.particle_mass)?;

        let kernel = KernelConstants::new(self.smoothing_radius);
        if !kernel.is_representable() {
            return Err(SphError::config(format!(
                "smoothing_radius {} is out of range for f32 kernel constants",
                self.smoothing_radius
            )));
        }
        // Every density is at least the particle's own contribution
        let self_term = self.particle_mass * kernel.self_density();
        if !self_term.is_finite() || self_term <= 0.0 {
            return Err(SphError::config(format!(
                "particle_mass {} with smoothing_radius {} gives self density {}",
                self.particle_mass, self.smoothing_radius, self_term
            )));
        }

        if self.spawn_counts.cmpeq(UVec3::ZERO).any() {
            return Err(SphError::config(format!(
                "spawn_counts must be positive on every axis, got {}",
                self.spawn_counts
            )));
        }
        if self.particle_count() > u32::MAX as usize {
            return Err(SphError::config("spawn_counts overflow the particle index range"));
        }

        finite_vec("spawn_center", self.spawn_center)?;
        finite_vec("spawn_extent", self.spawn_extent)?;
        if self.spawn_extent.cmplt(Vec3::ZERO).any() {
            return Err(SphError::config(format!(
                "spawn_extent must be non-negative, got {}",
                self.spawn_extent
            )));
        }

        finite_vec("box_size", self.box_size)?;
        if self.box_size.cmple(Vec3::ZERO).any() {
            return Err(SphError::config(format!(
                "box_size must be positive on every axis, got {}",
                self.box_size
            )));
        }

        finite_vec("gravity", self.gravity)?;
        finite("viscosity", self.viscosity)?;
        finite("gas_constant", self.gas_constant)?;
        finite("resting_density", self.resting_density)?;

        if !(-1.0..=0.0).contains(&self.bound_damping) {
            return Err(SphError::config(format!(
                "bound_damping must lie in [-1, 0], got {}",
                self.bound_damping
            )));
        }

        Ok(())
    }

    /// Save config to a JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load config from a JSON file. Missing fields take their defaults.
    ///
    /// The loaded config is not validated here; validation happens when a
    /// simulation is built from it.
    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}

fn finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SphError::config(format!("{name} must be finite, got {value}")))
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SphError::config(format!("{name} must be positive, got {value}")))
    }
}

fn finite_vec(name: &str, value: Vec3) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SphError::config(format!("{name} must be finite, got {value}")))
    }
}
