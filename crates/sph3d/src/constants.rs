//! Physical constants and scene defaults for the SPH simulation.
//!
//! ## Units
//!
//! The simulation is unit-agnostic, but the defaults describe the tube demo scene:
//! lengths in meters, time in seconds, and a normalized fluid where the resting
//! density is 1.0 and each particle has unit mass.

use glam::{UVec3, Vec3};

/// Gravity acceleration (m/s^2) - negative Y direction
pub const GRAVITY: f32 = -9.81;

/// Gravity as a vector.
pub const GRAVITY_VEC: Vec3 = Vec3::new(0.0, GRAVITY, 0.0);

/// Size in bytes of one particle record in the shared buffer.
pub const PARTICLE_STRIDE: usize = 44;

// =============================================================================
// SCENE DEFAULTS
// =============================================================================

/// Particles spawned per axis.
pub const DEFAULT_SPAWN_COUNTS: UVec3 = UVec3::new(10, 10, 10);

/// Full size of the containing box, centered on the origin.
pub const DEFAULT_BOX_SIZE: Vec3 = Vec3::new(4.0, 10.0, 3.0);

/// Center of the spawn region.
pub const DEFAULT_SPAWN_CENTER: Vec3 = Vec3::new(0.0, 3.0, 0.0);

/// Full size of the spawn region.
pub const DEFAULT_SPAWN_EXTENT: Vec3 = Vec3::new(4.0, 2.0, 1.5);

/// Particle radius. Grid spacing at spawn is twice this.
pub const DEFAULT_PARTICLE_RADIUS: f32 = 0.1;

/// Kernel support radius (h).
pub const DEFAULT_SMOOTHING_RADIUS: f32 = 0.1;

/// Jitter length as a fraction of the particle radius.
pub const SPAWN_JITTER_FRACTION: f32 = 0.1;

// =============================================================================
// FLUID DEFAULTS
// =============================================================================

pub const DEFAULT_PARTICLE_MASS: f32 = 1.0;

/// Viscosity coefficient. Negative in the demo scene.
pub const DEFAULT_VISCOSITY: f32 = -0.003;

pub const DEFAULT_GAS_CONSTANT: f32 = 2.0;

pub const DEFAULT_RESTING_DENSITY: f32 = 1.0;

/// Velocity multiplier applied on wall contact. Must lie in [-1, 0].
pub const DEFAULT_BOUND_DAMPING: f32 = -0.3;

/// Fixed timestep (s).
pub const DEFAULT_TIMESTEP: f32 = 0.0001;

/// Seed for the spawn jitter.
pub const DEFAULT_JITTER_SEED: u64 = 0x5EED;
