//! Particle record and the initial lattice spawn.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::constants::{PARTICLE_STRIDE, SPAWN_JITTER_FRACTION};

/// A single fluid particle.
///
/// Field order and size match the buffer layout consumed by renderers and
/// compute kernels: `pressure, density, force[3], velocity[3], position[3]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Recomputed each step from density; may be negative
    pub pressure: f32,
    /// Recomputed each step from neighbor positions
    pub density: f32,
    /// Net force accumulated this step
    pub current_force: Vec3,
    pub velocity: Vec3,
    pub position: Vec3,
}

const _: () = assert!(std::mem::size_of::<Particle>() == PARTICLE_STRIDE);

impl Particle {
    /// Create a stationary particle at the given position.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Create a particle with the given position and velocity.
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            ..Self::default()
        }
    }

    /// True when every scalar in the record is finite.
    pub fn is_finite(&self) -> bool {
        self.pressure.is_finite()
            && self.density.is_finite()
            && self.current_force.is_finite()
            && self.velocity.is_finite()
            && self.position.is_finite()
    }
}

/// Uniformly distributed point on the unit sphere surface.
fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let phi: f32 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Spawn the initial particle lattice.
///
/// Particles are laid out x-major, then y, then z, starting from the spawn region's
/// minimum corner with spacing `2 * particle_radius`. Each gets a jitter of length
/// `0.1 * particle_radius` in a random direction so no two neighbor distances are
/// exactly equal. The jitter is seeded from the config, so a spawn is reproducible.
///
/// The config must already be validated.
pub fn spawn(config: &SimulationConfig) -> Vec<Particle> {
    let counts = config.spawn_counts;
    let origin = config.spawn_origin();
    let spacing = 2.0 * config.particle_radius;
    let jitter = SPAWN_JITTER_FRACTION * config.particle_radius;

    let mut rng = StdRng::seed_from_u64(config.jitter_seed);
    let mut particles = Vec::with_capacity(config.particle_count());

    for x in 0..counts.x {
        for y in 0..counts.y {
            for z in 0..counts.z {
                let lattice = Vec3::new(x as f32, y as f32, z as f32) * spacing;
                let offset = random_unit_vector(&mut rng) * jitter;
                particles.push(Particle::at(origin + lattice + offset));
            }
        }
    }

    particles
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec3;

    #[test]
    fn test_particle_layout() {
        assert_eq!(std::mem::size_of::<Particle>(), 44);
        assert_eq!(std::mem::align_of::<Particle>(), 4);

        let p = Particle {
            pressure: 1.0,
            density: 2.0,
            current_force: Vec3::new(3.0, 4.0, 5.0),
            velocity: Vec3::new(6.0, 7.0, 8.0),
            position: Vec3::new(9.0, 10.0, 11.0),
        };
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&p));
        let expected: Vec<f32> = (1..=11).map(|i| i as f32).collect();
        assert_eq!(floats, expected.as_slice());
    }

    #[test]
    fn test_spawn_count_and_initial_state() {
        let config = SimulationConfig::default().with_spawn_counts(UVec3::new(3, 4, 5));
        let particles = spawn(&config);
        assert_eq!(particles.len(), 60);

        for p in &particles {
            assert_eq!(p.velocity, Vec3::ZERO);
            assert_eq!(p.current_force, Vec3::ZERO);
            assert_eq!(p.pressure, 0.0);
        }
    }

    #[test]
    fn test_spawn_jitter_length() {
        let config = SimulationConfig::default().with_spawn_counts(UVec3::new(4, 4, 4));
        let particles = spawn(&config);
        let origin = config.spawn_origin();
        let spacing = 2.0 * config.particle_radius;
        let jitter = SPAWN_JITTER_FRACTION * config.particle_radius;

        let mut idx = 0;
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    let lattice = origin + Vec3::new(x as f32, y as f32, z as f32) * spacing;
                    let offset = (particles[idx].position - lattice).length();
                    assert!(
                        (offset - jitter).abs() < 1e-5,
                        "particle {} jitter length {} != {}",
                        idx,
                        offset,
                        jitter
                    );
                    idx += 1;
                }
            }
        }
    }

    #[test]
    fn test_spawn_within_region() {
        let config = SimulationConfig::default().with_spawn_counts(UVec3::new(5, 5, 5));
        let jitter = SPAWN_JITTER_FRACTION * config.particle_radius;
        let lo = config.spawn_center - config.spawn_extent * 0.5 - Vec3::splat(jitter + 1e-5);
        let hi = config.spawn_center + config.spawn_extent * 0.5 + Vec3::splat(jitter + 1e-5);

        for p in spawn(&config) {
            assert!(p.position.cmpge(lo).all() && p.position.cmple(hi).all(), "{}", p.position);
        }
    }

    #[test]
    fn test_spawn_is_reproducible() {
        let config = SimulationConfig::default().with_spawn_counts(UVec3::new(2, 3, 2));
        assert_eq!(spawn(&config), spawn(&config));

        let reseeded = config.clone().with_jitter_seed(config.jitter_seed + 1);
        assert_ne!(spawn(&config), spawn(&reseeded));
    }

    #[test]
    fn test_unit_vectors_cover_sphere() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sum = Vec3::ZERO;
        for _ in 0..2000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5);
            sum += v;
        }
        // Mean of a uniform sphere sample tends to zero
        assert!((sum / 2000.0).length() < 0.1);
    }
}
