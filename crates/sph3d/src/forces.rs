//! Pressure, viscosity and gravity forces.

use glam::Vec3;
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::kernels::{spiky_gradient, viscosity_laplacian, KernelConstants};
use crate::neighbors::Candidates;
use crate::particle::Particle;

/// Accumulate the net force on every particle from the current densities and
/// pressures.
///
/// Reads only the state left by the density stage and writes only
/// `current_force`, so every particle sees the same snapshot.
pub(crate) fn compute_forces(
    particles: &mut [Particle],
    config: &SimulationConfig,
    kernel: &KernelConstants,
    candidates: Candidates,
) {
    let mass = config.particle_mass;
    let snapshot: &[Particle] = particles;

    let forces: Vec<Vec3> = snapshot
        .par_iter()
        .enumerate()
        .map(|(i, p_i)| {
            let mut pressure_force = Vec3::ZERO;
            let mut viscosity_force = Vec3::ZERO;

            candidates.for_each(p_i.position, |j| {
                if j == i {
                    return;
                }
                let p_j = &snapshot[j];
                let delta = p_i.position - p_j.position;
                let r2 = delta.length_squared();
                if r2 >= kernel.h2 {
                    return;
                }
                let r = r2.sqrt();

                // Coincident particles have no direction to push along
                if r > 0.0 {
                    let dir = delta / r;
                    pressure_force += -dir * mass * (p_i.pressure + p_j.pressure)
                        / (2.0 * p_j.density)
                        * spiky_gradient(r, kernel);
                }

                viscosity_force += config.viscosity * mass * (p_j.velocity - p_i.velocity)
                    / p_j.density
                    * viscosity_laplacian(r, kernel);
            });

            pressure_force + viscosity_force + config.gravity * p_i.density
        })
        .collect();

    particles
        .par_iter_mut()
        .zip(forces)
        .for_each(|(p, force)| p.current_force = force);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::compute_density_pressure;

    fn prepared(particles: &mut [Particle], config: &SimulationConfig) -> KernelConstants {
        let kernel = KernelConstants::new(config.smoothing_radius);
        let n = particles.len();
        compute_density_pressure(particles, config, &kernel, Candidates::All(n));
        kernel
    }

    #[test]
    fn test_isolated_particle_feels_only_gravity() {
        let config = SimulationConfig::default();
        let mut particles = vec![Particle::at(Vec3::ZERO)];
        let kernel = prepared(&mut particles, &config);

        compute_forces(&mut particles, &config, &kernel, Candidates::All(1));

        let expected = config.gravity * particles[0].density;
        assert!((particles[0].current_force - expected).length() < 1e-3);
    }

    #[test]
    fn test_compressed_pair_pushes_apart() {
        let config = SimulationConfig::default().with_gravity(Vec3::ZERO);
        let mut particles = vec![
            Particle::at(Vec3::ZERO),
            Particle::at(Vec3::new(0.03, 0.0, 0.0)),
        ];
        let kernel = prepared(&mut particles, &config);
        assert!(particles[0].pressure > 0.0);

        compute_forces(&mut particles, &config, &kernel, Candidates::All(2));

        assert!(particles[0].current_force.x < 0.0);
        assert!(particles[1].current_force.x > 0.0);
        // Equal and opposite for identical particles
        let sum = particles[0].current_force + particles[1].current_force;
        assert!(sum.length() < 1e-3 * particles[1].current_force.length());
        assert_eq!(particles[0].current_force.y, 0.0);
    }

    #[test]
    fn test_viscosity_pulls_velocities_together() {
        // Positive viscosity pulls a particle toward its neighbor's velocity
        let config = SimulationConfig::default()
            .with_gravity(Vec3::ZERO)
            .with_viscosity(0.5)
            .with_gas_constant(0.0);
        let mut particles = vec![
            Particle::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)),
            Particle::at(Vec3::new(0.05, 0.0, 0.0)),
        ];
        let kernel = prepared(&mut particles, &config);

        compute_forces(&mut particles, &config, &kernel, Candidates::All(2));

        assert!(particles[0].current_force.z < 0.0);
        assert!(particles[1].current_force.z > 0.0);
        assert_eq!(particles[0].current_force.x, 0.0);
    }

    #[test]
    fn test_coincident_particles_stay_finite() {
        let config = SimulationConfig::default().with_gravity(Vec3::ZERO);
        let mut particles = vec![Particle::at(Vec3::ONE), Particle::at(Vec3::ONE)];
        let kernel = prepared(&mut particles, &config);

        compute_forces(&mut particles, &config, &kernel, Candidates::All(2));

        for p in &particles {
            assert!(p.current_force.is_finite());
            assert_eq!(p.current_force, Vec3::ZERO);
        }
    }
}
