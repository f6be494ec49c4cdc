//! Density and pressure stage.

use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::kernels::{poly6, KernelConstants};
use crate::neighbors::Candidates;
use crate::particle::Particle;

/// Sum poly6-weighted neighbor mass into each particle's density, then apply the
/// linear equation of state `p = k * (rho - rho0)`.
///
/// The particle's own contribution is included, so density never drops below
/// `mass * poly6(0)`. Pressure may go negative when a particle is under-dense.
pub(crate) fn compute_density_pressure(
    particles: &mut [Particle],
    config: &SimulationConfig,
    kernel: &KernelConstants,
    candidates: Candidates,
) {
    let mass = config.particle_mass;
    let snapshot: &[Particle] = particles;

    let densities: Vec<f32> = snapshot
        .par_iter()
        .map(|p_i| {
            let mut density = 0.0;
            candidates.for_each(p_i.position, |j| {
                let r2 = (snapshot[j].position - p_i.position).length_squared();
                if r2 < kernel.h2 {
                    density += mass * poly6(r2, kernel);
                }
            });
            density
        })
        .collect();

    particles
        .par_iter_mut()
        .zip(densities)
        .for_each(|(p, density)| {
            p.density = density;
            p.pressure = config.gas_constant * (density - config.resting_density);
        });
}
