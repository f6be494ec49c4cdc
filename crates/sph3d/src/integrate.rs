//! Time integration and boundary handling.

use rayon::prelude::*;

use crate::boundary::{BoundaryGeometry, DomainBox};
use crate::config::SimulationConfig;
use crate::particle::Particle;

/// Advance every particle by one timestep, then resolve collisions.
///
/// Semi-implicit Euler: velocity is updated from `force / density` first and the
/// new velocity moves the particle. Collisions run box, sphere, mesh, in that order,
/// so a later boundary wins when two disagree.
pub(crate) fn integrate(
    particles: &mut [Particle],
    config: &SimulationConfig,
    domain: &DomainBox,
    geometry: &BoundaryGeometry,
) {
    let dt = config.timestep;
    let radius = config.particle_radius;
    let damping = config.bound_damping;

    particles.par_iter_mut().for_each(|p| {
        p.velocity += p.current_force / p.density * dt;
        p.position += p.velocity * dt;

        domain.collide(&mut p.position, &mut p.velocity, damping);
        if let Some(sphere) = &geometry.sphere {
            sphere.collide(&mut p.position, &mut p.velocity, damping);
        }
        if let Some(mesh) = &geometry.mesh {
            mesh.collide(&mut p.position, &mut p.velocity, radius, damping);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Sphere;
    use glam::Vec3;

    #[test]
    fn test_semi_implicit_euler() {
        let config = SimulationConfig::default().with_timestep(0.01);
        let domain = DomainBox::from_size(Vec3::splat(100.0));
        let mut particles = vec![Particle {
            density: 2.0,
            current_force: Vec3::new(4.0, 0.0, 0.0),
            velocity: Vec3::new(1.0, 0.0, 0.0),
            ..Particle::default()
        }];

        integrate(&mut particles, &config, &domain, &BoundaryGeometry::new());

        // v = 1 + 4 / 2 * 0.01, x moves by the new velocity
        assert!((particles[0].velocity.x - 1.02).abs() < 1e-6);
        assert!((particles[0].position.x - 0.0102).abs() < 1e-6);
    }

    #[test]
    fn test_particles_near_boundaries_move_freely() {
        // 0.05 inside the x wall and 0.05 outside the sphere; neither collides
        let config = SimulationConfig::default().with_timestep(0.0001);
        let domain = DomainBox::from_size(config.box_size);
        let geometry = BoundaryGeometry::new().with_sphere(Sphere::new(Vec3::new(0.0, -2.0, 0.0), 0.5));
        let mut particles = vec![
            Particle {
                density: 1.0,
                position: Vec3::new(1.95, 0.0, 0.0),
                velocity: Vec3::new(1.0, 0.0, 0.0),
                ..Particle::default()
            },
            Particle {
                density: 1.0,
                position: Vec3::new(0.55, -2.0, 0.0),
                velocity: Vec3::new(-1.0, 0.0, 0.0),
                ..Particle::default()
            },
        ];

        integrate(&mut particles, &config, &domain, &geometry);

        assert!((particles[0].position.x - 1.9501).abs() < 1e-6);
        assert_eq!(particles[0].velocity.x, 1.0);
        assert!((particles[1].position.x - 0.5499).abs() < 1e-6);
        assert_eq!(particles[1].velocity.x, -1.0);
    }

    #[test]
    fn test_sphere_runs_after_box() {
        // Sphere sits on the floor; its push-out is applied last
        let config = SimulationConfig::default();
        let domain = DomainBox::from_size(Vec3::splat(2.0));
        let geometry = BoundaryGeometry::new().with_sphere(Sphere::new(Vec3::new(0.0, -1.0, 0.0), 0.5));
        let mut particles = vec![Particle {
            density: 1.0,
            position: Vec3::new(0.0, -1.2, 0.0),
            velocity: Vec3::new(0.0, -1.0, 0.0),
            ..Particle::default()
        }];

        integrate(&mut particles, &config, &domain, &geometry);

        let p = particles[0];
        assert!(geometry.sphere.unwrap().signed_distance(p.position) >= -1e-5);
        assert!(p.velocity.y >= 0.0);
    }
}
