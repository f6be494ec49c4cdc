//! End-to-end scenarios
//!
//! Full pipeline runs from spawn to many steps, checking containment and
//! finiteness of the whole particle array.

use glam::{UVec3, Vec3};
use sph3d::test_geometry::tube_mesh;
use sph3d::{BoundaryGeometry, SimulationConfig, SphSimulation, Sphere};

fn assert_contained_and_finite(sim: &SphSimulation) {
    let half = sim.config().half_extents();
    for (i, p) in sim.particles().iter().enumerate() {
        assert!(p.is_finite(), "particle {} has non-finite state: {:?}", i, p);
        assert!(
            p.position.abs().cmple(half).all(),
            "particle {} escaped the box: {}",
            i,
            p.position
        );
    }
}

/// Default scene: 1000 particles in a 4x2x1.5 region inside a 4x10x3 box.
#[test]
fn test_default_scene_100_steps() {
    let config = SimulationConfig::default();
    assert_eq!(config.particle_count(), 1000);
    assert_eq!(config.box_size, Vec3::new(4.0, 10.0, 3.0));
    assert_eq!(config.spawn_extent, Vec3::new(4.0, 2.0, 1.5));
    assert_eq!(config.timestep, 0.0001);

    let mut sim = SphSimulation::new(config, BoundaryGeometry::new()).unwrap();
    sim.step_n(100).unwrap();

    assert_eq!(sim.frame(), 100);
    assert_eq!(sim.particles().len(), 1000);
    assert_contained_and_finite(&sim);
}

/// Particles packed closer than the smoothing radius so pressure and viscosity act.
#[test]
fn test_dense_block_stays_stable() {
    let config = SimulationConfig::default()
        .with_particle_radius(0.04)
        .with_spawn_counts(UVec3::new(8, 8, 8))
        .with_spawn_region(Vec3::new(0.0, -4.0, 0.0), Vec3::splat(0.64));

    let mut sim = SphSimulation::new(config, BoundaryGeometry::new()).unwrap();
    sim.step_n(300).unwrap();

    assert_contained_and_finite(&sim);

    // Neighbors interact, so some densities rise above the isolated value
    let floor = sim.config().particle_mass * sim.kernel().self_density();
    let metrics = sim.metrics();
    assert!(metrics.max_density > floor * 1.1, "{}", metrics);
    assert!(metrics.min_density >= floor * (1.0 - 1e-6), "{}", metrics);
}

/// The demo scene: moving sphere plus tube mesh.
#[test]
fn test_scene_with_sphere_and_tube() {
    let config = SimulationConfig::default();
    let sphere = Sphere::new(Vec3::new(0.0, -2.5, 0.0), 0.5);
    let geometry = BoundaryGeometry::new()
        .with_sphere(sphere)
        .with_mesh(tube_mesh(0.5, 4.0, 16, 20).unwrap());

    let mut sim = SphSimulation::new(config, geometry).unwrap();

    for i in 0..100 {
        let x = (i as f32 * 0.01).sin();
        sim.set_sphere(Some(Sphere::new(Vec3::new(x, -2.5, 0.0), 0.5)))
            .unwrap();
        sim.step().unwrap();
    }

    assert_contained_and_finite(&sim);
    let sphere = sim.geometry().sphere.unwrap();
    for p in sim.particles() {
        assert!(sphere.signed_distance(p.position) >= -1e-4);
    }
}

/// Gravity pulls the fluid down; nothing passes through the floor.
#[test]
fn test_fluid_falls_to_floor() {
    let config = SimulationConfig::default()
        .with_spawn_counts(UVec3::new(5, 5, 5))
        .with_timestep(0.001);
    let mut sim = SphSimulation::new(config, BoundaryGeometry::new()).unwrap();

    let start = sim.metrics();
    sim.step_n(2000).unwrap();
    let end = sim.metrics();

    assert!(end.avg_height < start.avg_height, "{} -> {}", start, end);
    let floor = -sim.config().half_extents().y;
    assert!(end.min_height >= floor - 1e-5);
    assert_contained_and_finite(&sim);
}

#[test]
fn test_reproducible_runs() {
    let config = SimulationConfig::default().with_spawn_counts(UVec3::new(4, 4, 4));
    let mut a = SphSimulation::new(config.clone(), BoundaryGeometry::new()).unwrap();
    let mut b = SphSimulation::new(config, BoundaryGeometry::new()).unwrap();

    a.step_n(20).unwrap();
    b.step_n(20).unwrap();

    assert_eq!(a.particle_bytes(), b.particle_bytes());
}
