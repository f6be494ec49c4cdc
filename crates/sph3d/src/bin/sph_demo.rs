//! Headless SPH demo.
//!
//! Spawns the default (or a JSON-loaded) scene with a sphere obstacle and a tube
//! mesh, runs it, and checks that every particle stays finite and inside the box.
//!
//! Usage: `sph_demo [config.json] [steps]`. `RUST_LOG=debug` logs metrics every step.

use std::path::Path;

use glam::Vec3;
use log::{error, info};
use sph3d::test_geometry::tube_mesh;
use sph3d::{BoundaryGeometry, SimulationConfig, SphSimulation, Sphere};

const DEFAULT_STEPS: usize = 1000;
const REPORT_EVERY: usize = 100;

const TUBE_RADIUS: f32 = 0.5;
const TUBE_HEIGHT: f32 = 4.0;
const TUBE_RADIAL_SEGMENTS: u32 = 16;
const TUBE_HEIGHT_SEGMENTS: u32 = 20;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            SimulationConfig::load_json(Path::new(path))?
        }
        None => SimulationConfig::default(),
    };
    let steps = match args.get(2) {
        Some(s) => s.parse::<usize>()?,
        None => DEFAULT_STEPS,
    };

    let mesh = tube_mesh(TUBE_RADIUS, TUBE_HEIGHT, TUBE_RADIAL_SEGMENTS, TUBE_HEIGHT_SEGMENTS)?;
    let half = config.half_extents();
    let sphere = Sphere::new(Vec3::new(0.0, -half.y * 0.5, 0.0), 0.5);
    let geometry = BoundaryGeometry::new().with_sphere(sphere).with_mesh(mesh);

    let mut sim = SphSimulation::new(config, geometry)?;
    let start = std::time::Instant::now();

    for step in 0..steps {
        // Sweep the sphere along X to stir the fluid
        let t = sim.elapsed() as f32;
        let x = (t * 2.0).sin() * half.x * 0.5;
        sim.set_sphere(Some(Sphere::new(Vec3::new(x, sphere.center.y, 0.0), sphere.radius)))?;

        sim.step()?;

        if (step + 1) % REPORT_EVERY == 0 || step + 1 == steps {
            info!("step {:>6} t={:.4}s  {}", sim.frame(), sim.elapsed(), sim.metrics());
        }
    }

    let wall = start.elapsed();
    info!(
        "{} steps in {:.2?} ({:.1} steps/s)",
        steps,
        wall,
        steps as f64 / wall.as_secs_f64().max(1e-9)
    );

    let escaped = sim
        .particles()
        .iter()
        .filter(|p| !sim.domain().contains(p.position))
        .count();
    let metrics = sim.metrics();

    if escaped > 0 || !metrics.all_finite() {
        error!(
            "FAILED: {} particles escaped the box, {} non-finite",
            escaped, metrics.non_finite
        );
        std::process::exit(1);
    }

    println!("OK: {} particles after {} steps ({})", metrics.particle_count, sim.frame(), metrics);
    Ok(())
}
