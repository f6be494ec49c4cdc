//! Per-step diagnostics over the particle array.

use std::fmt;

use crate::particle::Particle;

/// Summary statistics of one particle snapshot.
///
/// Extremes and averages are taken over finite particles only; `non_finite`
/// counts the rest.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepMetrics {
    pub particle_count: usize,
    pub non_finite: usize,
    pub min_density: f32,
    pub max_density: f32,
    pub avg_density: f32,
    pub min_pressure: f32,
    pub max_pressure: f32,
    pub max_speed: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub avg_height: f32,
}

impl StepMetrics {
    pub fn from_particles(particles: &[Particle]) -> Self {
        let mut m = StepMetrics {
            particle_count: particles.len(),
            min_density: f32::MAX,
            max_density: f32::MIN,
            min_pressure: f32::MAX,
            max_pressure: f32::MIN,
            min_height: f32::MAX,
            max_height: f32::MIN,
            ..Default::default()
        };

        let mut density_sum = 0.0f64;
        let mut height_sum = 0.0f64;

        for p in particles {
            if !p.is_finite() {
                m.non_finite += 1;
                continue;
            }
            m.min_density = m.min_density.min(p.density);
            m.max_density = m.max_density.max(p.density);
            m.min_pressure = m.min_pressure.min(p.pressure);
            m.max_pressure = m.max_pressure.max(p.pressure);
            m.max_speed = m.max_speed.max(p.velocity.length());
            m.min_height = m.min_height.min(p.position.y);
            m.max_height = m.max_height.max(p.position.y);
            density_sum += p.density as f64;
            height_sum += p.position.y as f64;
        }

        let finite = m.particle_count - m.non_finite;
        if finite == 0 {
            return StepMetrics {
                particle_count: m.particle_count,
                non_finite: m.non_finite,
                ..Default::default()
            };
        }

        m.avg_density = (density_sum / finite as f64) as f32;
        m.avg_height = (height_sum / finite as f64) as f32;
        m
    }

    pub fn all_finite(&self) -> bool {
        self.non_finite == 0
    }
}

impl fmt::Display for StepMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} density=[{:.1}, {:.1}] avg={:.1} pressure=[{:.1}, {:.1}] max_speed={:.3} y=[{:.3}, {:.3}] avg_y={:.3}",
            self.particle_count,
            self.min_density,
            self.max_density,
            self.avg_density,
            self.min_pressure,
            self.max_pressure,
            self.max_speed,
            self.min_height,
            self.max_height,
            self.avg_height,
        )?;
        if self.non_finite > 0 {
            write!(f, " NON-FINITE={}", self.non_finite)?;
        }
        Ok(())
    }
}
