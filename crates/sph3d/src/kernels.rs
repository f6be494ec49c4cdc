//! SPH smoothing kernels (Müller et al. 2003) and their cached normalization constants.
//!
//! - Poly6 for density estimation
//! - Spiky gradient for pressure forces
//! - Viscosity Laplacian for viscous forces
//!
//! All kernels have compact support: they evaluate to zero at or beyond `h`.

use std::f32::consts::PI;

/// Kernel normalization constants derived once from the smoothing radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelConstants {
    /// Smoothing radius (h)
    pub h: f32,
    pub h2: f32,
    pub h3: f32,
    pub h4: f32,
    pub h5: f32,
    /// 315 / (64 π h⁹)
    pub density_weight: f32,
    /// -45 / (π h⁶)
    pub spiky_gradient: f32,
    /// 45 / (π h⁶)
    pub visc_laplacian: f32,
}

impl KernelConstants {
    /// Precompute constants for smoothing radius `h`.
    ///
    /// `h` is validated positive by the config layer before this is called.
    pub fn new(h: f32) -> Self {
        let h2 = h * h;
        let h3 = h2 * h;
        let h4 = h3 * h;
        let h5 = h4 * h;
        let h6 = h3 * h3;
        let h9 = h6 * h3;

        Self {
            h,
            h2,
            h3,
            h4,
            h5,
            density_weight: 315.0 / (64.0 * PI * h9),
            spiky_gradient: -45.0 / (PI * h6),
            visc_laplacian: 45.0 / (PI * h6),
        }
    }

    /// False when `h` is so large or small that a constant overflows or flushes to
    /// zero in f32.
    pub fn is_representable(&self) -> bool {
        [self.density_weight, self.spiky_gradient, self.visc_laplacian, self.self_density()]
            .iter()
            .all(|c| c.is_finite() && *c != 0.0)
    }

    /// Poly6 value at zero distance. Every particle contributes at least
    /// `mass * self_density()` to its own density.
    #[inline]
    pub fn self_density(&self) -> f32 {
        self.density_weight * self.h2 * self.h2 * self.h2
    }
}

/// Poly6 kernel from a squared distance.
#[inline]
pub fn poly6(r2: f32, k: &KernelConstants) -> f32 {
    if r2 < k.h2 {
        let diff = k.h2 - r2;
        k.density_weight * diff * diff * diff
    } else {
        0.0
    }
}

/// Signed magnitude of the spiky kernel gradient along the separation direction.
///
/// Negative inside the support (pressure pushes apart once combined with the
/// minus sign of the pressure force).
#[inline]
pub fn spiky_gradient(r: f32, k: &KernelConstants) -> f32 {
    if r < k.h {
        let diff = k.h - r;
        k.spiky_gradient * diff * diff
    } else {
        0.0
    }
}

/// Viscosity kernel Laplacian.
#[inline]
pub fn viscosity_laplacian(r: f32, k: &KernelConstants) -> f32 {
    if r < k.h {
        k.visc_laplacian * (k.h - r)
    } else {
        0.0
    }
}
