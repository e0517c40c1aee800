use crate::core::kernel::{self, Kernel};
use crate::core::particle::{Particle, DIM};

/// Kernel-weighted density at `point`, summed over all particles within the
/// smoothing `radius`.
///
/// O(n) per query; the integrator calls this once per particle per step and
/// the external overlay query once per frame. Non-negative for any point and
/// particle set since kernel values are non-negative.
pub fn density_at(point: [f64; DIM], particles: &[Particle], radius: f64, kernel: Kernel) -> f64 {
    let mut density = 0.0;
    for p in particles {
        let dst = distance(p.position, point);
        if dst < radius {
            density += p.mass * kernel.value(radius, dst);
        }
    }
    density
}

/// Density gradient at `point`: the falloff slope accumulated along the unit
/// direction toward each particle within the smoothing `radius`.
///
/// A particle exactly at the sample point contributes nothing (the unit
/// direction is undefined there); this is a defined no-op branch, not an
/// error. The slope is always the linear-family approximation, regardless of
/// the configured value kernel.
pub fn density_gradient_at(point: [f64; DIM], particles: &[Particle], radius: f64) -> [f64; DIM] {
    let mut gradient = [0.0; DIM];
    for p in particles {
        let dst = distance(p.position, point);
        if dst <= 0.0 || dst >= radius {
            continue;
        }
        let weight = p.mass * kernel::slope(radius, dst);
        for (g, (&pk, &qk)) in gradient
            .iter_mut()
            .zip(p.position.iter().zip(point.iter()))
        {
            *g += weight * (pk - qk) / dst;
        }
    }
    gradient
}

#[inline]
fn distance(a: [f64; DIM], b: [f64; DIM]) -> f64 {
    let mut sq = 0.0;
    for (&ak, &bk) in a.iter().zip(b.iter()) {
        let d = ak - bk;
        sq += d * d;
    }
    sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn particle_at(position: [f64; DIM]) -> Result<Particle> {
        Particle::new(0, position, [0.0, 0.0], 50.0, 1.0)
    }

    #[test]
    fn density_at_own_position_is_unit() -> Result<()> {
        // A lone particle of mass 1 sampled at its own position: the linear
        // kernel is 1 at distance 0, so the density is exactly 1.0.
        let particles = vec![particle_at([100.0, 100.0])?];
        let d = density_at([100.0, 100.0], &particles, 50.0, Kernel::Linear);
        assert_eq!(d, 1.0);
        Ok(())
    }

    #[test]
    fn density_ignores_particles_outside_radius() -> Result<()> {
        let particles = vec![particle_at([0.0, 0.0])?, particle_at([200.0, 0.0])?];
        let d = density_at([0.0, 0.0], &particles, 50.0, Kernel::Linear);
        assert_eq!(d, 1.0);
        Ok(())
    }

    #[test]
    fn density_is_nonnegative() -> Result<()> {
        let particles = vec![
            particle_at([10.0, 20.0])?,
            particle_at([30.0, 40.0])?,
            particle_at([35.0, 15.0])?,
        ];
        for kernel in [Kernel::Linear, Kernel::Poly6] {
            for point in [[0.0, 0.0], [25.0, 25.0], [500.0, 500.0]] {
                let d = density_at(point, &particles, 50.0, kernel);
                assert!(d >= 0.0, "negative density {d} at {point:?}");
            }
        }
        Ok(())
    }

    #[test]
    fn gradient_skips_coincident_particle() -> Result<()> {
        // The only particle sits exactly at the sample point: no contribution.
        let particles = vec![particle_at([50.0, 50.0])?];
        let g = density_gradient_at([50.0, 50.0], &particles, 50.0);
        assert_eq!(g, [0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn gradient_points_away_from_neighbor() -> Result<()> {
        // One particle to the right of the sample point: the slope is
        // negative along the unit direction toward the particle, so the
        // gradient points away from it.
        let particles = vec![particle_at([30.0, 0.0])?];
        let g = density_gradient_at([0.0, 0.0], &particles, 50.0);
        assert!(g[0] < 0.0);
        assert_eq!(g[1], 0.0);
        assert!((g[0] + 1.0 / 50.0).abs() < 1e-15);
        Ok(())
    }
}
