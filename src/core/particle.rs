use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// A fluid particle in D=2.
///
/// Fields:
/// - `id`: stable identifier assigned at spawn
/// - `position`: world-coordinate position [x, y]
/// - `velocity`: velocity [vx, vy]
/// - `interaction_radius`: smoothing radius (> 0); rebroadcast from the global
///   parameter at the start of every step
/// - `density`: transient kernel-weighted density, recomputed every step
///   (0 before the first computation)
/// - `mass`: particle mass (> 0, constant)
/// - `temperature`: informational scalar, never consumed by force computation
#[derive(Debug, Clone)]
pub struct Particle {
    /// Stable particle identifier.
    pub id: u32,
    /// Position (x, y).
    pub position: [f64; DIM],
    /// Velocity (vx, vy).
    pub velocity: [f64; DIM],
    /// Smoothing radius (> 0).
    pub interaction_radius: f64,
    /// Kernel-weighted density, recomputed each step before it is read.
    pub density: f64,
    /// Mass (> 0).
    pub mass: f64,
    /// Informational temperature scalar.
    pub temperature: f64,
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `interaction_radius` or `mass` is
    ///   non-positive or any component is NaN/inf.
    pub fn new(
        id: u32,
        position: [f64; DIM],
        velocity: [f64; DIM],
        interaction_radius: f64,
        mass: f64,
    ) -> Result<Self> {
        if !interaction_radius.is_finite() || interaction_radius <= 0.0 {
            return Err(Error::InvalidParam(
                "interaction_radius must be finite and > 0".into(),
            ));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !position.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !velocity.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            position,
            velocity,
            interaction_radius,
            density: 0.0,
            mass,
            temperature: 0.0,
        })
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        let vsq: f64 = self.velocity.iter().map(|&c| c * c).sum();
        0.5 * self.mass * vsq
    }
}
