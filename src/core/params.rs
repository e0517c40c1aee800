use crate::core::kernel::Kernel;
use crate::core::particle::DIM;
use crate::error::{Error, Result};

/// Boundary-handling policy at the edges of the simulation domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Clamp the position into bounds on each axis and, when the velocity on
    /// that axis still points out of bounds, reverse it with damping.
    #[default]
    ReflectiveClamp,
    /// Crude reflection: the x axis flips its velocity with no position
    /// clamp, the y axis reflects with damping and a hard position clamp.
    SimpleBounce,
}

impl BoundaryPolicy {
    /// Parse a policy name from the external boundary.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "reflect" => Ok(BoundaryPolicy::ReflectiveClamp),
            "bounce" => Ok(BoundaryPolicy::SimpleBounce),
            other => Err(Error::InvalidParam(format!(
                "unknown boundary policy {other:?}; expected \"reflect\" or \"bounce\""
            ))),
        }
    }
}

/// Placement strategy for newly spawned particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnLayout {
    /// Uniform-random positions over the whole domain, uniform-random
    /// velocities in [-5, 5] per axis.
    #[default]
    Random,
    /// Packed grid centered in the domain, spaced one particle diameter
    /// apart, at rest.
    Grid,
}

impl SpawnLayout {
    /// Parse a layout name from the external boundary.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "random" => Ok(SpawnLayout::Random),
            "grid" => Ok(SpawnLayout::Grid),
            other => Err(Error::InvalidParam(format!(
                "unknown spawn layout {other:?}; expected \"random\" or \"grid\""
            ))),
        }
    }
}

/// Tunable simulation parameters.
///
/// Defaults reproduce the reference tuning: an 800×600 domain in screen
/// coordinates (+y down), 5-unit particles, a 50-unit smoothing radius and
/// gentle downward gravity. All fields are plain data; validation happens in
/// the `Simulation` setters so a rejected update leaves the previous value
/// in place.
#[derive(Debug, Clone)]
pub struct Params {
    /// Domain extent [width, height]; particles live in
    /// `[particle_radius, extent - particle_radius]` per axis.
    pub domain: [f64; DIM],
    /// Collision radius of every particle.
    pub particle_radius: f64,
    /// Global smoothing radius, broadcast to every particle each step.
    pub smoothing_radius: f64,
    /// Radius of the overlay probe circle. Display-only; never consumed by
    /// the physics.
    pub display_radius: f64,
    /// Smoothing-kernel family for density estimation.
    pub kernel: Kernel,
    /// Whether gravity is applied during force accumulation.
    pub gravity_enabled: bool,
    /// Gravity acceleration vector (screen coordinates, +y down).
    pub gravity: [f64; DIM],
    /// Whether the pressure force pass runs at all.
    pub pressure_enabled: bool,
    /// Equilibrium density for the equation of state.
    pub target_density: f64,
    /// Stiffness of the equation of state.
    pub pressure_multiplier: f64,
    /// Per-step velocity damping factor, in (0, 1].
    pub velocity_damping: f64,
    /// Velocity-loss magnitude on reflective-clamp boundary hits, in (0, 1];
    /// applied negated so the velocity both reverses and shrinks.
    pub boundary_damping: f64,
    /// Velocity-loss magnitude on simple-bounce y-axis hits, in (0, 1].
    pub bounce_damping: f64,
    /// Scale on the exchanged normal velocity components in particle
    /// collisions, in (0, 1]; 1 is fully elastic.
    pub collision_damping: f64,
    /// Active boundary-handling policy.
    pub boundary_policy: BoundaryPolicy,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            domain: [800.0, 600.0],
            particle_radius: 5.0,
            smoothing_radius: 50.0,
            display_radius: 50.0,
            kernel: Kernel::Linear,
            gravity_enabled: true,
            gravity: [0.0, 0.1],
            pressure_enabled: true,
            target_density: 2.75,
            pressure_multiplier: 0.5,
            velocity_damping: 0.95,
            boundary_damping: 0.7,
            bounce_damping: 0.8,
            collision_damping: 1.0,
            boundary_policy: BoundaryPolicy::ReflectiveClamp,
        }
    }
}

impl Params {
    /// Equation of state: pressure from density deviation.
    ///
    /// Negative when density exceeds the target (repulsive), positive below
    /// it (attractive). The non-physical attraction at low density is part
    /// of the contract with the force stage and is kept as-is.
    #[inline]
    pub fn pressure(&self, density: f64) -> f64 {
        -(density - self.target_density) * self.pressure_multiplier
    }
}
