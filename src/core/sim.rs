use crate::core::field;
use crate::core::kernel::Kernel;
use crate::core::params::{BoundaryPolicy, Params, SpawnLayout};
use crate::core::particle::{Particle, DIM};
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// Floor for the density divisor in the pressure-force update.
const EPS_DENSITY: f64 = 1e-9;

/// Half-width of the initial velocity distribution for random spawns.
const SPAWN_SPEED: f64 = 5.0;

/// Owned per-particle state for rendering export.
///
/// Snapshots are fully detached from the store: holding one across a
/// subsequent step observes nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    /// Position (x, y).
    pub position: [f64; DIM],
    /// Velocity (vx, vy).
    pub velocity: [f64; DIM],
    /// Density as of the most recent completed step.
    pub density: f64,
}

/// Particle fluid simulation in a static axis-aligned 2D domain.
///
/// The simulation owns the particle store exclusively; external collaborators
/// mutate parameters and read state only between steps, through the methods
/// here or the Python boundary built on top of them. One `step` call advances
/// the system by exactly one tick: force accumulation and integration, then
/// boundary handling, then pairwise collision resolution.
#[derive(Debug)]
pub struct Simulation {
    time_now: f64,
    frozen: bool,
    params: Params,
    pub particles: Vec<Particle>,
    rng: StdRng,
    next_id: u32,
}

impl Simulation {
    /// Create a new simulation with `num_particles` particles spawned
    /// uniformly at random over the domain described by `params`.
    ///
    /// All parameters are validated up front; `seed` fixes the RNG stream so
    /// equal seeds give identical trajectories.
    ///
    /// Errors: `Error::InvalidParam` for non-finite or out-of-range
    /// parameters, including a domain smaller than one particle diameter on
    /// either axis.
    pub fn new(num_particles: usize, params: Params, seed: Option<u64>) -> Result<Self> {
        validate_params(&params)?;

        let rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        let mut sim = Self {
            time_now: 0.0,
            frozen: false,
            params,
            particles: Vec::with_capacity(num_particles),
            rng,
            next_id: 0,
        };
        sim.spawn(num_particles, SpawnLayout::Random)?;
        Ok(sim)
    }

    /// Returns total simulated time accumulated across completed steps.
    pub fn time(&self) -> f64 {
        self.time_now
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Whether the simulation is frozen (steps are no-ops).
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freeze or resume the simulation. While frozen, particle state is
    /// static but parameter updates and queries remain available.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Current parameter set.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Compute total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Grow or shrink the particle store to exactly `target` particles.
    ///
    /// Growth spawns `target - current` new particles with the given
    /// `layout`; shrinking truncates from the tail, so the survivors are a
    /// prefix of the previous store. Must not be called mid-step (the store
    /// size only ever changes between steps).
    pub fn set_particle_count(&mut self, target: usize, layout: SpawnLayout) -> Result<()> {
        let current = self.particles.len();
        if target > current {
            self.spawn(target - current, layout)?;
        } else {
            self.particles.truncate(target);
        }
        Ok(())
    }

    /// Advance the simulation by one tick of length `delta_time`.
    ///
    /// Sequence: two-phase integration (gravity + cached densities +
    /// pressure forces, then damped position update), boundary handling,
    /// pairwise collision resolution. A frozen simulation validates the
    /// argument but mutates nothing.
    ///
    /// Errors: `Error::InvalidParam` if `delta_time` is non-positive or
    /// non-finite; state is untouched in that case.
    pub fn step(&mut self, delta_time: f64) -> Result<()> {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return Err(Error::InvalidParam(
                "delta_time must be finite and > 0".into(),
            ));
        }
        if self.frozen {
            return Ok(());
        }

        // Broadcast the global smoothing radius; nothing diversifies it
        // per particle yet.
        let radius = self.params.smoothing_radius;
        for p in &mut self.particles {
            p.interaction_radius = radius;
        }

        self.integrate(delta_time);
        self.apply_boundaries();
        self.resolve_collisions();

        self.time_now += delta_time;
        Ok(())
    }

    // ============ Parameter setters ============

    /// Enable or disable gravity.
    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.params.gravity_enabled = enabled;
    }

    /// Enable or disable the pressure-force pass.
    pub fn set_pressure_enabled(&mut self, enabled: bool) {
        self.params.pressure_enabled = enabled;
    }

    /// Select the smoothing-kernel family.
    pub fn set_kernel(&mut self, kernel: Kernel) {
        self.params.kernel = kernel;
    }

    /// Select the boundary-handling policy.
    pub fn set_boundary_policy(&mut self, policy: BoundaryPolicy) {
        self.params.boundary_policy = policy;
    }

    /// Set the global smoothing radius (finite, > 0).
    pub fn set_smoothing_radius(&mut self, radius: f64) -> Result<()> {
        check_positive("smoothing_radius", radius)?;
        self.params.smoothing_radius = radius;
        Ok(())
    }

    /// Set the display-only overlay probe radius (finite, > 0).
    pub fn set_display_radius(&mut self, radius: f64) -> Result<()> {
        check_positive("display_radius", radius)?;
        self.params.display_radius = radius;
        Ok(())
    }

    /// Set the equation-of-state equilibrium density (finite).
    pub fn set_target_density(&mut self, density: f64) -> Result<()> {
        check_finite("target_density", density)?;
        self.params.target_density = density;
        Ok(())
    }

    /// Set the equation-of-state stiffness (finite).
    pub fn set_pressure_multiplier(&mut self, multiplier: f64) -> Result<()> {
        check_finite("pressure_multiplier", multiplier)?;
        self.params.pressure_multiplier = multiplier;
        Ok(())
    }

    /// Set the per-step velocity damping factor (in (0, 1]).
    pub fn set_velocity_damping(&mut self, damping: f64) -> Result<()> {
        check_damping("velocity_damping", damping)?;
        self.params.velocity_damping = damping;
        Ok(())
    }

    /// Set the reflective-clamp boundary damping magnitude (in (0, 1]).
    pub fn set_boundary_damping(&mut self, damping: f64) -> Result<()> {
        check_damping("boundary_damping", damping)?;
        self.params.boundary_damping = damping;
        Ok(())
    }

    /// Set the simple-bounce y-axis damping magnitude (in (0, 1]).
    pub fn set_bounce_damping(&mut self, damping: f64) -> Result<()> {
        check_damping("bounce_damping", damping)?;
        self.params.bounce_damping = damping;
        Ok(())
    }

    /// Set the collision damping factor (in (0, 1]; 1 is fully elastic).
    pub fn set_collision_damping(&mut self, damping: f64) -> Result<()> {
        check_damping("collision_damping", damping)?;
        self.params.collision_damping = damping;
        Ok(())
    }

    // ============ Read-only queries ============

    /// Kernel-weighted density at an arbitrary sample point.
    pub fn density_at(&self, point: [f64; DIM]) -> Result<f64> {
        check_point(point)?;
        Ok(field::density_at(
            point,
            &self.particles,
            self.params.smoothing_radius,
            self.params.kernel,
        ))
    }

    /// Density gradient at an arbitrary sample point.
    pub fn density_gradient_at(&self, point: [f64; DIM]) -> Result<[f64; DIM]> {
        check_point(point)?;
        Ok(field::density_gradient_at(
            point,
            &self.particles,
            self.params.smoothing_radius,
        ))
    }

    /// Equation-of-state pressure at an arbitrary sample point.
    pub fn pressure_at(&self, point: [f64; DIM]) -> Result<f64> {
        Ok(self.params.pressure(self.density_at(point)?))
    }

    /// Owned snapshot of (position, velocity, density) in store order, for
    /// rendering. Never aliases internal storage.
    pub fn snapshot(&self) -> Vec<ParticleState> {
        self.particles
            .iter()
            .map(|p| ParticleState {
                position: p.position,
                velocity: p.velocity,
                density: p.density,
            })
            .collect()
    }

    // ============ Internal helpers ============

    fn spawn(&mut self, count: usize, layout: SpawnLayout) -> Result<()> {
        match layout {
            SpawnLayout::Random => self.spawn_random(count),
            SpawnLayout::Grid => self.spawn_grid(count),
        }
    }

    /// Spawn `count` particles uniformly over the domain with uniform-random
    /// velocities in [-SPAWN_SPEED, SPAWN_SPEED] per axis.
    fn spawn_random(&mut self, count: usize) -> Result<()> {
        let [width, height] = self.params.domain;
        for _ in 0..count {
            let position = [
                self.rng.random_range(0.0..=width),
                self.rng.random_range(0.0..=height),
            ];
            let velocity = [
                self.rng.random_range(-SPAWN_SPEED..=SPAWN_SPEED),
                self.rng.random_range(-SPAWN_SPEED..=SPAWN_SPEED),
            ];
            self.push_particle(position, velocity)?;
        }
        Ok(())
    }

    /// Spawn `count` particles at rest in a packed grid centered in the
    /// domain, spaced one particle diameter apart.
    fn spawn_grid(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let spacing = 2.0 * self.params.particle_radius;
        let cols = (count as f64).sqrt().ceil() as usize;
        let rows = count.div_ceil(cols);
        let [width, height] = self.params.domain;
        let x0 = 0.5 * width - 0.5 * (cols - 1) as f64 * spacing;
        let y0 = 0.5 * height - 0.5 * (rows - 1) as f64 * spacing;
        for k in 0..count {
            let (row, col) = (k / cols, k % cols);
            let position = [x0 + col as f64 * spacing, y0 + row as f64 * spacing];
            self.push_particle(position, [0.0, 0.0])?;
        }
        Ok(())
    }

    fn push_particle(&mut self, position: [f64; DIM], velocity: [f64; DIM]) -> Result<()> {
        let particle = Particle::new(
            self.next_id,
            position,
            velocity,
            self.params.smoothing_radius,
            1.0,
        )?;
        self.next_id = self.next_id.wrapping_add(1);
        self.particles.push(particle);
        Ok(())
    }

    /// Two-phase update: force accumulation (gravity, cached densities,
    /// pressure), then damped explicit integration.
    fn integrate(&mut self, delta_time: f64) {
        if self.params.gravity_enabled {
            let gravity = self.params.gravity;
            for p in &mut self.particles {
                for k in 0..DIM {
                    p.velocity[k] += gravity[k] * delta_time;
                }
            }
        }

        // First pass: cache every density before any pressure force reads
        // one. The force at a particle depends on the whole field, not just
        // its own neighborhood state.
        let radius = self.params.smoothing_radius;
        let kernel = self.params.kernel;
        let densities: Vec<f64> = self
            .particles
            .iter()
            .map(|p| field::density_at(p.position, &self.particles, radius, kernel))
            .collect();
        for (p, &density) in self.particles.iter_mut().zip(&densities) {
            p.density = density;
        }

        // Second pass: pressure forces from the cached densities.
        if self.params.pressure_enabled {
            for i in 0..self.particles.len() {
                let position = self.particles[i].position;
                let gradient = field::density_gradient_at(position, &self.particles, radius);
                let pressure = self.params.pressure(self.particles[i].density);
                let denom = self.particles[i].density.max(EPS_DENSITY);
                for k in 0..DIM {
                    self.particles[i].velocity[k] += gradient[k] * pressure / denom * delta_time;
                }
            }
        }

        // Integration phase: damping applies every step, with or without
        // gravity or pressure.
        let damping = self.params.velocity_damping;
        for p in &mut self.particles {
            for k in 0..DIM {
                p.velocity[k] *= damping;
                p.position[k] += p.velocity[k] * delta_time;
            }
        }
    }

    /// Apply the configured boundary policy to every particle. Idempotent on
    /// particles already in bounds.
    fn apply_boundaries(&mut self) {
        let radius = self.params.particle_radius;
        let domain = self.params.domain;
        match self.params.boundary_policy {
            BoundaryPolicy::ReflectiveClamp => {
                let damping = self.params.boundary_damping;
                for p in &mut self.particles {
                    for k in 0..DIM {
                        let lo = radius;
                        let hi = domain[k] - radius;
                        if p.position[k] < lo {
                            p.position[k] = lo;
                            if p.velocity[k] < 0.0 {
                                p.velocity[k] *= -damping;
                            }
                        } else if p.position[k] > hi {
                            p.position[k] = hi;
                            if p.velocity[k] > 0.0 {
                                p.velocity[k] *= -damping;
                            }
                        }
                    }
                }
            }
            BoundaryPolicy::SimpleBounce => {
                let damping = self.params.bounce_damping;
                for p in &mut self.particles {
                    // The x axis reflects fully, with no position clamp.
                    if p.position[0] < radius || p.position[0] > domain[0] - radius {
                        p.velocity[0] = -p.velocity[0];
                    }
                    // The y axis reflects with damping and hard-clamps.
                    if p.position[1] < radius {
                        p.position[1] = radius;
                        p.velocity[1] *= -damping;
                    } else if p.position[1] > domain[1] - radius {
                        p.position[1] = domain[1] - radius;
                        p.velocity[1] *= -damping;
                    }
                }
            }
        }
    }

    /// Resolve pairwise overlaps: equal-mass exchange of the normal velocity
    /// components plus positional correction of half the overlap per
    /// particle.
    ///
    /// Pairs are processed `i` ascending, `j > i` ascending; later pairs see
    /// the corrections already applied by earlier ones within the same step.
    fn resolve_collisions(&mut self) {
        let min_dist = 2.0 * self.params.particle_radius;
        let damping = self.params.collision_damping;
        let n = self.particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let mut delta = [0.0; DIM];
                for k in 0..DIM {
                    delta[k] = self.particles[j].position[k] - self.particles[i].position[k];
                }
                let dist = dot(&delta, &delta).sqrt();
                // Exactly coincident centers have no contact normal; the
                // pair is skipped rather than failing the step.
                if dist == 0.0 || dist >= min_dist {
                    continue;
                }
                let normal = [delta[0] / dist, delta[1] / dist];
                let tangent = [-normal[1], normal[0]];

                let vi = self.particles[i].velocity;
                let vj = self.particles[j].velocity;
                let (vi_n, vi_t) = (dot(&vi, &normal), dot(&vi, &tangent));
                let (vj_n, vj_t) = (dot(&vj, &normal), dot(&vj, &tangent));

                // Equal-mass exchange of the normal components, scaled for
                // inelastic setups; tangential components are untouched.
                let ni = vj_n * damping;
                let nj = vi_n * damping;
                for k in 0..DIM {
                    self.particles[i].velocity[k] = ni * normal[k] + vi_t * tangent[k];
                    self.particles[j].velocity[k] = nj * normal[k] + vj_t * tangent[k];
                }

                let half_overlap = 0.5 * (min_dist - dist);
                for k in 0..DIM {
                    self.particles[i].position[k] -= normal[k] * half_overlap;
                    self.particles[j].position[k] += normal[k] * half_overlap;
                }
            }
        }
    }
}

// ============ Utility helpers ============

#[inline]
fn dot(a: &[f64; DIM], b: &[f64; DIM]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidParam(format!("{name} must be finite")));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidParam(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

fn check_damping(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(Error::InvalidParam(format!(
            "{name} must be in (0, 1], got {value}"
        )));
    }
    Ok(())
}

fn check_point(point: [f64; DIM]) -> Result<()> {
    if !point.iter().all(|x| x.is_finite()) {
        return Err(Error::InvalidParam("sample point must be finite".into()));
    }
    Ok(())
}

fn validate_params(params: &Params) -> Result<()> {
    if !params.domain.iter().all(|&l| l.is_finite() && l > 0.0) {
        return Err(Error::InvalidParam(
            "domain extents must be finite and > 0".into(),
        ));
    }
    check_positive("particle_radius", params.particle_radius)?;
    for &l in &params.domain {
        if l < 2.0 * params.particle_radius {
            return Err(Error::InvalidParam(
                "domain must be at least one particle diameter on each axis".into(),
            ));
        }
    }
    check_positive("smoothing_radius", params.smoothing_radius)?;
    check_positive("display_radius", params.display_radius)?;
    if !params.gravity.iter().all(|g| g.is_finite()) {
        return Err(Error::InvalidParam("gravity must be finite".into()));
    }
    check_finite("target_density", params.target_density)?;
    check_finite("pressure_multiplier", params.pressure_multiplier)?;
    check_damping("velocity_damping", params.velocity_damping)?;
    check_damping("boundary_damping", params.boundary_damping)?;
    check_damping("bounce_damping", params.bounce_damping)?;
    check_damping("collision_damping", params.collision_damping)?;
    Ok(())
}
