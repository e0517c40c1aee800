use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

pub mod core;
pub mod error;

use crate::core::particle::DIM;
use crate::core::{BoundaryPolicy, Kernel, Params, Simulation, SpawnLayout};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing wrapper around the Rust simulation core.
///
/// The window/UI layer lives on the Python side and interacts with the core
/// only through this class: parameter setters, one `step` per frame, and
/// read-only queries and snapshots between steps.
#[pyclass]
pub struct FluidSim {
    sim: Simulation,
}

#[pymethods]
impl FluidSim {
    /// Initialize a new particle fluid simulation in a static axis-aligned
    /// 2D domain.
    ///
    /// Parameters
    /// - num_particles: initial particle count (int, >= 0), spawned
    ///   uniformly at random over the domain
    /// - domain_size: iterable of 2 positive floats [width, height]
    /// - particle_radius: collision radius (float, > 0)
    /// - smoothing_radius: kernel radius for density estimation (float, > 0)
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (num_particles, domain_size=vec![800.0, 600.0], particle_radius=5.0, smoothing_radius=50.0, seed=None))]
    fn new(
        num_particles: usize,
        domain_size: Vec<f64>,
        particle_radius: f64,
        smoothing_radius: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        if domain_size.len() != DIM {
            return Err(py_err(format!("domain_size must have length {DIM}")));
        }
        let params = Params {
            domain: [domain_size[0], domain_size[1]],
            particle_radius,
            smoothing_radius,
            ..Params::default()
        };
        let sim = Simulation::new(num_particles, params, seed).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Advance the simulation by one tick (releases the GIL during
    /// computation). No-op while frozen.
    ///
    /// Errors: raises ValueError if `delta_time` is not a positive finite
    /// float.
    fn step(&mut self, py: Python<'_>, delta_time: f64) -> PyResult<()> {
        py.allow_threads(|| self.sim.step(delta_time)).map_err(py_err)
    }

    /// Grow or shrink the particle store to exactly `target` particles.
    ///
    /// Parameters
    /// - target: desired particle count (int, >= 0)
    /// - layout: placement for newly spawned particles, "random" or "grid"
    ///
    /// Shrinking truncates from the tail: the survivors are a prefix of the
    /// previous store. Never call this mid-step.
    #[pyo3(signature = (target, layout="random"))]
    fn set_particle_count(&mut self, target: i64, layout: &str) -> PyResult<()> {
        if target < 0 {
            return Err(py_err("target particle count must be >= 0"));
        }
        let layout = SpawnLayout::parse(layout).map_err(py_err)?;
        self.sim
            .set_particle_count(target as usize, layout)
            .map_err(py_err)
    }

    /// Freeze the simulation: subsequent `step` calls leave particle state
    /// untouched until `unfreeze`.
    fn freeze(&mut self) {
        self.sim.set_frozen(true);
    }

    /// Resume a frozen simulation.
    fn unfreeze(&mut self) {
        self.sim.set_frozen(false);
    }

    /// Whether the simulation is currently frozen.
    fn is_frozen(&self) -> bool {
        self.sim.is_frozen()
    }

    /// Enable or disable gravity.
    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.sim.set_gravity_enabled(enabled);
    }

    /// Enable or disable the pressure-force pass.
    fn set_pressure_enabled(&mut self, enabled: bool) {
        self.sim.set_pressure_enabled(enabled);
    }

    /// Select the smoothing-kernel family: "linear" or "poly6".
    fn set_kernel(&mut self, name: &str) -> PyResult<()> {
        let kernel = Kernel::parse(name).map_err(py_err)?;
        self.sim.set_kernel(kernel);
        Ok(())
    }

    /// Select the boundary policy: "reflect" (clamp + damped reflection) or
    /// "bounce" (crude axis flips).
    fn set_boundary_policy(&mut self, name: &str) -> PyResult<()> {
        let policy = BoundaryPolicy::parse(name).map_err(py_err)?;
        self.sim.set_boundary_policy(policy);
        Ok(())
    }

    /// Set the global smoothing radius (float, > 0).
    fn set_smoothing_radius(&mut self, radius: f64) -> PyResult<()> {
        self.sim.set_smoothing_radius(radius).map_err(py_err)
    }

    /// Set the display-only overlay probe radius (float, > 0).
    fn set_display_radius(&mut self, radius: f64) -> PyResult<()> {
        self.sim.set_display_radius(radius).map_err(py_err)
    }

    /// Set the equation-of-state equilibrium density.
    fn set_target_density(&mut self, density: f64) -> PyResult<()> {
        self.sim.set_target_density(density).map_err(py_err)
    }

    /// Set the equation-of-state stiffness.
    fn set_pressure_multiplier(&mut self, multiplier: f64) -> PyResult<()> {
        self.sim.set_pressure_multiplier(multiplier).map_err(py_err)
    }

    /// Set the per-step velocity damping factor (float in (0, 1]).
    fn set_velocity_damping(&mut self, damping: f64) -> PyResult<()> {
        self.sim.set_velocity_damping(damping).map_err(py_err)
    }

    /// Set the reflective-clamp boundary damping magnitude (float in (0, 1]).
    fn set_boundary_damping(&mut self, damping: f64) -> PyResult<()> {
        self.sim.set_boundary_damping(damping).map_err(py_err)
    }

    /// Set the simple-bounce y-axis damping magnitude (float in (0, 1]).
    fn set_bounce_damping(&mut self, damping: f64) -> PyResult<()> {
        self.sim.set_bounce_damping(damping).map_err(py_err)
    }

    /// Set the collision damping factor (float in (0, 1]; 1.0 is fully
    /// elastic).
    fn set_collision_damping(&mut self, damping: f64) -> PyResult<()> {
        self.sim.set_collision_damping(damping).map_err(py_err)
    }

    /// Kernel-weighted density at an arbitrary point (e.g. the mouse cursor
    /// for the overlay readout).
    fn query_density(&self, point: (f64, f64)) -> PyResult<f64> {
        self.sim.density_at([point.0, point.1]).map_err(py_err)
    }

    /// Density gradient at an arbitrary point, as a (gx, gy) tuple.
    fn query_density_gradient(&self, point: (f64, f64)) -> PyResult<(f64, f64)> {
        let g = self
            .sim
            .density_gradient_at([point.0, point.1])
            .map_err(py_err)?;
        Ok((g[0], g[1]))
    }

    /// Equation-of-state pressure at an arbitrary point.
    fn query_pressure(&self, point: (f64, f64)) -> PyResult<f64> {
        self.sim.pressure_at([point.0, point.1]).map_err(py_err)
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    /// The array is a fresh copy; it never aliases simulation storage.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let n = self.sim.num_particles();
        let mut arr = Array2::<f64>::zeros((n, DIM));
        for (i, p) in self.sim.particles.iter().enumerate() {
            for k in 0..DIM {
                arr[[i, k]] = p.position[k];
            }
        }
        let pyarr = arr.into_pyarray(py);
        Ok(pyarr.to_owned().into())
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    /// The array is a fresh copy; it never aliases simulation storage.
    fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let n = self.sim.num_particles();
        let mut arr = Array2::<f64>::zeros((n, DIM));
        for (i, p) in self.sim.particles.iter().enumerate() {
            for k in 0..DIM {
                arr[[i, k]] = p.velocity[k];
            }
        }
        let pyarr = arr.into_pyarray(py);
        Ok(pyarr.to_owned().into())
    }

    /// Return per-particle densities (as of the most recent completed step)
    /// as a NumPy array of shape (N,), dtype=float64.
    fn get_densities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray1<f64>>> {
        let n = self.sim.num_particles();
        let mut arr = Array1::<f64>::zeros(n);
        for (i, p) in self.sim.particles.iter().enumerate() {
            arr[i] = p.density;
        }
        let pyarr = arr.into_pyarray(py);
        Ok(pyarr.to_owned().into())
    }

    /// Current particle count.
    fn num_particles(&self) -> usize {
        self.sim.num_particles()
    }

    /// Total simulated time accumulated across completed steps.
    fn time(&self) -> f64 {
        self.sim.time()
    }

    /// Total kinetic energy (diagnostic).
    fn kinetic_energy(&self) -> f64 {
        self.sim.kinetic_energy()
    }
}

/// The fluidsim Python module entry point.
#[pymodule]
fn fluidsim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<FluidSim>()?;
    Ok(())
}
