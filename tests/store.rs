use fluidsim::core::{Params, Simulation, SpawnLayout};

/// Growing an empty store to 50 and shrinking back to 10 leaves exactly the
/// 10-particle prefix of the original spawn: removal truncates from the
/// tail, never by proximity or age.
#[test]
fn shrink_keeps_prefix_of_grow() -> fluidsim::error::Result<()> {
    let mut sim = Simulation::new(0, Params::default(), Some(2024))?;
    assert_eq!(sim.num_particles(), 0);

    sim.set_particle_count(50, SpawnLayout::Random)?;
    assert_eq!(sim.num_particles(), 50);
    let first_ten: Vec<_> = sim.particles[..10]
        .iter()
        .map(|p| (p.id, p.position, p.velocity))
        .collect();

    sim.set_particle_count(10, SpawnLayout::Random)?;
    assert_eq!(sim.num_particles(), 10);
    let kept: Vec<_> = sim
        .particles
        .iter()
        .map(|p| (p.id, p.position, p.velocity))
        .collect();
    assert_eq!(kept, first_ten);
    Ok(())
}

/// Growing an existing store spawns only the difference and leaves the
/// existing particles untouched.
#[test]
fn grow_preserves_existing_particles() -> fluidsim::error::Result<()> {
    let mut sim = Simulation::new(20, Params::default(), Some(5))?;
    let before: Vec<_> = sim.particles.iter().map(|p| (p.id, p.position)).collect();

    sim.set_particle_count(35, SpawnLayout::Random)?;
    assert_eq!(sim.num_particles(), 35);
    let front: Vec<_> = sim.particles[..20]
        .iter()
        .map(|p| (p.id, p.position))
        .collect();
    assert_eq!(front, before);
    Ok(())
}

/// Grid spawning places every particle inside the domain, at rest.
#[test]
fn grid_layout_spawns_in_domain() -> fluidsim::error::Result<()> {
    let mut sim = Simulation::new(0, Params::default(), Some(77))?;
    sim.set_particle_count(30, SpawnLayout::Grid)?;

    let radius = sim.params().particle_radius;
    let [width, height] = sim.params().domain;
    for p in &sim.particles {
        assert_eq!(p.velocity, [0.0, 0.0]);
        assert!(p.position[0] >= radius && p.position[0] <= width - radius);
        assert!(p.position[1] >= radius && p.position[1] <= height - radius);
    }
    Ok(())
}

/// Equal seeds give identical trajectories; the simulation is a
/// deterministic function of its seed and step sequence.
#[test]
fn equal_seeds_reproduce_trajectories() -> fluidsim::error::Result<()> {
    let mut a = Simulation::new(40, Params::default(), Some(31337))?;
    let mut b = Simulation::new(40, Params::default(), Some(31337))?;

    for _ in 0..50 {
        a.step(1.0)?;
        b.step(1.0)?;
    }
    assert_eq!(a.snapshot(), b.snapshot());

    let mut c = Simulation::new(40, Params::default(), Some(31338))?;
    c.step(1.0)?;
    a.step(1.0)?;
    assert_ne!(a.snapshot(), c.snapshot());
    Ok(())
}

/// The store size only changes through explicit count updates; stepping
/// never spawns or destroys particles.
#[test]
fn stepping_never_changes_count() -> fluidsim::error::Result<()> {
    let mut sim = Simulation::new(25, Params::default(), Some(8))?;
    for _ in 0..20 {
        sim.step(1.0)?;
        assert_eq!(sim.num_particles(), 25);
    }
    sim.set_particle_count(0, SpawnLayout::Random)?;
    assert_eq!(sim.num_particles(), 0);
    sim.step(1.0)?;
    assert_eq!(sim.num_particles(), 0);
    Ok(())
}
