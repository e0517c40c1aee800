use fluidsim::core::{Params, Simulation};

/// Parameters with every force and damping loss switched off, so a step is
/// pure advection plus boundary/collision handling.
fn quiet_params() -> Params {
    Params {
        gravity_enabled: false,
        pressure_enabled: false,
        velocity_damping: 1.0,
        collision_damping: 1.0,
        ..Params::default()
    }
}

fn separation(sim: &Simulation, i: usize, j: usize) -> f64 {
    let a = sim.particles[i].position;
    let b = sim.particles[j].position;
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Head-on approach scenario: particles at (100,100) and (108,100) with
/// velocities (1,0) and (-1,0) and radius 5. After one step the advected
/// separation is 6, the collision exchanges the normal (x) components, and
/// the positional correction restores the separation to exactly one
/// contact distance (10).
#[test]
fn head_on_pair_exchanges_velocities() -> fluidsim::error::Result<()> {
    let mut sim = Simulation::new(2, quiet_params(), Some(11))?;
    sim.particles[0].position = [100.0, 100.0];
    sim.particles[0].velocity = [1.0, 0.0];
    sim.particles[1].position = [108.0, 100.0];
    sim.particles[1].velocity = [-1.0, 0.0];

    sim.step(1.0)?;

    assert_eq!(sim.particles[0].velocity, [-1.0, 0.0]);
    assert_eq!(sim.particles[1].velocity, [1.0, 0.0]);
    let dist = separation(&sim, 0, 1);
    assert!(
        (dist - 10.0).abs() < 1e-12,
        "post-correction separation {dist}"
    );
    Ok(())
}

/// Momentum conservation: with fully elastic collisions and no external
/// forces, the total velocity sum of a colliding pair is unchanged by the
/// exchange, up to floating-point tolerance.
#[test]
fn elastic_exchange_conserves_momentum() -> fluidsim::error::Result<()> {
    let mut sim = Simulation::new(2, quiet_params(), Some(21))?;
    sim.particles[0].position = [300.0, 300.0];
    sim.particles[0].velocity = [2.0, 1.0];
    sim.particles[1].position = [306.0, 302.0];
    sim.particles[1].velocity = [-1.5, 0.5];

    let sum_before = [
        sim.particles[0].velocity[0] + sim.particles[1].velocity[0],
        sim.particles[0].velocity[1] + sim.particles[1].velocity[1],
    ];
    sim.step(1.0)?;
    let sum_after = [
        sim.particles[0].velocity[0] + sim.particles[1].velocity[0],
        sim.particles[0].velocity[1] + sim.particles[1].velocity[1],
    ];

    assert!((sum_before[0] - sum_after[0]).abs() < 1e-12);
    assert!((sum_before[1] - sum_after[1]).abs() < 1e-12);
    Ok(())
}

/// Inelastic variant: with collision damping 0.5 the exchanged normal
/// components are halved.
#[test]
fn damped_exchange_scales_normal_components() -> fluidsim::error::Result<()> {
    let mut params = quiet_params();
    params.collision_damping = 0.5;
    let mut sim = Simulation::new(2, params, Some(31))?;
    sim.particles[0].position = [100.0, 100.0];
    sim.particles[0].velocity = [1.0, 0.0];
    sim.particles[1].position = [108.0, 100.0];
    sim.particles[1].velocity = [-1.0, 0.0];

    sim.step(1.0)?;

    assert_eq!(sim.particles[0].velocity, [-0.5, 0.0]);
    assert_eq!(sim.particles[1].velocity, [0.5, 0.0]);
    Ok(())
}

/// No-penetration convergence: a clump of deeply overlapping particles is
/// pushed apart over a few steps until every pair separation is at least one
/// diameter, within tolerance. A single pass corrects rather than fully
/// eliminates deep overlaps; the sequential corrections compound.
#[test]
fn overlapping_clump_separates() -> fluidsim::error::Result<()> {
    let mut sim = Simulation::new(0, quiet_params(), Some(41))?;
    let seeds = [
        [400.0, 300.0],
        [403.0, 301.0],
        [398.0, 304.0],
        [401.0, 297.0],
        [404.0, 296.0],
    ];
    for (i, &position) in seeds.iter().enumerate() {
        sim.particles.push(fluidsim::core::Particle::new(
            i as u32, position, [0.0, 0.0], 50.0, 1.0,
        )?);
    }

    for _ in 0..30 {
        sim.step(1.0)?;
    }

    let min_dist = 2.0 * sim.params().particle_radius;
    for i in 0..sim.num_particles() {
        for j in (i + 1)..sim.num_particles() {
            let dist = separation(&sim, i, j);
            assert!(
                dist >= min_dist - 1e-6,
                "pair ({i},{j}) still overlapping: {dist}"
            );
        }
    }
    Ok(())
}
