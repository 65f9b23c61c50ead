//! End-to-end properties of the fluid pipeline
//!
//! Mass conservation, equation of state, wall containment, stencil symmetry,
//! rebuild idempotence, emission and quiescent-state scenarios.

use mpm_fluid::math::{Matrix, entry};
use mpm_fluid::{DomainConfig, FluidParams, MpmFluidSolver, SphereEmitter};

use bevy::math::{UVec3, Vec3};

fn small_domain() -> DomainConfig {
    DomainConfig::new(Vec3::ZERO, Vec3::ONE, UVec3::splat(32), 2).with_capacity(4096)
}

fn solver_with(params: FluidParams) -> MpmFluidSolver {
    MpmFluidSolver::new(small_domain(), params).expect("valid configuration")
}

fn max_abs_entry(m: &Matrix) -> f32 {
    (0..3)
        .flat_map(|i| (0..3).map(move |j| (i, j)))
        .map(|(i, j)| entry(m, i, j).abs())
        .fold(0.0, f32::max)
}

/// Particles on a regular lattice, two per cell per axis, filling `[lo, hi]^3`.
fn fill_block(solver: &mut MpmFluidSolver, lo: f32, hi: f32, velocity: Vec3) {
    let step = solver.grid().spacing().x * 0.5;
    let n = ((hi - lo) / step) as u32;
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                let position = Vec3::splat(lo) + (UVec3::new(i, j, k).as_vec3() + 0.5) * step;
                solver.add_particle(position, velocity);
            }
        }
    }
}

#[test]
fn rasterized_mass_matches_particle_mass() {
    let mut solver = solver_with(FluidParams::default());
    solver
        .source_from_sphere(Vec3::new(0.5, 0.5, 0.5), Vec3::new(0.5, -0.2, 0.1), 0.1, 800)
        .unwrap();
    solver.rebuild_spatial_index();
    solver.rasterize();

    let grid_mass = solver.total_grid_mass();
    let particle_mass = solver.total_particle_mass();
    assert!(
        ((grid_mass - particle_mass) / particle_mass).abs() < 1e-3,
        "grid mass {grid_mass} vs particle mass {particle_mass}"
    );
}

#[test]
fn mass_is_conserved_across_substeps() {
    let mut solver = solver_with(FluidParams::default());
    solver
        .source_from_sphere(Vec3::new(0.5, 0.6, 0.5), Vec3::ZERO, 0.08, 500)
        .unwrap();
    solver.rebuild_spatial_index();

    for _ in 0..5 {
        solver.substep(1.0 / 600.0);
        solver.rasterize();
        let grid_mass = solver.total_grid_mass();
        let particle_mass = solver.total_particle_mass();
        assert!(
            ((grid_mass - particle_mass) / particle_mass).abs() < 1e-3,
            "grid mass {grid_mass} vs particle mass {particle_mass}"
        );
    }
}

#[test]
fn pressure_vanishes_at_rest_density() {
    for (rest_density, stiffness) in [(1000.0, 10.0), (1.0, 0.5), (0.25, 300.0)] {
        let params = FluidParams::default()
            .with_rest_density(rest_density)
            .with_stiffness(stiffness);
        let solver = solver_with(params);
        assert_eq!(solver.pressure(rest_density), 0.0);
        assert!(solver.pressure(rest_density * 1.2) > 0.0);
    }
}

#[test]
fn coupling_clamps_particles_to_walls() {
    let mut solver = solver_with(FluidParams::default());
    let starts = [
        (Vec3::new(-0.2, 0.5, 0.5), Vec3::new(-1.0, 0.5, 0.0)),
        (Vec3::new(0.5, 1.3, 0.5), Vec3::new(0.2, 3.0, -0.1)),
        (Vec3::new(0.01, 0.99, 0.0), Vec3::new(-1.0, 1.0, -1.0)),
        (Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 1.0, 1.0)),
    ];
    for (position, velocity) in starts {
        solver.add_particle(position, velocity);
    }
    solver.couple_with_objects();

    let walls = *solver.walls();
    let particles = solver.particles();
    for (p, (start, start_velocity)) in starts.iter().enumerate() {
        let position = particles.positions()[p];
        let velocity = particles.velocities()[p];
        assert!(walls.contains(position), "particle {p} at {position}");
        for axis in 0..3 {
            if position[axis] != start[axis] {
                assert_eq!(velocity[axis], 0.0, "particle {p} axis {axis}");
            } else {
                assert_eq!(velocity[axis], start_velocity[axis]);
            }
        }
    }
    assert_eq!(particles.velocities()[3], Vec3::ONE);
}

#[test]
fn jets_into_walls_stay_inside() {
    let mut solver = solver_with(FluidParams::default());
    solver
        .add_emitter(SphereEmitter::new(
            Vec3::new(0.2, 0.5, 0.5),
            Vec3::new(-4.0, 0.0, 0.0),
            0.05,
            200,
        ))
        .unwrap();
    solver
        .add_emitter(SphereEmitter::new(
            Vec3::new(0.5, 0.2, 0.8),
            Vec3::new(0.0, -3.0, 3.0),
            0.05,
            200,
        ))
        .unwrap();

    for _ in 0..4 {
        solver.advance_frame(1.0 / 60.0, 10);
        let walls = solver.walls();
        for &position in solver.particles().positions() {
            assert!(walls.contains(position), "escaped to {position}");
        }
    }
    assert_eq!(solver.particle_count(), 1600);
    assert_eq!(solver.check_finite(), Ok(()));
}

#[test]
fn quiescent_field_has_zero_strain_rate() {
    let mut solver = solver_with(FluidParams::default());
    fill_block(&mut solver, 0.35, 0.65, Vec3::ZERO);
    solver.rebuild_spatial_index();
    solver.rasterize();

    for &position in solver.particles().positions() {
        assert_eq!(solver.strain_rate_at(position), Matrix::ZERO);
    }
}

#[test]
fn uniform_translation_has_no_interior_strain_rate() {
    let mut solver = solver_with(FluidParams::default());
    fill_block(&mut solver, 0.3, 0.7, Vec3::new(1.0, 0.5, -0.25));
    solver.rebuild_spatial_index();
    solver.rasterize();

    let interior = solver
        .particles()
        .positions()
        .iter()
        .filter(|p| p.cmpge(Vec3::splat(0.45)).all() && p.cmple(Vec3::splat(0.55)).all());
    let mut checked = 0;
    for &position in interior {
        let d = solver.strain_rate_at(position);
        assert!(max_abs_entry(&d) < 1e-3, "strain rate {d} at {position}");
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn rebuild_twice_gives_identical_index() {
    let mut solver = solver_with(FluidParams::default());
    solver
        .source_from_sphere(Vec3::splat(0.5), Vec3::ZERO, 0.15, 1000)
        .unwrap();
    solver.rebuild_spatial_index();
    let first = solver.spatial_index().clone();
    solver.rebuild_spatial_index();
    assert_eq!(solver.spatial_index(), &first);
    assert_eq!(first.len(), 1000);
}

#[test]
fn source_from_sphere_appends_exactly() {
    let mut solver = solver_with(FluidParams::default());
    solver.add_particle(Vec3::splat(0.5), Vec3::ZERO);

    let center = Vec3::new(0.4, 0.6, 0.3);
    let velocity = Vec3::new(-2.0, 0.0, 0.5);
    let range = solver.source_from_sphere(center, velocity, 0.07, 321).unwrap();

    assert_eq!(range, 1..322);
    assert_eq!(solver.particle_count(), 322);
    let particles = solver.particles();
    for i in range {
        assert!((particles.positions()[i] - center).length() < 0.07);
        assert_eq!(particles.velocities()[i], velocity);
    }
}

#[test]
fn lone_particle_at_rest_stays_put() {
    let params = FluidParams::default()
        .with_gravity(Vec3::ZERO)
        .with_stiffness(0.0);
    let mut solver = solver_with(params);
    let center = solver.grid().cell_center(solver.grid().resolution() / 2);
    solver.add_particle(center, Vec3::ZERO);

    solver.advance_frame(1.0 / 60.0, 1);

    assert_eq!(solver.particles().positions()[0], center);
    assert_eq!(solver.particles().velocities()[0], Vec3::ZERO);
}

#[test]
fn lone_particle_falls_freely() {
    let params = FluidParams::default().with_stiffness(0.0);
    let gravity = params.gravity;
    let mut solver = solver_with(params);
    let center = solver.grid().cell_center(solver.grid().resolution() / 2);
    solver.add_particle(center, Vec3::ZERO);

    let dt = 1.0 / 600.0;
    solver.substep(dt);

    let velocity = solver.particles().velocities()[0];
    assert!((velocity - gravity * dt).length() < 1e-4, "velocity {velocity}");
    let position = solver.particles().positions()[0];
    assert!((position - (center + gravity * dt * dt)).length() < 1e-5);
}

#[test]
fn compressed_pair_pushes_apart() {
    let params = FluidParams::default()
        .with_mass(1.0)
        .with_rest_density(1000.0)
        .with_stiffness(1.0)
        .with_gravity(Vec3::ZERO);
    let mut solver = solver_with(params);
    let center = solver.grid().cell_center(solver.grid().resolution() / 2);
    let offset = Vec3::new(0.25 * solver.grid().spacing().x, 0.0, 0.0);
    solver.add_particle(center - offset, Vec3::ZERO);
    solver.add_particle(center + offset, Vec3::ZERO);

    solver.substep(1e-4);

    let left = solver.particles().velocities()[0];
    let right = solver.particles().velocities()[1];
    assert!(left.x < 0.0 && right.x > 0.0, "left {left}, right {right}");
    assert!(((left.x + right.x) / right.x).abs() < 1e-2, "asymmetric: {left} {right}");
    assert!(left.y.abs() < 1e-3 * right.x && left.z.abs() < 1e-3 * right.x);
    assert!(solver.particles().densities()[0] > 1000.0);
}

#[test]
fn default_scene_runs_a_few_frames() {
    let settings = mpm_fluid::FluidSettings {
        domain: small_domain().with_capacity(8192),
        ..Default::default()
    };
    let mut solver = settings.build_solver().unwrap();

    for _ in 0..2 {
        solver.advance_frame(settings.seconds_per_frame, settings.substeps);
    }
    assert_eq!(solver.particle_count(), 4000);
    assert_eq!(solver.check_finite(), Ok(()));
    assert!(solver.density_points().count() > 0);
}
