//! Grid-to-Particle (G2P) transfer operations
//!
//! Samples the force-updated grid velocity back onto particles and moves
//! them. This is a plain PIC transfer: the gathered velocity replaces the
//! particle velocity outright.

use bevy::prelude::*;
use rayon::prelude::*;

use crate::core::{ParticleSet, SpatialIndex, UniformGrid, kernel};
use crate::math::Real;

/// Write the kernel-weighted grid velocity into each particle's
/// `grid_velocities` slot.
pub fn gather_grid_velocities(
    grid: &UniformGrid,
    index: &SpatialIndex,
    particles: &mut ParticleSet,
    updated_velocity: &[Vec3],
) {
    let inv_spacing = grid.inv_spacing();
    let positions = &particles.positions;

    particles
        .grid_velocities
        .par_iter_mut()
        .enumerate()
        .for_each(|(p, sampled)| {
            let cell = grid.index_1d_to_3d(index.cell_of(p));
            *sampled = grid
                .stencil_indices(cell)
                .map(|(s, neighbor)| {
                    let w = kernel::weight(grid.cell_center(neighbor) - positions[p], inv_spacing);
                    updated_velocity[s] * w
                })
                .sum();
        });
}

/// `x += dt * v_grid`, then `v = v_grid`.
pub fn advect_particles(particles: &mut ParticleSet, dt: Real) {
    let ParticleSet {
        positions,
        velocities,
        grid_velocities,
        ..
    } = particles;

    positions
        .par_iter_mut()
        .zip(velocities.par_iter_mut())
        .zip(grid_velocities.par_iter())
        .for_each(|((position, velocity), &sampled)| {
            *position += dt * sampled;
            *velocity = sampled;
        });
}
