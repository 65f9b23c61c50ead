//! Strain rate and stress tensor computation.

use bevy::prelude::*;
use rayon::prelude::*;

use crate::config::FluidParams;
use crate::core::{ParticleSet, SpatialIndex, UniformGrid, kernel};
use crate::materials::cauchy_stress;
use crate::math::{Matrix, outer_product, symmetric_part, zero_matrix};

/// Symmetric velocity gradient at `position`, sampled from `velocity_field`
/// over the stencil of `cell`.
pub fn strain_rate(
    grid: &UniformGrid,
    velocity_field: &[Vec3],
    cell: UVec3,
    position: Vec3,
) -> Matrix {
    let inv_spacing = grid.inv_spacing();
    // Entry (i, j) is du_i/dx_j.
    let velocity_gradient = grid
        .stencil_indices(cell)
        .fold(zero_matrix(), |gradient, (s, neighbor)| {
            let grad = kernel::weight_gradient(grid.cell_center(neighbor) - position, inv_spacing);
            gradient + outer_product(velocity_field[s], grad)
        });
    symmetric_part(&velocity_gradient)
}

/// Cauchy stress per particle from its density and the rasterized grid
/// velocity.
pub fn compute_stress_tensors(
    grid: &UniformGrid,
    index: &SpatialIndex,
    particles: &mut ParticleSet,
    velocity_field: &[Vec3],
    params: &FluidParams,
) {
    let positions = &particles.positions;
    let densities = &particles.densities;

    particles
        .stresses
        .par_iter_mut()
        .enumerate()
        .for_each(|(p, stress)| {
            let cell = grid.index_1d_to_3d(index.cell_of(p));
            let d = strain_rate(grid, velocity_field, cell, positions[p]);
            *stress = cauchy_stress(densities[p], &d, params);
        });
}
