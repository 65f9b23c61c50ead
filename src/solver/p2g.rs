//! Particle-to-Grid (P2G) transfer operations
//!
//! Rasterizes mass and momentum, and scatters stress divergence and external
//! forces onto grid cells.
//!
//! Both passes run cell-centric: each cell pulls from the particles binned in
//! its 3x3x3 neighborhood instead of particles pushing into shared cells, so
//! cells can be processed in parallel without atomics and every sum is
//! accumulated in a fixed order.

use bevy::prelude::*;
use rayon::prelude::*;

use crate::config::FluidParams;
use crate::core::{GridFields, ParticleSet, SpatialIndex, UniformGrid, kernel};
use crate::materials::utils;
use crate::math::Real;

/// Rasterize particle mass and velocity to the grid.
///
/// Overwrites `density` (mass per cell volume) and `velocity` (mass-weighted
/// average) for every cell. Cells with no mass get zero velocity.
pub fn rasterize(
    grid: &UniformGrid,
    index: &SpatialIndex,
    particles: &ParticleSet,
    mass: Real,
    fields: &mut GridFields,
) {
    let inv_spacing = grid.inv_spacing();
    let inv_cell_volume = utils::inv_exact(grid.cell_volume());
    let positions = &particles.positions;
    let velocities = &particles.velocities;

    fields
        .density
        .par_iter_mut()
        .zip(fields.velocity.par_iter_mut())
        .enumerate()
        .for_each(|(cell, (density, velocity))| {
            let coord = grid.index_1d_to_3d(cell);
            let center = grid.cell_center(coord);

            let mut cell_mass = 0.0;
            let mut momentum = Vec3::ZERO;
            for neighbor in grid.neighborhood(coord) {
                for &p in index.particles_in_cell(neighbor) {
                    let p = p as usize;
                    let w = kernel::weight(center - positions[p], inv_spacing);
                    cell_mass += mass * w;
                    momentum += mass * w * velocities[p];
                }
            }

            *density = cell_mass * inv_cell_volume;
            *velocity = momentum * utils::inv_exact(cell_mass);
        });
}

/// Scatter `-V σ ∇w` and the weighted external force `w (f + m g)` to every
/// cell, where `f` is the particle's contact force accumulator.
///
/// Requires stress tensors for all particles. Overwrites `force`, leaving the
/// particle accumulators untouched, so repeated calls give the same field.
pub fn compute_grid_forces(
    grid: &UniformGrid,
    index: &SpatialIndex,
    particles: &ParticleSet,
    params: &FluidParams,
    fields: &mut GridFields,
) {
    let inv_spacing = grid.inv_spacing();
    let positions = &particles.positions;
    let densities = &particles.densities;
    let stresses = &particles.stresses;
    let contact = &particles.forces;
    let body_force = params.mass * params.gravity;

    fields
        .force
        .par_iter_mut()
        .enumerate()
        .for_each(|(cell, force)| {
            let coord = grid.index_1d_to_3d(cell);
            let center = grid.cell_center(coord);

            let mut total = Vec3::ZERO;
            for neighbor in grid.neighborhood(coord) {
                for &p in index.particles_in_cell(neighbor) {
                    let p = p as usize;
                    let (w, grad) = kernel::weight_and_gradient(center - positions[p], inv_spacing);
                    if w == 0.0 {
                        continue;
                    }
                    let volume = particle_volume(params, densities[p]);
                    total -= volume * (stresses[p] * grad);
                    total += w * (contact[p] + body_force);
                }
            }
            *force = total;
        });
}

/// `mass / density`, falling back to rest volume before a density exists.
#[inline(always)]
pub fn particle_volume(params: &FluidParams, density: Real) -> Real {
    if density > 0.0 {
        params.mass / density
    } else {
        params.mass / params.rest_density
    }
}
