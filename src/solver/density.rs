//! Particle density reconstruction from the rasterized grid density.

use rayon::prelude::*;

use crate::core::{GridFields, ParticleSet, SpatialIndex, UniformGrid, kernel};
use crate::math::Real;

/// Gather grid density at each particle and blend it with the particle's
/// previous density: `(1 - smoothing) * grid + smoothing * previous`.
///
/// A particle with no previous density (freshly emitted) takes the grid
/// estimate as is.
pub fn reconstruct_density(
    grid: &UniformGrid,
    index: &SpatialIndex,
    particles: &mut ParticleSet,
    fields: &GridFields,
    smoothing: Real,
) {
    let inv_spacing = grid.inv_spacing();
    let density_field = &fields.density;
    let positions = &particles.positions;

    particles
        .scalar_scratch
        .par_iter_mut()
        .enumerate()
        .for_each(|(p, estimate)| {
            let cell = grid.index_1d_to_3d(index.cell_of(p));
            *estimate = grid
                .stencil_indices(cell)
                .map(|(s, neighbor)| {
                    let w = kernel::weight(grid.cell_center(neighbor) - positions[p], inv_spacing);
                    density_field[s] * w
                })
                .sum();
        });

    particles
        .densities
        .par_iter_mut()
        .zip(particles.scalar_scratch.par_iter())
        .for_each(|(density, &estimate)| {
            *density = if *density > 0.0 {
                (1.0 - smoothing) * estimate + smoothing * *density
            } else {
                estimate
            };
        });
}
