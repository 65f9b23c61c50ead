use rayon::prelude::*;

use crate::core::GridFields;
use crate::materials::utils;
use crate::math::Real;

/// Grid update stage: `v += dt * f / m` for every cell holding mass.
/// Massless cells keep their (zero) velocity.
pub fn update_grid_velocities(fields: &mut GridFields, cell_volume: Real, dt: Real) {
    let GridFields {
        density,
        velocity,
        updated_velocity,
        force,
    } = fields;

    updated_velocity
        .par_iter_mut()
        .zip(velocity.par_iter())
        .zip(density.par_iter().zip(force.par_iter()))
        .for_each(|((updated, &velocity), (&density, &force))| {
            let mass = density * cell_volume;
            *updated = if mass > 0.0 {
                velocity + dt * force * utils::inv_exact(mass)
            } else {
                velocity
            };
        });
}
