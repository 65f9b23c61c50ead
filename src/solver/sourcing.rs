//! Particle emission.

use std::ops::Range;

use bevy::prelude::*;
use rand::Rng;

use crate::core::ParticleSet;
use crate::error::{SolverError, SolverResult};
use crate::math::Real;

/// Uniform random point strictly inside the sphere, by rejection sampling
/// from the bounding cube.
pub fn random_point_in_sphere<R: Rng>(rng: &mut R, center: Vec3, radius: Real) -> Vec3 {
    loop {
        let candidate = center
            + radius
                * Vec3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                );
        if (candidate - center).length() < radius {
            return candidate;
        }
    }
}

/// Append `count` particles sampled inside a sphere, all moving at
/// `velocity`. Returns the index range of the new particles.
pub fn source_from_sphere<R: Rng>(
    particles: &mut ParticleSet,
    rng: &mut R,
    center: Vec3,
    velocity: Vec3,
    radius: Real,
    count: usize,
) -> SolverResult<Range<usize>> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(SolverError::InvalidParameter {
            name: "radius",
            value: radius,
        });
    }

    let start = particles.len();
    for _ in 0..count {
        let position = random_point_in_sphere(rng, center, radius);
        particles.add_particle(position, velocity);
    }
    Ok(start..particles.len())
}
