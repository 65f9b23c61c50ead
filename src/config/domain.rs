use bevy::prelude::*;

use super::constants::*;
use crate::error::{SolverError, SolverResult};
use crate::math::Real;

/// Grid layout and particle storage sizing.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainConfig {
    pub min: Vec3,
    pub max: Vec3,
    /// Cells per axis
    pub resolution: UVec3,
    /// Layers of ghost cells inside each face of the box
    pub ghost_width: u32,
    /// Particle slots reserved up front
    pub particle_capacity: usize,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            min: DOMAIN_MIN,
            max: DOMAIN_MAX,
            resolution: UVec3::splat(GRID_RESOLUTION),
            ghost_width: GHOST_WIDTH,
            particle_capacity: PARTICLE_CAPACITY,
        }
    }
}

impl DomainConfig {
    pub fn new(min: Vec3, max: Vec3, resolution: UVec3, ghost_width: u32) -> Self {
        Self {
            min,
            max,
            resolution,
            ghost_width,
            ..Default::default()
        }
    }

    pub fn with_capacity(mut self, particle_capacity: usize) -> Self {
        self.particle_capacity = particle_capacity;
        self
    }

    pub fn validate(&self) -> SolverResult<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.max.cmple(self.min).any() {
            return Err(SolverError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }

        // A particle clamped to the wall margin sits in cell `ghost_width`; its
        // stencil reaches one cell further out, so a single ghost layer is the
        // minimum, and at least one interior cell must remain.
        let resolution = self.resolution.to_array();
        let min_resolution = 2 * self.ghost_width + 1;
        if self.ghost_width < STENCIL_RADIUS as u32 {
            return Err(SolverError::InvalidGhostWidth {
                ghost_width: self.ghost_width,
                resolution,
            });
        }
        if self.resolution.min_element() < min_resolution {
            return Err(SolverError::InvalidResolution {
                min: min_resolution,
                got: resolution,
            });
        }

        Ok(())
    }
}

/// Spherical particle source fired once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereEmitter {
    pub center: Vec3,
    pub velocity: Vec3,
    pub radius: Real,
    /// Particles emitted per frame
    pub count: usize,
}

impl SphereEmitter {
    pub fn new(center: Vec3, velocity: Vec3, radius: Real, count: usize) -> Self {
        Self {
            center,
            velocity,
            radius,
            count,
        }
    }

    /// Two opposing jets meeting in the middle of the unit cube.
    pub fn colliding_pair() -> [Self; 2] {
        [
            Self::new(Vec3::new(0.2, 0.7, 0.5), Vec3::new(2.0, 0.0, 0.0), 0.05, 1000),
            Self::new(Vec3::new(0.8, 0.7, 0.5), Vec3::new(-2.0, 0.0, 0.0), 0.05, 1000),
        ]
    }
}
