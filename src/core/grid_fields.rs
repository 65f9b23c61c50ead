use bevy::prelude::*;

use crate::core::grid::UniformGrid;
use crate::math::Real;

/// Per-cell fields, each exactly `grid.cell_count()` long.
///
/// The rasterized velocity and the force-updated velocity are kept apart so
/// the strain-rate pass and the gather pass each read a finished stage.
#[derive(Clone, Debug)]
pub struct GridFields {
    /// Rasterized mass per unit volume
    pub density: Vec<Real>,
    /// Mass-weighted average of particle velocities
    pub velocity: Vec<Vec3>,
    /// `velocity` after applying `force` over one substep
    pub updated_velocity: Vec<Vec3>,
    pub force: Vec<Vec3>,
}

impl GridFields {
    pub fn new(grid: &UniformGrid) -> Self {
        let n = grid.cell_count();
        Self {
            density: vec![0.0; n],
            velocity: vec![Vec3::ZERO; n],
            updated_velocity: vec![Vec3::ZERO; n],
            force: vec![Vec3::ZERO; n],
        }
    }

    pub fn len(&self) -> usize {
        self.density.len()
    }

    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }

    /// Total rasterized mass.
    pub fn total_mass(&self, cell_volume: Real) -> Real {
        self.density.iter().map(|&density| density * cell_volume).sum()
    }

    /// Centers and densities of cells holding fluid, for point-cloud display.
    pub fn density_points<'a>(
        &'a self,
        grid: &'a UniformGrid,
    ) -> impl Iterator<Item = (Vec3, Real)> + 'a {
        self.density
            .iter()
            .enumerate()
            .filter(|&(_, &density)| density > Real::EPSILON)
            .map(|(cell, &density)| (grid.cell_center(grid.index_1d_to_3d(cell)), density))
    }
}
