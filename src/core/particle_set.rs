use bevy::prelude::*;

use crate::core::grid::UniformGrid;
use crate::math::{Matrix, Real, zero_matrix};

/// Fluid particles stored as parallel attribute arrays.
///
/// Particles are only ever appended, so an index stays valid for the life
/// of the set. Every array has exactly `len()` entries.
#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) velocities: Vec<Vec3>,
    /// Contact penalty force, rebuilt by object coupling each substep
    pub(crate) forces: Vec<Vec3>,
    /// Velocity gathered back from the grid, applied during advection
    pub(crate) grid_velocities: Vec<Vec3>,
    pub(crate) densities: Vec<Real>,
    /// Symmetric Cauchy stress
    pub(crate) stresses: Vec<Matrix>,
    /// Per-particle scratch for passes that must not overwrite their input
    pub(crate) scalar_scratch: Vec<Real>,
}

impl ParticleSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            forces: Vec::with_capacity(capacity),
            grid_velocities: Vec::with_capacity(capacity),
            densities: Vec::with_capacity(capacity),
            stresses: Vec::with_capacity(capacity),
            scalar_scratch: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.positions.capacity()
    }

    /// Append a particle and return its index. Density starts at zero, which
    /// the density pass treats as "no history yet".
    pub fn add_particle(&mut self, position: Vec3, velocity: Vec3) -> usize {
        let index = self.positions.len();
        self.positions.push(position);
        self.velocities.push(velocity);
        self.forces.push(Vec3::ZERO);
        self.grid_velocities.push(Vec3::ZERO);
        self.densities.push(0.0);
        self.stresses.push(zero_matrix());
        self.scalar_scratch.push(0.0);
        index
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn forces(&self) -> &[Vec3] {
        &self.forces
    }

    pub fn grid_velocities(&self) -> &[Vec3] {
        &self.grid_velocities
    }

    pub fn densities(&self) -> &[Real] {
        &self.densities
    }

    pub fn stresses(&self) -> &[Matrix] {
        &self.stresses
    }
}

/// Cell-sorted particle index: which cell holds each particle, and which
/// particles sit in each cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpatialIndex {
    /// Linear cell index per particle (parallel to particle arrays)
    particle_cells: Vec<u32>,
    /// Particle indices sorted by cell
    sorted: Vec<u32>,
    /// `sorted[cell_offsets[c]..cell_offsets[c + 1]]` are the particles of cell `c`
    cell_offsets: Vec<u32>,
}

impl SpatialIndex {
    pub fn new(cell_count: usize) -> Self {
        Self {
            particle_cells: Vec::new(),
            sorted: Vec::new(),
            cell_offsets: vec![0; cell_count + 1],
        }
    }

    /// Rebuild from scratch with a counting sort over cells. Returns how many
    /// particles had to be clamped back into the stencil-safe region.
    pub fn rebuild(&mut self, grid: &UniformGrid, positions: &[Vec3]) -> usize {
        let cell_count = grid.cell_count();
        let mut clamped_count = 0;

        self.particle_cells.clear();
        self.particle_cells.extend(positions.iter().map(|&position| {
            let (cell, clamped) = grid.containing_cell(position);
            clamped_count += clamped as usize;
            grid.index_3d_to_1d(cell) as u32
        }));

        self.cell_offsets.clear();
        self.cell_offsets.resize(cell_count + 1, 0);
        for &cell in &self.particle_cells {
            self.cell_offsets[cell as usize + 1] += 1;
        }
        for c in 0..cell_count {
            self.cell_offsets[c + 1] += self.cell_offsets[c];
        }

        // Stable fill: particles within a cell keep ascending index order.
        let mut cursor = self.cell_offsets[..cell_count].to_vec();
        self.sorted.clear();
        self.sorted.resize(positions.len(), 0);
        for (particle, &cell) in self.particle_cells.iter().enumerate() {
            let slot = &mut cursor[cell as usize];
            self.sorted[*slot as usize] = particle as u32;
            *slot += 1;
        }

        clamped_count
    }

    /// Number of particles the index was built for.
    pub fn len(&self) -> usize {
        self.particle_cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particle_cells.is_empty()
    }

    /// Linear index of the stencil-safe cell holding `particle`.
    #[inline(always)]
    pub fn cell_of(&self, particle: usize) -> usize {
        self.particle_cells[particle] as usize
    }

    /// Particles whose containing cell is `cell`.
    #[inline(always)]
    pub fn particles_in_cell(&self, cell: usize) -> &[u32] {
        let start = self.cell_offsets[cell] as usize;
        let end = self.cell_offsets[cell + 1] as usize;
        &self.sorted[start..end]
    }

    pub fn particle_order(&self) -> &[u32] {
        &self.sorted
    }
}
