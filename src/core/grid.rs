//! Background grid for MPM simulation
//!
//! Dense uniform 3D lattice over an axis-aligned box. The outermost
//! `ghost_width` layers of cells on each face are ghost cells: particles are
//! kept out of them so every particle's 3x3x3 stencil stays on the lattice.

use bevy::prelude::*;

use crate::config::{DomainConfig, NEIGHBOR_COUNT, STENCIL_RADIUS};
use crate::math::Real;

/// Cell offsets of the 3x3x3 quadratic B-spline stencil, x fastest.
pub const STENCIL_OFFSETS: [IVec3; NEIGHBOR_COUNT] = {
    let mut offsets = [IVec3::ZERO; NEIGHBOR_COUNT];
    let mut n = 0;
    while n < NEIGHBOR_COUNT {
        let i = n as i32;
        offsets[n] = IVec3::new(i % 3 - 1, (i / 3) % 3 - 1, i / 9 - 1);
        n += 1;
    }
    offsets
};

#[derive(Clone, Debug, PartialEq)]
pub struct UniformGrid {
    min: Vec3,
    max: Vec3,
    resolution: UVec3,
    ghost_width: u32,
    spacing: Vec3,
    inv_spacing: Vec3,
    cell_count: usize,
}

impl UniformGrid {
    /// Build the lattice. The domain is expected to be validated already.
    pub fn new(domain: &DomainConfig) -> Self {
        let resolution = domain.resolution;
        let spacing = (domain.max - domain.min) / resolution.as_vec3();
        Self {
            min: domain.min,
            max: domain.max,
            resolution,
            ghost_width: domain.ghost_width,
            spacing,
            inv_spacing: spacing.recip(),
            cell_count: resolution.x as usize * resolution.y as usize * resolution.z as usize,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn resolution(&self) -> UVec3 {
        self.resolution
    }

    pub fn ghost_width(&self) -> u32 {
        self.ghost_width
    }

    /// Per-axis cell size (dx, dy, dz)
    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    pub fn inv_spacing(&self) -> Vec3 {
        self.inv_spacing
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    pub fn cell_volume(&self) -> Real {
        self.spacing.x * self.spacing.y * self.spacing.z
    }

    /// Distance from each face of the box to the closest position a particle
    /// may occupy: the ghost layers plus half a cell.
    pub fn wall_margin(&self) -> Vec3 {
        self.spacing * (self.ghost_width as Real + 0.5)
    }

    #[inline(always)]
    pub fn index_3d_to_1d(&self, cell: UVec3) -> usize {
        debug_assert!(cell.cmplt(self.resolution).all(), "cell {cell} off the lattice");
        let res = self.resolution;
        cell.x as usize + res.x as usize * (cell.y as usize + res.y as usize * cell.z as usize)
    }

    #[inline(always)]
    pub fn index_1d_to_3d(&self, index: usize) -> UVec3 {
        let res_x = self.resolution.x as usize;
        let res_y = self.resolution.y as usize;
        UVec3::new(
            (index % res_x) as u32,
            ((index / res_x) % res_y) as u32,
            (index / (res_x * res_y)) as u32,
        )
    }

    #[inline(always)]
    pub fn cell_center(&self, cell: UVec3) -> Vec3 {
        self.min + (cell.as_vec3() + 0.5) * self.spacing
    }

    /// Raw cell coordinate of a position, possibly off the lattice.
    #[inline(always)]
    pub fn cell_coord(&self, position: Vec3) -> IVec3 {
        ((position - self.min) * self.inv_spacing).floor().as_ivec3()
    }

    /// Cell containing `position`, clamped so its whole stencil is on the
    /// lattice. The flag is `true` when clamping was needed, which means the
    /// particle escaped the wall margin.
    #[inline(always)]
    pub fn containing_cell(&self, position: Vec3) -> (UVec3, bool) {
        let raw = self.cell_coord(position);
        let lo = IVec3::splat(STENCIL_RADIUS);
        let hi = self.resolution.as_ivec3() - IVec3::splat(STENCIL_RADIUS + 1);
        let clamped = raw.clamp(lo, hi);
        (clamped.as_uvec3(), clamped != raw)
    }

    /// Whether every cell of `cell`'s stencil is on the lattice.
    #[inline(always)]
    pub fn is_stencil_safe(&self, cell: UVec3) -> bool {
        let radius = STENCIL_RADIUS as u32;
        cell.cmpge(UVec3::splat(radius)).all()
            && (cell + radius).cmplt(self.resolution).all()
    }

    /// Cells of the stencil around a stencil-safe `cell`.
    #[inline(always)]
    pub fn stencil(&self, cell: UVec3) -> impl Iterator<Item = UVec3> + use<> {
        let base = cell.as_ivec3();
        STENCIL_OFFSETS
            .into_iter()
            .map(move |offset| (base + offset).as_uvec3())
    }

    /// Stencil around any `cell`, skipping cells off the lattice. Used by the
    /// cell-centric passes, where edge cells still pull from their neighbors.
    #[inline(always)]
    pub fn neighborhood(&self, cell: UVec3) -> impl Iterator<Item = usize> + '_ {
        let base = cell.as_ivec3();
        let resolution = self.resolution.as_ivec3();
        STENCIL_OFFSETS.into_iter().filter_map(move |offset| {
            let neighbor = base + offset;
            (neighbor.cmpge(IVec3::ZERO).all() && neighbor.cmplt(resolution).all())
                .then(|| self.index_3d_to_1d(neighbor.as_uvec3()))
        })
    }

    /// Same as [`stencil`](Self::stencil) but yields linear indices, for
    /// callers that only touch field arrays.
    #[inline(always)]
    pub fn stencil_indices(&self, cell: UVec3) -> impl Iterator<Item = (usize, UVec3)> + '_ {
        self.stencil(cell)
            .map(|neighbor| (self.index_3d_to_1d(neighbor), neighbor))
    }
}
