//! Per-substep solver stages.
//!
//! Stage order within a substep:
//! rasterize -> density -> stress -> grid forces -> grid velocity update ->
//! gather -> advect -> object/wall coupling -> spatial rebuild.
//! Every stage finishes for all particles/cells before the next begins.

pub mod boundary;
pub mod density;
pub mod g2p;
pub mod grid_update;
pub mod p2g;
pub mod sourcing;
pub mod stress;

pub use boundary::{WallConditions, couple_with_objects};
pub use density::reconstruct_density;
pub use g2p::{advect_particles, gather_grid_velocities};
pub use grid_update::update_grid_velocities;
pub use p2g::{compute_grid_forces, particle_volume, rasterize};
pub use sourcing::{random_point_in_sphere, source_from_sphere};
pub use stress::{compute_stress_tensors, strain_rate};
