pub mod grid;
pub mod grid_fields;
pub mod kernel;
pub mod mpm_state;
pub mod particle_set;

pub use grid::{STENCIL_OFFSETS, UniformGrid};
pub use grid_fields::GridFields;
pub use mpm_state::MpmFluidSolver;
pub use particle_set::{ParticleSet, SpatialIndex};
