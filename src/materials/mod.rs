//! Materials for MPM simulation
//!
//! * `fluid` - weakly compressible fluid: cubic equation of state plus a
//!   strain-rate-proportional viscous stress
//! * `utils` - guarded arithmetic and sanity checks shared by the passes

pub mod fluid;
pub mod utils;

pub use fluid::{cauchy_stress, pressure, viscous_stress};
pub use utils::check;
