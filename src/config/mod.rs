//! Configuration and parameters
//!
//! Default constants, fluid model parameters, domain layout and emitters.

pub mod constants;
pub mod domain;
pub mod solver_params;

pub use constants::*;
pub use domain::*;
pub use solver_params::*;
