//! Solver error types

use crate::math::{Real, Vector};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SolverError {
    #[error("grid resolution must be at least {min} cells per axis, got {got:?}")]
    InvalidResolution { min: u32, got: [u32; 3] },
    #[error("domain max {max} must be strictly greater than min {min} on every axis")]
    InvalidBounds { min: Vector, max: Vector },
    #[error("ghost width {ghost_width} leaves no room for the kernel stencil (resolution {resolution:?})")]
    InvalidGhostWidth { ghost_width: u32, resolution: [u32; 3] },
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: Real },
    #[error("emitter at {center} with radius {radius} reaches outside the simulation interior")]
    EmitterOutsideDomain { center: Vector, radius: Real },
    #[error("particle {index} has non-finite {attribute}")]
    NonFiniteParticle { index: usize, attribute: &'static str },
    #[error("no solid object named `{0}`")]
    UnknownObject(String),
}

pub type SolverResult<T> = Result<T, SolverError>;
