// Default constants for the MPM fluid solver
use bevy::prelude::*;

// Global physics
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);

// Fluid material constants. A default emitter (1000 particles in a sphere of
// radius 0.05) then starts out close to rest density.
pub const PARTICLE_MASS: f32 = 5.0e-4;
pub const REST_DENSITY: f32 = 1000.0;

// Equation of state parameters
pub const EOS_STIFFNESS: f32 = 10.0;

// Blend between grid-reconstructed and carried-over particle density
pub const DENSITY_SMOOTHING: f32 = 0.3;

// Viscous stress coefficients (diagonal / off-diagonal strain rate scaling)
pub const NORMAL_STRESS_COEF: f32 = 0.0;
pub const SHEAR_STRESS_COEF: f32 = 0.0;

// Penalty stiffness for solid object contact
pub const CONTACT_STIFFNESS: f32 = 100.0;

pub const EMITTER_SEED: u64 = 2024;

// Default domain: unit cube
pub const DOMAIN_MIN: Vec3 = Vec3::ZERO;
pub const DOMAIN_MAX: Vec3 = Vec3::ONE;
pub const GRID_RESOLUTION: u32 = 64;
pub const GHOST_WIDTH: u32 = 2;
pub const PARTICLE_CAPACITY: usize = 100_000;

/// Offsets reach one cell on either side: the quadratic B-spline support.
pub const STENCIL_RADIUS: i32 = 1;
/// Number of cells in the 3x3x3 stencil
pub const NEIGHBOR_COUNT: usize = 27;
