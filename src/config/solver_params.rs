use bevy::prelude::*;

use super::constants::*;
use crate::error::{SolverError, SolverResult};
use crate::math::Real;

/// Fluid model parameters, fixed for the lifetime of a solver.
#[derive(Clone, Debug, PartialEq)]
pub struct FluidParams {
    /// Mass carried by every particle
    pub mass: Real,
    /// Density at which the equation of state yields zero pressure
    pub rest_density: Real,
    /// Bulk-modulus-like coefficient of the cubic equation of state
    pub stiffness: Real,
    /// Weight of the carried-over particle density when blending with the
    /// grid estimate (0.0 = pure grid, 1.0 = never update)
    pub smoothing: Real,
    /// Scales the diagonal strain rate entries in the viscous stress
    pub normal_stress_coef: Real,
    /// Scales the off-diagonal strain rate entries in the viscous stress
    pub shear_stress_coef: Real,
    pub gravity: Vec3,
    /// Penalty coefficient for solid object contact forces
    pub contact_stiffness: Real,
    /// Seed for emitter sampling
    pub seed: u64,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            mass: PARTICLE_MASS,
            rest_density: REST_DENSITY,
            stiffness: EOS_STIFFNESS,
            smoothing: DENSITY_SMOOTHING,
            normal_stress_coef: NORMAL_STRESS_COEF,
            shear_stress_coef: SHEAR_STRESS_COEF,
            gravity: GRAVITY,
            contact_stiffness: CONTACT_STIFFNESS,
            seed: EMITTER_SEED,
        }
    }
}

impl FluidParams {
    pub fn with_mass(mut self, mass: Real) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_rest_density(mut self, rest_density: Real) -> Self {
        self.rest_density = rest_density;
        self
    }

    pub fn with_stiffness(mut self, stiffness: Real) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Set density smoothing (clamped to 0.0..=1.0)
    pub fn with_smoothing(mut self, smoothing: Real) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    pub fn with_viscosity(mut self, normal_stress_coef: Real, shear_stress_coef: Real) -> Self {
        self.normal_stress_coef = normal_stress_coef;
        self.shear_stress_coef = shear_stress_coef;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_contact_stiffness(mut self, contact_stiffness: Real) -> Self {
        self.contact_stiffness = contact_stiffness;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject parameter sets the pipeline cannot advance.
    pub fn validate(&self) -> SolverResult<()> {
        let positive = [("mass", self.mass), ("rest_density", self.rest_density)];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SolverError::InvalidParameter { name, value });
            }
        }

        let non_negative = [
            ("stiffness", self.stiffness),
            ("normal_stress_coef", self.normal_stress_coef),
            ("shear_stress_coef", self.shear_stress_coef),
            ("contact_stiffness", self.contact_stiffness),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SolverError::InvalidParameter { name, value });
            }
        }

        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(SolverError::InvalidParameter {
                name: "smoothing",
                value: self.smoothing,
            });
        }

        if !self.gravity.is_finite() {
            return Err(SolverError::InvalidParameter {
                name: "gravity",
                value: self.gravity.length(),
            });
        }

        Ok(())
    }
}
