//! Fluid constitutive model
//!
//! Pressure from density, viscous stress from strain rate.

use crate::config::FluidParams;
use crate::math::{DIM, Matrix, Real, entry, identity_matrix};

/// Cubic equation of state:
/// `p = (k * rho0 / 3) * ((rho / rho0)^3 - 1)`.
///
/// Zero at rest density, positive under compression, and stiffer than a
/// linear law at high compression ratios.
#[inline]
pub fn pressure(density: Real, rest_density: Real, stiffness: Real) -> Real {
    let ratio = density / rest_density;
    (stiffness * rest_density / 3.0) * (ratio * ratio * ratio - 1.0)
}

/// Viscous stress: diagonal strain rates scaled by `normal_coef`,
/// off-diagonal by `shear_coef`.
#[inline]
pub fn viscous_stress(strain_rate: &Matrix, normal_coef: Real, shear_coef: Real) -> Matrix {
    let mut cols = [[0.0; DIM]; DIM];
    for (j, col) in cols.iter_mut().enumerate() {
        for (i, value) in col.iter_mut().enumerate() {
            let coef = if i == j { normal_coef } else { shear_coef };
            *value = coef * entry(strain_rate, i, j);
        }
    }
    Matrix::from_cols_array_2d(&cols)
}

/// Cauchy stress `-p I + viscous`.
#[inline]
pub fn cauchy_stress(density: Real, strain_rate: &Matrix, params: &FluidParams) -> Matrix {
    let p = pressure(density, params.rest_density, params.stiffness);
    identity_matrix() * -p
        + viscous_stress(
            strain_rate,
            params.normal_stress_coef,
            params.shear_stress_coef,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{matrix_is_symmetric, outer_product, symmetric_part};
    use bevy::math::Vec3;

    #[test]
    fn pressure_is_zero_at_rest_density() {
        for (rest_density, stiffness) in [(1.0, 10.0), (1000.0, 2.2e4), (0.37, 1e-3), (5.0, 0.0)] {
            let p = pressure(rest_density, rest_density, stiffness);
            assert_eq!(p, 0.0, "rho0={rest_density} k={stiffness} gave {p}");
        }
    }

    #[test]
    fn pressure_sign_follows_compression() {
        assert!(pressure(1.1, 1.0, 10.0) > 0.0);
        assert!(pressure(0.9, 1.0, 10.0) < 0.0);
    }

    #[test]
    fn pressure_grows_cubically() {
        // (2^3 - 1) * k * rho0 / 3
        let p = pressure(2.0, 1.0, 3.0);
        assert!((p - 7.0).abs() < 1e-5, "got {p}");
    }

    #[test]
    fn viscous_stress_scales_diagonal_and_off_diagonal_separately() {
        let d = symmetric_part(&outer_product(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.5, 2.0)));
        let s = viscous_stress(&d, 2.0, 0.5);
        assert!(matrix_is_symmetric(&s, 1e-6));
        assert_eq!(entry(&s, 0, 0), 2.0 * entry(&d, 0, 0));
        assert_eq!(entry(&s, 2, 2), 2.0 * entry(&d, 2, 2));
        assert_eq!(entry(&s, 0, 1), 0.5 * entry(&d, 0, 1));
        assert_eq!(entry(&s, 2, 1), 0.5 * entry(&d, 2, 1));
    }

    #[test]
    fn compressed_fluid_has_negative_diagonal_stress() {
        let params = FluidParams::default();
        let stress = cauchy_stress(1.5 * params.rest_density, &Matrix::ZERO, &params);
        for i in 0..DIM {
            assert!(entry(&stress, i, i) < 0.0);
        }
    }
}
