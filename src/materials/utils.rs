//! Helper functions for materials
//!
//! Guarded arithmetic and value checks used by the solver passes.

use crate::math::{Matrix, Real, matrix_trace};

/// Exact zero check inverse (prevents NaN from division by zero)
#[inline(always)]
pub fn inv_exact(e: Real) -> Real {
    if e == 0.0 { 0.0 } else { 1.0 / e }
}

/// Mean normal stress; equals `-p` for a purely hydrostatic state
#[inline]
pub fn mean_normal_stress(stress: &Matrix) -> Real {
    matrix_trace(stress) / 3.0
}

/// Check if particle state makes sense
pub mod check {
    use crate::math::{Matrix, Real, Vector, matrix_is_finite};

    #[inline]
    pub fn density_ok(density: Real) -> bool {
        density >= 0.0 && density.is_finite()
    }

    #[inline]
    pub fn vector_ok(v: Vector) -> bool {
        v.is_finite()
    }

    #[inline]
    pub fn stress_ok(stress: &Matrix) -> bool {
        matrix_is_finite(stress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::identity_matrix;

    #[test]
    fn inv_exact_guards_zero() {
        assert_eq!(inv_exact(0.0), 0.0);
        assert_eq!(inv_exact(4.0), 0.25);
    }

    #[test]
    fn mean_normal_stress_recovers_pressure() {
        assert_eq!(mean_normal_stress(&(identity_matrix() * -2.5)), -2.5);
    }

    #[test]
    fn checks_reject_non_finite() {
        assert!(!check::density_ok(Real::NAN));
        assert!(!check::density_ok(-1.0));
        assert!(check::density_ok(0.0));
        assert!(!check::vector_ok(crate::math::Vector::new(0.0, Real::INFINITY, 0.0)));
    }
}
