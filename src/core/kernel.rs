//! Quadratic B-spline interpolation kernel.
//!
//! Offsets are `cell_center - particle_position`, scaled per axis by the
//! inverse cell spacing before evaluation. Support is 1.5 cells on each axis,
//! which the 3x3x3 stencil around the containing cell covers.

use crate::math::{Real, Vector};

/// Half-width of the 1D kernel support in cells
pub const BSPLINE_SUPPORT_RADIUS: Real = 1.5;

/// 1D quadratic B-spline weight of a normalized offset.
#[inline(always)]
pub fn quadratic_bspline_1d(r: Real) -> Real {
    let r_abs = r.abs();
    if r_abs < 0.5 {
        0.75 - r_abs * r_abs
    } else if r_abs < BSPLINE_SUPPORT_RADIUS {
        let t = BSPLINE_SUPPORT_RADIUS - r_abs;
        0.5 * t * t
    } else {
        0.0
    }
}

/// Derivative of [`quadratic_bspline_1d`] with respect to its argument.
#[inline(always)]
pub fn quadratic_bspline_1d_derivative(r: Real) -> Real {
    let r_abs = r.abs();
    if r_abs < 0.5 {
        -2.0 * r
    } else if r_abs < BSPLINE_SUPPORT_RADIUS {
        -(BSPLINE_SUPPORT_RADIUS - r_abs) * r.signum()
    } else {
        0.0
    }
}

/// Tensor-product kernel weight.
#[inline(always)]
pub fn weight(offset: Vector, inv_spacing: Vector) -> Real {
    let r = offset * inv_spacing;
    quadratic_bspline_1d(r.x) * quadratic_bspline_1d(r.y) * quadratic_bspline_1d(r.z)
}

/// Gradient of [`weight`] with respect to the particle position.
///
/// Since the offset is `cell_center - particle_position`, this is the
/// negated gradient with respect to the offset. Summing
/// `v_cell ⊗ weight_gradient` over a stencil therefore yields the velocity
/// gradient at the particle.
#[inline(always)]
pub fn weight_gradient(offset: Vector, inv_spacing: Vector) -> Vector {
    let r = offset * inv_spacing;
    let n = Vector::new(
        quadratic_bspline_1d(r.x),
        quadratic_bspline_1d(r.y),
        quadratic_bspline_1d(r.z),
    );
    let dn = Vector::new(
        quadratic_bspline_1d_derivative(r.x),
        quadratic_bspline_1d_derivative(r.y),
        quadratic_bspline_1d_derivative(r.z),
    );
    -inv_spacing * Vector::new(dn.x * n.y * n.z, n.x * dn.y * n.z, n.x * n.y * dn.z)
}

/// Weight and gradient in one evaluation, for passes that need both.
#[inline(always)]
pub fn weight_and_gradient(offset: Vector, inv_spacing: Vector) -> (Real, Vector) {
    (weight(offset, inv_spacing), weight_gradient(offset, inv_spacing))
}
