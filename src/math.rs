use bevy::math::{Mat3, Vec3};

pub type Real = f32;
pub const DIM: usize = 3;

pub type Vector = Vec3;
pub type Matrix = Mat3;

#[inline(always)]
pub fn zero_matrix() -> Matrix {
    Mat3::ZERO
}

#[inline(always)]
pub fn identity_matrix() -> Matrix {
    Mat3::IDENTITY
}

#[inline(always)]
pub fn matrix_trace(m: &Matrix) -> Real {
    m.x_axis.x + m.y_axis.y + m.z_axis.z
}

/// `a ⊗ b`, i.e. the matrix with entries `a_i * b_j`.
#[inline(always)]
pub fn outer_product(a: Vector, b: Vector) -> Matrix {
    // glam matrices are column-major: column j is `a * b_j`.
    Mat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// Row `i`, column `j` entry.
#[inline(always)]
pub fn entry(m: &Matrix, i: usize, j: usize) -> Real {
    m.col(j)[i]
}

/// Symmetric part `(m + mᵀ) / 2`.
#[inline(always)]
pub fn symmetric_part(m: &Matrix) -> Matrix {
    (*m + m.transpose()) * 0.5
}

#[inline(always)]
pub fn matrix_is_finite(m: &Matrix) -> bool {
    m.x_axis.is_finite() && m.y_axis.is_finite() && m.z_axis.is_finite()
}

#[inline(always)]
pub fn matrix_is_symmetric(m: &Matrix, tolerance: Real) -> bool {
    (0..DIM).all(|i| (0..DIM).all(|j| (entry(m, i, j) - entry(m, j, i)).abs() <= tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_product_places_entries_row_major() {
        let m = outer_product(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(entry(&m, 0, 1), 5.0);
        assert_eq!(entry(&m, 1, 0), 8.0);
        assert_eq!(entry(&m, 2, 2), 18.0);
    }

    #[test]
    fn symmetric_part_is_symmetric() {
        let m = outer_product(Vec3::new(1.0, -2.0, 0.5), Vec3::new(3.0, 0.0, 7.0));
        let s = symmetric_part(&m);
        assert!(matrix_is_symmetric(&s, 0.0));
        assert_eq!(matrix_trace(&s), matrix_trace(&m));
    }
}
