//! Row-major 4x4 affine matrices.
//!
//! Points are row vectors multiplied on the left (`p' = p * M`), so the translation lives in
//! row 3 and the homogeneous `1` sits in the bottom-right corner.

use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

use crate::Vec3;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix4(pub [[f64; 4]; 4]);

impl Default for Matrix4 {
    fn default() -> Self {
        Matrix4::IDENTITY
    }
}

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Matrix4(rows)
    }

    /// Pure translation: identity basis with `t` in the translation row.
    pub fn from_translation(t: Vec3) -> Self {
        Matrix4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [t.x, t.y, t.z, 1.0],
        ])
    }

    #[inline]
    pub fn row(&self, i: usize) -> [f64; 4] {
        self.0[i]
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.0[3][0], self.0[3][1], self.0[3][2])
    }

    /// True when the upper 3x4 block is the identity basis and the corner is `1`.
    pub fn is_pure_translation(&self) -> bool {
        for r in 0..3 {
            for c in 0..4 {
                let expected = if r == c { 1.0 } else { 0.0 };
                if self.0[r][c] != expected {
                    return false;
                }
            }
        }
        self.0[3][3] == 1.0
    }

    /// Inverse of the matrix, or `None` when it is singular.
    ///
    /// Pure translations take the closed form (negated translation row), which is exact.
    /// Everything else is delegated to nalgebra.
    pub fn inverse(&self) -> Option<Matrix4> {
        if self.is_pure_translation() {
            return Some(Matrix4::from_translation(-self.translation()));
        }
        let inv = na::Matrix4::from_fn(|r, c| self.0[r][c]).try_inverse()?;
        Some(Matrix4(std::array::from_fn(|r| {
            std::array::from_fn(|c| inv[(r, c)])
        })))
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let mut out = [[0.0f64; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, slot) in row.iter_mut().enumerate() {
                *slot = (0..4).map(|k| self.0[r][k] * rhs.0[k][c]).sum();
            }
        }
        Matrix4(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: &Matrix4, b: &Matrix4) -> bool {
        a.0.iter()
            .flatten()
            .zip(b.0.iter().flatten())
            .all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn translation_layout_is_row_major() {
        let m = Matrix4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.row(0), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(m.row(1), [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(m.row(2), [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(m.row(3), [1.0, 2.0, 3.0, 1.0]);
        assert!(m.is_pure_translation());
    }

    #[test]
    fn translation_inverse_uses_closed_form() {
        let m = Matrix4::from_translation(Vec3::new(0.1, -7.25, 1e9));
        let inv = m.inverse().expect("translation is invertible");
        assert_eq!(inv.row(3), [-0.1, 7.25, -1e9, 1.0]);
        assert_eq!(m * inv, Matrix4::IDENTITY);
    }

    #[test]
    fn general_inverse_of_scaled_matrix() {
        let m = Matrix4::from_rows([
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 4.0, 0.0, 0.0],
            [0.0, 1.0, 0.5, 0.0],
            [3.0, -1.0, 2.0, 1.0],
        ]);
        assert!(!m.is_pure_translation());
        let inv = m.inverse().expect("non-singular");
        assert!(approx_eq(&(m * inv), &Matrix4::IDENTITY));
        assert!(approx_eq(&(inv * m), &Matrix4::IDENTITY));
    }

    #[test]
    fn tiny_scale_matrix_is_still_invertible() {
        let m = Matrix4::from_rows([
            [1e-13, 0.0, 0.0, 0.0],
            [0.0, 1e-13, 0.0, 0.0],
            [0.0, 0.0, 1e-13, 0.0],
            [1.0, 2.0, 3.0, 1.0],
        ]);
        let inv = m.inverse().expect("uniform scale is invertible");
        assert!((inv.row(0)[0] / 1e13 - 1.0).abs() < 1e-9);
        assert!((inv.row(3)[1] / -2e13 - 1.0).abs() < 1e-9);
        assert!(approx_eq(&(inv * m), &Matrix4::IDENTITY));
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let mut rows = Matrix4::IDENTITY.0;
        rows[1] = [0.0; 4];
        assert!(Matrix4::from_rows(rows).inverse().is_none());
    }
}
