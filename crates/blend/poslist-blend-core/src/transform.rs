//! Position matrices derived from a blend result.

use poslist_api_core::{Matrix4, Vec3};

/// Affine matrix that translates by `v`: identity basis rows, `(v.x, v.y, v.z, 1)` in row 3.
#[inline]
pub fn build_position_matrix(v: Vec3) -> Matrix4 {
    Matrix4::from_translation(v)
}

/// Inverse of a matrix produced by [`build_position_matrix`].
///
/// Translation-only matrices invert exactly by negating the translation row, so this never
/// touches the general elimination path and cannot fail. Only the translation row of `m` is
/// read.
#[inline]
pub fn invert_position_matrix(m: &Matrix4) -> Matrix4 {
    Matrix4::from_translation(-m.translation())
}
