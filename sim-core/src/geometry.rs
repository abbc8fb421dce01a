//! Small 2-D helpers on top of [`glam::Vec2`].
//!
//! `glam` already provides the arithmetic, `length` (norm) and `dot`;
//! these cover the cases the substrate needs on top of that.

use glam::Vec2;

/// Returns `(norm, unit)` for `v`. A zero-length vector gets a zero unit.
#[inline]
pub fn norm_and_unit(v: Vec2) -> (f32, Vec2) {
    (v.length(), v.normalize_or_zero())
}

/// Direction of a new branch: `unit` rotated by 90° counter-clockwise,
/// flipped when `side` is negative.
#[inline]
pub fn branch_direction(unit: Vec2, side: f32) -> Vec2 {
    unit.perp() * side.signum()
}

/// Wraps an x coordinate into `[0, width)`.
///
/// Uses Euclidean remainder so coordinates left of zero re-enter from the
/// right edge.
#[inline]
pub fn wrap_x(x: f32, width: f32) -> f32 {
    let wrapped = x.rem_euclid(width);
    // rem_euclid can round up to exactly `width` for tiny negative inputs.
    if wrapped >= width { 0.0 } else { wrapped }
}
