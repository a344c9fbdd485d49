//! Vector helpers that stay well defined when the input is degenerate.

use crate::scalar::Scalar;
use crate::{vector, Vector};

/// Returns the normalized vector, or a zero vector if `v` is too short to have
/// a meaningful direction.
#[inline]
pub fn normalized<S: Scalar>(v: Vector<S>) -> Vector<S> {
    let length = v.length();
    if !(length > S::EPSILON) {
        return vector(S::ZERO, S::ZERO);
    }

    v / length
}

/// Rotates a vector by 90 degrees counter-clockwise (in a y-up coordinate system).
#[inline]
pub fn perpendicular<S: Scalar>(v: Vector<S>) -> Vector<S> {
    vector(-v.y, v.x)
}

/// Unsigned angle between two vectors in radians, in the range `[0, π]`.
///
/// Returns zero if either vector is zero.
#[inline]
pub fn angle_between<S: Scalar>(a: Vector<S>, b: Vector<S>) -> S {
    a.cross(b).atan2(a.dot(b)).abs()
}

/// Returns `-1` if turning from `a` to `b` is clockwise (in a y-up coordinate
/// system), `1` otherwise, including when the vectors are collinear.
#[inline]
pub fn turn_sign<S: Scalar>(a: Vector<S>, b: Vector<S>) -> S {
    if normalized(a).cross(normalized(b)) < S::ZERO {
        -S::ONE
    } else {
        S::ONE
    }
}

#[test]
fn normalize_degenerate() {
    let v: Vector<f32> = normalized(vector(0.0, 0.0));
    assert_eq!(v, vector(0.0, 0.0));

    let v: Vector<f32> = normalized(vector(3.0, 4.0));
    assert!((v.length() - 1.0).abs() < 1e-6);
    assert!((v.x - 0.6).abs() < 1e-6);
}

#[test]
fn angles() {
    use core::f32::consts::{FRAC_PI_2, PI};

    let right: Vector<f32> = vector(1.0, 0.0);
    let up: Vector<f32> = vector(0.0, 1.0);
    let left: Vector<f32> = vector(-1.0, 0.0);

    assert!((angle_between(right, up) - FRAC_PI_2).abs() < 1e-6);
    assert!((angle_between(up, right) - FRAC_PI_2).abs() < 1e-6);
    assert!((angle_between(right, left) - PI).abs() < 1e-6);
    assert_eq!(angle_between(right, right), 0.0);
    assert_eq!(angle_between(right, vector(0.0, 0.0)), 0.0);

    assert_eq!(turn_sign(right, up), 1.0);
    assert_eq!(turn_sign(up, right), -1.0);
    assert_eq!(turn_sign(right, right), 1.0);
}
