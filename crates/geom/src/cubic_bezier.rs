use crate::scalar::Scalar;
use crate::utils::normalized;
use crate::{LineSegment, Point};

#[cfg(test)]
use std::vec::Vec;

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

/// Parameters of [`CubicBezierSegment::for_each_subdivided`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SubdivisionParameters<S> {
    /// Intervals whose endpoints are closer than this (squared) distance are not split.
    pub min_square_distance: S,

    /// An interval is split when the dot product of the normalized directions from its
    /// midpoint to its two endpoints is greater than this value.
    ///
    /// `-1.0` corresponds to a perfectly straight interval, so values close to `-1.0`
    /// split as soon as the curve bends slightly.
    pub division_threshold: S,

    /// Maximum recursion depth.
    pub max_depth: u32,
}

impl<S: Scalar> SubdivisionParameters<S> {
    pub const DEFAULT_MAX_DEPTH: u32 = 24;

    pub fn new(min_square_distance: S, division_threshold: S) -> Self {
        SubdivisionParameters {
            min_square_distance,
            division_threshold,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * S::THREE * one_t2 * t
            + self.ctrl2.to_vector() * S::THREE * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Returns a line segment connecting the start and end of this curve.
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Returns true if the curve can be approximated with a single line segment, given
    /// a tolerance threshold.
    ///
    /// When the endpoints coincide, the curve is linear only if its control points are
    /// within the tolerance of the endpoints.
    pub fn is_linear(&self, tolerance: S) -> bool {
        let baseline = self.to - self.from;
        let baseline_len2 = baseline.square_length();
        let threshold = tolerance * tolerance;

        if !(baseline_len2 > S::EPSILON * S::EPSILON) {
            return (self.ctrl1 - self.from).square_length() <= threshold
                && (self.ctrl2 - self.from).square_length() <= threshold;
        }

        let v1 = self.ctrl1 - self.from;
        let v2 = self.ctrl2 - self.from;
        let c1 = baseline.cross(v1);
        let c2 = baseline.cross(v2);
        let inv_baseline_len2 = S::ONE / baseline_len2;
        let d1 = (c1 * c1) * inv_baseline_len2;
        let d2 = (c2 * c2) * inv_baseline_len2;

        // Tighter bound when both control points are on the same side of the baseline.
        let factor = if (c1 * c2) > S::ZERO {
            S::THREE / S::FOUR
        } else {
            S::FOUR / S::NINE
        };

        let f2 = factor * factor;

        d1 * f2 <= threshold && d2 * f2 <= threshold
    }

    /// Evaluates the curve at `num_steps` evenly spaced parameter values in `]0, 1]`
    /// and invokes the callback for each of them, in order.
    ///
    /// The start of the curve is not reported. The last point is exactly `to`.
    pub fn for_each_uniform_sample<F>(&self, num_steps: u32, callback: &mut F)
    where
        F: FnMut(Point<S>),
    {
        let num_steps = num_steps.max(1);
        let step = S::ONE / S::value(num_steps as f32);
        for i in 1..num_steps {
            callback(self.sample(step * S::value(i as f32)));
        }

        callback(self.to);
    }

    /// Approximates the curve by recursive bisection and invokes the callback with the
    /// retained points, in order.
    ///
    /// An interval `[t0, t1]` is split at its middle unless its endpoints are closer than
    /// `min_square_distance` or the curve is nearly straight over it (see
    /// [`SubdivisionParameters::division_threshold`]). The first split is always made unless
    /// the control polygon itself is flat, because a curve can pass through the middle of its
    /// baseline while still bending on both sides of it.
    ///
    /// The start of the curve is not reported. The last point is exactly `to`.
    pub fn for_each_subdivided<F>(&self, parameters: &SubdivisionParameters<S>, callback: &mut F)
    where
        F: FnMut(Point<S>),
    {
        let force_split = !self.is_linear(parameters.min_square_distance.sqrt());
        self.subdivide(S::ZERO, S::ONE, parameters, force_split, 0, callback);
        callback(self.to);
    }

    fn subdivide<F>(
        &self,
        t0: S,
        t1: S,
        parameters: &SubdivisionParameters<S>,
        force_split: bool,
        depth: u32,
        callback: &mut F,
    ) where
        F: FnMut(Point<S>),
    {
        if depth >= parameters.max_depth {
            return;
        }

        let left = self.sample(t0);
        let right = self.sample(t1);
        if !((left - right).square_length() >= parameters.min_square_distance) {
            return;
        }

        let t_mid = (t0 + t1) * S::HALF;
        let mid = self.sample(t_mid);

        let left_direction = normalized(left - mid);
        let right_direction = normalized(right - mid);
        let bends = left_direction.dot(right_direction) > parameters.division_threshold;

        if !(force_split || bends) {
            return;
        }

        self.subdivide(t0, t_mid, parameters, false, depth + 1, callback);
        callback(mid);
        self.subdivide(t_mid, t1, parameters, false, depth + 1, callback);
    }

    #[inline]
    pub fn to_f32(&self) -> CubicBezierSegment<f32> {
        CubicBezierSegment {
            from: self.from.to_f32(),
            ctrl1: self.ctrl1.to_f32(),
            ctrl2: self.ctrl2.to_f32(),
            to: self.to.to_f32(),
        }
    }

    #[inline]
    pub fn to_f64(&self) -> CubicBezierSegment<f64> {
        CubicBezierSegment {
            from: self.from.to_f64(),
            ctrl1: self.ctrl1.to_f64(),
            ctrl2: self.ctrl2.to_f64(),
            to: self.to.to_f64(),
        }
    }
}

#[cfg(test)]
use crate::point;

#[cfg(test)]
fn parameters() -> SubdivisionParameters<f32> {
    SubdivisionParameters::new(0.01, -0.99)
}

#[cfg(test)]
fn subdivided(curve: &CubicBezierSegment<f32>) -> Vec<Point<f32>> {
    let mut points = Vec::new();
    points.push(curve.from);
    curve.for_each_subdivided(&parameters(), &mut |p| points.push(p));
    points
}

#[test]
fn sample_endpoints() {
    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 2.0),
        ctrl2: point(3.0, 2.0),
        to: point(4.0, 0.0),
    };

    assert_eq!(curve.sample(0.0), curve.from);
    assert_eq!(curve.sample(1.0), curve.to);
    let mid = curve.sample(0.5);
    assert!((mid.x - 2.0).abs() < 1e-5);
    assert!((mid.y - 1.5).abs() < 1e-5);
}

#[test]
fn uniform_samples() {
    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(0.0, 10.0),
        ctrl2: point(10.0, 10.0),
        to: point(10.0, 0.0),
    };

    let mut points = Vec::new();
    curve.for_each_uniform_sample(10, &mut |p| points.push(p));

    assert_eq!(points.len(), 10);
    assert_eq!(points[9], curve.to);
    assert_eq!(points[4], curve.sample(0.5));

    let mut points = Vec::new();
    curve.for_each_uniform_sample(0, &mut |p| points.push(p));
    assert_eq!(points, std::vec![curve.to]);
}

#[test]
fn subdivide_straight_curve() {
    // Control points evenly spread on a line: nothing to refine.
    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 0.0),
        ctrl2: point(2.0, 0.0),
        to: point(3.0, 0.0),
    };

    assert!(curve.is_linear(0.1));
    assert_eq!(subdivided(&curve), std::vec![curve.from, curve.to]);
}

#[test]
fn subdivide_arch() {
    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(0.0, 10.0),
        ctrl2: point(10.0, 10.0),
        to: point(10.0, 0.0),
    };

    let points = subdivided(&curve);
    assert!(points.len() > 4);
    assert_eq!(points[0], curve.from);
    assert_eq!(*points.last().unwrap(), curve.to);

    // The retained points are on the curve and sorted along it.
    for pair in points.windows(2) {
        assert!(pair[0].x <= pair[1].x);
    }
    assert!(points.iter().any(|p| *p == curve.sample(0.5)));
}

#[test]
fn subdivide_s_curve() {
    // The midpoint is on the baseline, but the curve is not straight.
    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(3.0, 10.0),
        ctrl2: point(7.0, -10.0),
        to: point(10.0, 0.0),
    };

    assert!(!curve.is_linear(0.1));
    assert!(subdivided(&curve).len() > 3);
}

#[test]
fn subdivide_degenerate_curves() {
    let point_curve = CubicBezierSegment {
        from: point(5.0f32, 5.0),
        ctrl1: point(5.0, 5.0),
        ctrl2: point(5.0, 5.0),
        to: point(5.0, 5.0),
    };
    assert_eq!(subdivided(&point_curve).len(), 2);

    let nan = f32::NAN;
    let nan_curve = CubicBezierSegment {
        from: point(nan, 0.0),
        ctrl1: point(1.0, nan),
        ctrl2: point(2.0, 0.0),
        to: point(3.0, 0.0),
    };
    // Terminates without refining.
    assert_eq!(subdivided(&nan_curve).len(), 2);
}

#[test]
fn subdivision_depth_is_bounded() {
    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(0.0, 1.0e6),
        ctrl2: point(1.0e6, 1.0e6),
        to: point(1.0e6, 0.0),
    };

    let mut params = parameters();
    params.max_depth = 3;
    let mut count = 0;
    curve.for_each_subdivided(&params, &mut |_| count += 1);
    // At most 2^3 - 1 midpoints plus the end point.
    assert!(count <= 8);
}
