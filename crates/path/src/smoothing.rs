//! Bézier smoothing of point arrays.
//!
//! A point array can be replaced with a denser array approximating a cubic bézier spline
//! before it is stroked. See [`Smoothing`] for the available strategies.

use crate::geom::utils::normalized;
use crate::geom::{CubicBezierSegment, SubdivisionParameters};
use crate::math::Point;

use std::borrow::Cow;

/// The strategy used to turn a point array into a curve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Smoothing {
    /// Points are stroked as they are.
    None,
    /// Points are used as bézier control points: points 0 to 3 form the first curve,
    /// points 3 to 6 the second one, etc. Each curve is sampled with a fixed number of
    /// steps.
    FixedBasic,
    /// Control points are computed so that the curve passes through every point with
    /// continuous tangents. Each curve is sampled with a fixed number of steps.
    FixedImproved,
    /// Points are used as bézier control points and each curve is recursively subdivided
    /// where it bends.
    AdaptiveRecursive,
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::None
    }
}

/// Parameters of the curve smoother.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct SmoothingOptions {
    /// Default value: `Smoothing::None`.
    pub mode: Smoothing,

    /// Number of samples per curve, for the fixed strategies.
    ///
    /// Must be greater than zero.
    /// Default value: `SmoothingOptions::DEFAULT_SEGMENTS_PER_CURVE`.
    pub segments_per_curve: u32,

    /// Intervals shorter than this squared distance are not subdivided further by the
    /// adaptive strategy.
    ///
    /// Default value: `SmoothingOptions::DEFAULT_MIN_SQUARE_DISTANCE`.
    pub min_square_distance: f32,

    /// The adaptive strategy subdivides an interval when the dot product of the directions
    /// from its midpoint to its endpoints is above this value.
    ///
    /// The default corresponds to a bend of about 8 degrees.
    /// Default value: `SmoothingOptions::DEFAULT_DIVISION_THRESHOLD`.
    pub division_threshold: f32,

    /// Length of the tangents relative to the neighbouring chords, for
    /// `Smoothing::FixedImproved`.
    ///
    /// Default value: `SmoothingOptions::DEFAULT_TANGENT_SCALE`.
    pub tangent_scale: f32,
}

impl SmoothingOptions {
    pub const DEFAULT_SEGMENTS_PER_CURVE: u32 = 10;
    pub const DEFAULT_MIN_SQUARE_DISTANCE: f32 = 0.01;
    pub const DEFAULT_DIVISION_THRESHOLD: f32 = -0.99;
    pub const DEFAULT_TANGENT_SCALE: f32 = 0.5;

    pub const DEFAULT: Self = SmoothingOptions {
        mode: Smoothing::None,
        segments_per_curve: Self::DEFAULT_SEGMENTS_PER_CURVE,
        min_square_distance: Self::DEFAULT_MIN_SQUARE_DISTANCE,
        division_threshold: Self::DEFAULT_DIVISION_THRESHOLD,
        tangent_scale: Self::DEFAULT_TANGENT_SCALE,
    };

    #[inline]
    pub fn mode(mode: Smoothing) -> Self {
        Self::DEFAULT.with_mode(mode)
    }

    #[inline]
    pub const fn with_mode(mut self, mode: Smoothing) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn with_segments_per_curve(mut self, segments: u32) -> Self {
        assert!(segments > 0);
        self.segments_per_curve = segments;
        self
    }

    #[inline]
    pub const fn with_min_square_distance(mut self, distance: f32) -> Self {
        self.min_square_distance = distance;
        self
    }

    #[inline]
    pub const fn with_division_threshold(mut self, threshold: f32) -> Self {
        self.division_threshold = threshold;
        self
    }

    #[inline]
    pub const fn with_tangent_scale(mut self, scale: f32) -> Self {
        self.tangent_scale = scale;
        self
    }

    pub fn subdivision_parameters(&self) -> SubdivisionParameters<f32> {
        SubdivisionParameters::new(self.min_square_distance, self.division_threshold)
    }
}

impl Default for SmoothingOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A sequence of cubic bézier curves sharing their endpoints.
///
/// Control points `3k` to `3k + 3` define the curve `k`. Trailing control points that
/// do not complete a curve are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BezierPath {
    control_points: Vec<Point>,
}

impl BezierPath {
    pub fn new() -> Self {
        BezierPath {
            control_points: Vec::new(),
        }
    }

    /// Uses the provided points directly as control points.
    pub fn from_control_points(points: &[Point]) -> Self {
        BezierPath {
            control_points: points.to_vec(),
        }
    }

    /// Computes control points for a spline passing through all of the provided points.
    ///
    /// The tangent at an interior point is parallel to the line joining its neighbours,
    /// and its length on each side is `scale` times the distance to the corresponding
    /// neighbour. At the ends the tangent follows the adjacent chord.
    ///
    /// Produces `3n - 2` control points for `n >= 2` input points, and an empty path
    /// otherwise.
    pub fn interpolate(points: &[Point], scale: f32) -> Self {
        let n = points.len();
        if n < 2 {
            return BezierPath::new();
        }

        let mut control_points = Vec::with_capacity(3 * n - 2);

        let first = points[0];
        control_points.push(first);
        control_points.push(first + (points[1] - first) * scale);

        for window in points.windows(3) {
            let (prev, current, next) = (window[0], window[1], window[2]);
            let tangent = normalized(next - prev);
            control_points.push(current - tangent * scale * (current - prev).length());
            control_points.push(current);
            control_points.push(current + tangent * scale * (next - current).length());
        }

        let last = points[n - 1];
        control_points.push(last - (last - points[n - 2]) * scale);
        control_points.push(last);

        BezierPath { control_points }
    }

    #[inline]
    pub fn control_points(&self) -> &[Point] {
        &self.control_points
    }

    /// Number of complete curves in the path.
    #[inline]
    pub fn curve_count(&self) -> usize {
        self.control_points.len().saturating_sub(1) / 3
    }

    /// Returns the curve at `index`, if any.
    pub fn curve(&self, index: usize) -> Option<CubicBezierSegment<f32>> {
        if index >= self.curve_count() {
            return None;
        }

        let ctrl = &self.control_points[index * 3..index * 3 + 4];
        Some(CubicBezierSegment {
            from: ctrl[0],
            ctrl1: ctrl[1],
            ctrl2: ctrl[2],
            to: ctrl[3],
        })
    }

    /// Iterates over the curves of the path.
    pub fn curves(&self) -> impl Iterator<Item = CubicBezierSegment<f32>> + '_ {
        self.control_points
            .windows(4)
            .step_by(3)
            .map(|ctrl| CubicBezierSegment {
                from: ctrl[0],
                ctrl1: ctrl[1],
                ctrl2: ctrl[2],
                to: ctrl[3],
            })
    }

    /// Evaluates the curve at `index` for the parameter `t`.
    pub fn sample(&self, index: usize, t: f32) -> Option<Point> {
        self.curve(index).map(|curve| curve.sample(t))
    }

    /// Appends `segments_per_curve` evenly spaced samples of each curve to `output`,
    /// preceded by the start of the path.
    pub fn sample_uniform(&self, segments_per_curve: u32, output: &mut Vec<Point>) {
        if let Some(first) = self.curve(0) {
            output.push(first.from);
        }

        for curve in self.curves() {
            curve.for_each_uniform_sample(segments_per_curve, &mut |p| output.push(p));
        }
    }

    /// Appends an adaptive approximation of each curve to `output`, preceded by the start
    /// of the path.
    pub fn sample_adaptive(
        &self,
        parameters: &SubdivisionParameters<f32>,
        output: &mut Vec<Point>,
    ) {
        if let Some(first) = self.curve(0) {
            output.push(first.from);
        }

        for curve in self.curves() {
            curve.for_each_subdivided(parameters, &mut |p| output.push(p));
        }
    }
}

/// Applies the smoothing strategy to a point array.
///
/// Arrays of three points or less are returned as is, as well as every array when the
/// mode is `Smoothing::None`.
pub fn smooth<'l>(points: &'l [Point], options: &SmoothingOptions) -> Cow<'l, [Point]> {
    if points.len() <= 3 {
        return Cow::Borrowed(points);
    }

    let mut output = Vec::new();
    match options.mode {
        Smoothing::None => return Cow::Borrowed(points),
        Smoothing::FixedBasic => {
            BezierPath::from_control_points(points)
                .sample_uniform(options.segments_per_curve, &mut output);
        }
        Smoothing::FixedImproved => {
            BezierPath::interpolate(points, options.tangent_scale)
                .sample_uniform(options.segments_per_curve, &mut output);
        }
        Smoothing::AdaptiveRecursive => {
            BezierPath::from_control_points(points)
                .sample_adaptive(&options.subdivision_parameters(), &mut output);
        }
    }

    log::debug!(
        "{:?} smoothing: {} points -> {} points",
        options.mode,
        points.len(),
        output.len()
    );

    Cow::Owned(output)
}

#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn assert_approx_eq(a: Point, b: Point) {
    if (a - b).square_length() > 1e-8 {
        panic!("{:?} != {:?}", a, b);
    }
}

#[test]
fn short_arrays_are_not_smoothed() {
    let points = [point(0.0, 0.0), point(1.0, 1.0), point(2.0, 0.0)];
    let options = SmoothingOptions::mode(Smoothing::FixedImproved);
    assert!(matches!(smooth(&points, &options), Cow::Borrowed(_)));
    assert!(matches!(smooth(&points[..1], &options), Cow::Borrowed(_)));
    assert!(matches!(smooth(&[], &options), Cow::Borrowed(_)));

    let points = [point(0.0, 0.0), point(1.0, 1.0), point(2.0, 0.0), point(3.0, 1.0)];
    assert!(matches!(
        smooth(&points, &SmoothingOptions::DEFAULT),
        Cow::Borrowed(_)
    ));
}

#[test]
fn fixed_basic() {
    let points = [
        point(0.0, 0.0),
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(10.0, 0.0),
        // Does not complete a curve.
        point(20.0, 0.0),
    ];
    let options = SmoothingOptions::mode(Smoothing::FixedBasic);
    let smoothed = smooth(&points, &options);

    assert_eq!(smoothed.len(), 11);
    assert_eq!(smoothed[0], points[0]);
    assert_eq!(smoothed[10], points[3]);

    let options = options.with_segments_per_curve(4);
    assert_eq!(smooth(&points[..4], &options).len(), 5);
}

#[test]
fn fixed_improved_goes_through_the_points() {
    let points = [
        point(0.0, 0.0),
        point(10.0, 10.0),
        point(20.0, 0.0),
        point(30.0, 10.0),
    ];
    let options = SmoothingOptions::mode(Smoothing::FixedImproved);
    let smoothed = smooth(&points, &options);

    assert_eq!(smoothed.len(), 31);
    assert_eq!(smoothed[0], points[0]);
    assert_eq!(smoothed[10], points[1]);
    assert_eq!(smoothed[20], points[2]);
    assert_eq!(smoothed[30], points[3]);
}

#[test]
fn adaptive_collinear_points() {
    let points = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(2.0, 0.0),
        point(3.0, 0.0),
    ];
    let options = SmoothingOptions::mode(Smoothing::AdaptiveRecursive);

    assert_eq!(
        smooth(&points, &options).into_owned(),
        vec![point(0.0, 0.0), point(3.0, 0.0)]
    );
}

#[test]
fn adaptive_curve() {
    let points = [
        point(0.0, 0.0),
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(10.0, 0.0),
        point(10.0, -10.0),
        point(20.0, -10.0),
        point(20.0, 0.0),
    ];
    let options = SmoothingOptions::mode(Smoothing::AdaptiveRecursive);
    let smoothed = smooth(&points, &options);

    assert!(smoothed.len() > 7);
    assert_eq!(smoothed[0], points[0]);
    assert_eq!(*smoothed.last().unwrap(), points[6]);
    // The junction between the two curves is present exactly once.
    assert_eq!(smoothed.iter().filter(|p| **p == points[3]).count(), 1);
}

#[test]
fn interpolated_control_points() {
    let points = [point(0.0, 0.0), point(10.0, 0.0), point(20.0, 10.0)];
    let path = BezierPath::interpolate(&points, 0.5);
    let ctrl = path.control_points();

    assert_eq!(ctrl.len(), 7);
    assert_eq!(path.curve_count(), 2);
    assert_eq!(ctrl[0], points[0]);
    assert_eq!(ctrl[1], point(5.0, 0.0));
    assert_eq!(ctrl[3], points[1]);
    assert_eq!(ctrl[5], point(15.0, 5.0));
    assert_eq!(ctrl[6], points[2]);

    // The tangent at the interior point is parallel to (20, 10).
    let t = (ctrl[4] - ctrl[2]).normalize();
    assert_approx_eq(point(t.x, t.y), point(2.0 / 5.0f32.sqrt(), 1.0 / 5.0f32.sqrt()));
    assert!(((ctrl[3] - ctrl[2]).length() - 5.0).abs() < 1e-4);

    assert!(BezierPath::interpolate(&points[..1], 0.5).control_points().is_empty());
    assert_eq!(BezierPath::interpolate(&points[..2], 0.5).curve_count(), 1);
}

#[test]
fn curves() {
    let points: Vec<Point> = (0..8).map(|i| point(i as f32, 0.0)).collect();
    let path = BezierPath::from_control_points(&points);

    assert_eq!(path.curve_count(), 2);
    assert_eq!(path.curves().count(), 2);
    assert_eq!(path.curve(1).map(|c| c.to), Some(point(6.0, 0.0)));
    assert_eq!(path.curve(2), None);
    assert_eq!(path.sample(0, 1.0), Some(point(3.0, 0.0)));
    assert_eq!(BezierPath::new().curve_count(), 0);
}
