//! The point sources of a stroke.
//!
//! A stroke is built from one or more independent arrays of points. [`PolylineInput`]
//! holds them and answers position queries for code that needs to hit-test along the
//! line (for example input handling in a UI).
//!
//! Queries use 1-based point indices.

use crate::geom::LineSegment;
use crate::math::Point;

use std::slice;
use thiserror::Error;

/// The points of a stroke.
///
/// Whether consecutive points form a continuous line or independent pairs is decided
/// by the tessellator's options, never by the input itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PolylineInput {
    /// A single array of points.
    Points(Vec<Point>),
    /// Several arrays of points, each one stroked independently.
    Segments(Vec<Vec<Point>>),
}

/// Error returned by the position queries of [`PolylineInput`].
#[non_exhaustive]
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("point indices start at 1")]
    ZeroIndex,
    #[error("point index {index} is out of range (the array has {len} points)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("segment {segment} is out of range (the input has {count} segments)")]
    SegmentOutOfRange { segment: usize, count: usize },
}

impl Default for PolylineInput {
    fn default() -> Self {
        PolylineInput::Points(Vec::new())
    }
}

impl From<Vec<Point>> for PolylineInput {
    fn from(points: Vec<Point>) -> Self {
        PolylineInput::Points(points)
    }
}

impl From<Vec<Vec<Point>>> for PolylineInput {
    fn from(segments: Vec<Vec<Point>>) -> Self {
        PolylineInput::Segments(segments)
    }
}

impl PolylineInput {
    /// Iterates over the independent point arrays of the input.
    pub fn point_arrays(&self) -> PointArrays {
        match self {
            PolylineInput::Points(points) => PointArrays::Single(Some(points.as_slice())),
            PolylineInput::Segments(segments) => PointArrays::Multiple(segments.iter()),
        }
    }

    /// Number of independent point arrays.
    pub fn segment_count(&self) -> usize {
        match self {
            PolylineInput::Points(_) => 1,
            PolylineInput::Segments(segments) => segments.len(),
        }
    }

    /// Total number of points across all arrays.
    pub fn point_count(&self) -> usize {
        self.point_arrays().map(|points| points.len()).sum()
    }

    /// Returns true if no array contains at least two points, in which case nothing
    /// can be stroked.
    pub fn is_empty(&self) -> bool {
        self.point_arrays().all(|points| points.len() < 2)
    }

    /// Returns the position of a point.
    ///
    /// `index` is 1-based. When `segment` (1-based as well) is provided, the point is
    /// read from that segment. Otherwise `index` counts points across all segments, in
    /// order.
    ///
    /// With [`PolylineInput::Points`] the only valid segment is `Some(1)`.
    pub fn position(&self, index: usize, segment: Option<usize>) -> Result<Point, QueryError> {
        if index == 0 {
            return Err(QueryError::ZeroIndex);
        }

        match (self, segment) {
            (_, Some(0)) => Err(QueryError::SegmentOutOfRange {
                segment: 0,
                count: self.segment_count(),
            }),
            (_, Some(segment)) => {
                self.position_in_segment(index, segment - 1)
                    .map_err(|e| match e {
                        QueryError::SegmentOutOfRange { count, .. } => {
                            QueryError::SegmentOutOfRange { segment, count }
                        }
                        e => e,
                    })
            }
            (PolylineInput::Points(points), None) => nth_point(points, index),
            (PolylineInput::Segments(segments), None) => {
                let mut remaining = index;
                for points in segments {
                    if remaining <= points.len() {
                        return nth_point(points, remaining);
                    }
                    remaining -= points.len();
                }

                Err(QueryError::IndexOutOfRange {
                    index,
                    len: self.point_count(),
                })
            }
        }
    }

    /// Returns the position of the point at the 1-based `index` within the 0-based
    /// `segment`.
    pub fn position_in_segment(&self, index: usize, segment: usize) -> Result<Point, QueryError> {
        if index == 0 {
            return Err(QueryError::ZeroIndex);
        }

        let points = match self.point_arrays().nth(segment) {
            Some(points) => points,
            None => {
                return Err(QueryError::SegmentOutOfRange {
                    segment,
                    count: self.segment_count(),
                })
            }
        };

        nth_point(points, index)
    }

    /// Returns the point of the segment `[start, end]` that is the closest to `probe`.
    ///
    /// A segment of length zero returns `start`.
    pub fn closest_point(start: Point, end: Point, probe: Point) -> Point {
        LineSegment {
            from: start,
            to: end,
        }
        .closest_point(probe)
    }
}

fn nth_point(points: &[Point], index: usize) -> Result<Point, QueryError> {
    debug_assert!(index > 0);
    points
        .get(index - 1)
        .copied()
        .ok_or(QueryError::IndexOutOfRange {
            index,
            len: points.len(),
        })
}

/// An iterator over the independent point arrays of a [`PolylineInput`].
#[derive(Clone)]
pub enum PointArrays<'l> {
    Single(Option<&'l [Point]>),
    Multiple(slice::Iter<'l, Vec<Point>>),
}

impl<'l> Iterator for PointArrays<'l> {
    type Item = &'l [Point];

    fn next(&mut self) -> Option<&'l [Point]> {
        match self {
            PointArrays::Single(points) => points.take(),
            PointArrays::Multiple(iter) => iter.next().map(|points| &points[..]),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            PointArrays::Single(points) => {
                let n = if points.is_some() { 1 } else { 0 };
                (n, Some(n))
            }
            PointArrays::Multiple(iter) => iter.size_hint(),
        }
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn point_arrays() {
    let input = PolylineInput::Points(vec![point(0.0, 0.0), point(1.0, 0.0)]);
    assert_eq!(input.point_arrays().count(), 1);
    assert_eq!(input.point_count(), 2);
    assert!(!input.is_empty());

    let input = PolylineInput::Segments(vec![
        vec![point(0.0, 0.0), point(1.0, 0.0), point(2.0, 0.0)],
        vec![],
        vec![point(5.0, 5.0)],
    ]);
    let lengths: Vec<usize> = input.point_arrays().map(|points| points.len()).collect();
    assert_eq!(lengths, vec![3, 0, 1]);
    assert_eq!(input.point_count(), 4);
    assert_eq!(input.segment_count(), 3);

    assert!(PolylineInput::default().is_empty());
    assert!(PolylineInput::Segments(Vec::new()).is_empty());
    assert!(PolylineInput::Points(vec![point(1.0, 1.0)]).is_empty());
}

#[test]
fn position_in_points() {
    let input = PolylineInput::Points(vec![point(0.0, 0.0), point(1.0, 2.0), point(3.0, 4.0)]);

    assert_eq!(input.position(1, None), Ok(point(0.0, 0.0)));
    assert_eq!(input.position(3, None), Ok(point(3.0, 4.0)));
    assert_eq!(input.position(2, Some(1)), Ok(point(1.0, 2.0)));
    assert_eq!(input.position_in_segment(2, 0), Ok(point(1.0, 2.0)));

    assert_eq!(input.position(0, None), Err(QueryError::ZeroIndex));
    assert_eq!(
        input.position(4, None),
        Err(QueryError::IndexOutOfRange { index: 4, len: 3 })
    );
    assert_eq!(
        input.position(1, Some(2)),
        Err(QueryError::SegmentOutOfRange {
            segment: 2,
            count: 1
        })
    );
}

#[test]
fn position_across_segments() {
    let input = PolylineInput::Segments(vec![
        vec![point(0.0, 0.0), point(1.0, 0.0)],
        vec![point(10.0, 0.0), point(11.0, 0.0), point(12.0, 0.0)],
    ]);

    // Global indices walk through the segments in order.
    assert_eq!(input.position(2, None), Ok(point(1.0, 0.0)));
    assert_eq!(input.position(3, None), Ok(point(10.0, 0.0)));
    assert_eq!(input.position(5, None), Ok(point(12.0, 0.0)));
    assert_eq!(
        input.position(6, None),
        Err(QueryError::IndexOutOfRange { index: 6, len: 5 })
    );

    // 1-based segment index.
    assert_eq!(input.position(1, Some(2)), Ok(point(10.0, 0.0)));
    // 0-based segment index.
    assert_eq!(input.position_in_segment(1, 1), Ok(point(10.0, 0.0)));

    assert_eq!(
        input.position(1, Some(0)),
        Err(QueryError::SegmentOutOfRange {
            segment: 0,
            count: 2
        })
    );
    assert_eq!(
        input.position_in_segment(3, 0),
        Err(QueryError::IndexOutOfRange { index: 3, len: 2 })
    );
}

#[test]
fn closest_point() {
    let start = point(0.0, 0.0);
    let end = point(10.0, 0.0);

    assert_eq!(
        PolylineInput::closest_point(start, end, point(4.0, 7.0)),
        point(4.0, 0.0)
    );
    assert_eq!(
        PolylineInput::closest_point(start, end, point(-3.0, 1.0)),
        start
    );
    assert_eq!(
        PolylineInput::closest_point(start, end, point(13.0, 1.0)),
        end
    );
    assert_eq!(
        PolylineInput::closest_point(start, start, point(13.0, 1.0)),
        start
    );
}
