use crate::scalar::Scalar;
use crate::utils::{normalized, perpendicular};
use crate::{Point, Vector};

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment<S> {
    pub from: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> LineSegment<S> {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.from.lerp(self.to, t)
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.to
    }

    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector<S> {
        self.to - self.from
    }

    /// Computes the length of this segment.
    #[inline]
    pub fn length(&self) -> S {
        self.to_vector().length()
    }

    /// Computes the squared length of this segment.
    #[inline]
    pub fn square_length(&self) -> S {
        self.to_vector().square_length()
    }

    /// Unit vector pointing from `from` to `to`.
    ///
    /// Zero if the segment has no length.
    #[inline]
    pub fn direction(&self) -> Vector<S> {
        normalized(self.to_vector())
    }

    /// Vector perpendicular to the segment, of length `distance`, pointing to the
    /// left of the segment's direction (in a y-up coordinate system).
    ///
    /// Zero if the segment has no length.
    #[inline]
    pub fn normal_offset(&self, distance: S) -> Vector<S> {
        normalized(perpendicular(self.to_vector())) * distance
    }

    /// Segment of length `distance` ending at `from` and continuing in this
    /// segment's direction.
    #[inline]
    pub fn extension_before(&self, distance: S) -> Self {
        LineSegment {
            from: self.from - self.direction() * distance,
            to: self.from,
        }
    }

    /// Segment of length `distance` starting at `to` and continuing in this
    /// segment's direction.
    #[inline]
    pub fn extension_after(&self, distance: S) -> Self {
        LineSegment {
            from: self.to,
            to: self.to + self.direction() * distance,
        }
    }

    /// Computes the distance between this segment and a point.
    #[inline]
    pub fn distance_to_point(&self, p: Point<S>) -> S {
        self.square_distance_to_point(p).sqrt()
    }

    /// Computes the squared distance between this segment and a point.
    #[inline]
    pub fn square_distance_to_point(&self, p: Point<S>) -> S {
        (self.closest_point(p) - p).square_length()
    }

    /// Computes the closest point on this segment to `p`.
    ///
    /// The projection parameter is clamped to `[0, 1]`. A segment of length zero
    /// returns its `from` point.
    #[inline]
    pub fn closest_point(&self, p: Point<S>) -> Point<S> {
        let v1 = self.to - self.from;
        let v2 = p - self.from;
        let square_length = v1.dot(v1);
        if !(square_length > S::EPSILON * S::EPSILON) {
            return self.from;
        }

        let t = S::min(S::max(v2.dot(v1) / square_length, S::ZERO), S::ONE);

        self.from + v1 * t
    }

    #[inline]
    pub fn to_f32(&self) -> LineSegment<f32> {
        LineSegment {
            from: self.from.to_f32(),
            to: self.to.to_f32(),
        }
    }

    #[inline]
    pub fn to_f64(&self) -> LineSegment<f64> {
        LineSegment {
            from: self.from.to_f64(),
            to: self.to.to_f64(),
        }
    }
}

#[cfg(test)]
use crate::{point, vector};

#[test]
fn closest_point() {
    let segment = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    };

    assert_eq!(segment.closest_point(point(5.0, 3.0)), point(5.0, 0.0));
    assert_eq!(segment.closest_point(point(-4.0, 1.0)), point(0.0, 0.0));
    assert_eq!(segment.closest_point(point(14.0, -2.0)), point(10.0, 0.0));
    assert_eq!(segment.distance_to_point(point(5.0, 3.0)), 3.0);

    let diagonal = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(2.0, 2.0),
    };
    let p = diagonal.closest_point(point(2.0, 0.0));
    assert!((p - point(1.0, 1.0)).length() < 1e-6);
}

#[test]
fn closest_point_on_empty_segment() {
    let segment = LineSegment {
        from: point(1.0f32, 2.0),
        to: point(1.0, 2.0),
    };

    let p = segment.closest_point(point(5.0, 5.0));
    assert_eq!(p, point(1.0, 2.0));
    assert!(p.x.is_finite() && p.y.is_finite());
}

#[test]
fn offsets() {
    let segment = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    };

    assert_eq!(segment.normal_offset(1.0), vector(0.0, 1.0));
    assert_eq!(segment.direction(), vector(1.0, 0.0));
    assert_eq!(
        segment.extension_before(2.0),
        LineSegment {
            from: point(-2.0, 0.0),
            to: point(0.0, 0.0)
        }
    );
    assert_eq!(
        segment.extension_after(2.0),
        LineSegment {
            from: point(10.0, 0.0),
            to: point(12.0, 0.0)
        }
    );

    let vertical = LineSegment {
        from: point(10.0f32, 0.0),
        to: point(10.0, 10.0),
    };
    assert_eq!(vertical.normal_offset(1.0), vector(-1.0, 0.0));

    let empty = LineSegment {
        from: point(3.0f32, 3.0),
        to: point(3.0, 3.0),
    };
    assert_eq!(empty.normal_offset(1.0), vector(0.0, 0.0));
    assert_eq!(empty.extension_after(1.0).to, point(3.0, 3.0));
}
