//! Corners between consecutive segments.
//!
//! Given the quads of two consecutive segments, the join resolver moves their shared corners
//! and produces the quad that fills the gap between them:
//!
//! - A miter join moves both corner pairs to the intersections of the quads' edges.
//! - A bevel join fills the gap with a flat quad. When the turn is sharp enough, the corners
//!   on the inside of the turn are first merged to avoid overlapping geometry.
//!
//! Miter joins degrade to bevel joins when the turn is too sharp or the segments are too
//! short for the miter point to stay close to the line.

use crate::geom::utils::{angle_between, turn_sign};
use crate::math::Point;
use crate::quad::{Quad, QuadKind};
use crate::LineJoin;

use std::f32::consts::PI;

/// Miter joins require the angle between two segments to be greater than this.
pub const MIN_MITER_JOIN_ANGLE: f32 = 15.0 * PI / 180.0;

/// Bevel joins only merge the inner corners if the angle between two segments is greater
/// than this.
pub const MIN_NICE_BEVEL_JOIN_ANGLE: f32 = 30.0 * PI / 180.0;

const EPSILON: f32 = 1e-6;

/// How a join was resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Miter,
    /// Bevel join with merged inner corners.
    NiceBevel,
    Bevel,
}

/// A resolved join and the quad filling it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub quad: Quad,
}

/// The measurements of the corner between two segment quads.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JoinGeometry {
    /// Angle between the two segments in radians, `π` for a straight line.
    pub angle: f32,
    /// `-1.0` for a clockwise turn, `1.0` otherwise.
    pub sign: f32,
    /// Distance between the end of the first segment and the miter points, along the
    /// first segment.
    pub miter_distance: f32,
    pub incoming_length: f32,
    pub outgoing_length: f32,
    /// Miter point on the side of corner 2 of the first quad.
    pub miter_a: Point,
    /// Miter point on the side of corner 3 of the first quad.
    pub miter_b: Point,
}

impl JoinGeometry {
    /// Measures the corner between `prev` and `next`.
    ///
    /// Returns `None` if one of the segments has no length or if the second segment folds
    /// back exactly onto the first one.
    pub fn new(prev: &Quad, next: &Quad, line_width: f32) -> Option<Self> {
        let incoming = prev.position(1) - prev.position(2);
        let outgoing = next.position(2) - next.position(1);
        let incoming_length = incoming.length();
        let outgoing_length = outgoing.length();

        if !(incoming_length > EPSILON && outgoing_length > EPSILON) {
            return None;
        }

        let angle = angle_between(incoming, outgoing);
        if !(angle > EPSILON) {
            return None;
        }

        let sign = turn_sign(incoming, outgoing);
        // Clamped for straight lines, where tan(angle / 2) can round to a negative number.
        let miter_distance = (line_width / (2.0 * (angle * 0.5).tan())).max(0.0);
        let shift = incoming / incoming_length * miter_distance * sign;

        Some(JoinGeometry {
            angle,
            sign,
            miter_distance,
            incoming_length,
            outgoing_length,
            miter_a: prev.position(2) - shift,
            miter_b: prev.position(3) + shift,
        })
    }

    /// The miter points are closer to the corner than half of each segment.
    fn fits(&self) -> bool {
        self.miter_distance < self.incoming_length * 0.5
            && self.miter_distance < self.outgoing_length * 0.5
    }

    pub fn allows_miter(&self) -> bool {
        self.fits() && self.angle > MIN_MITER_JOIN_ANGLE
    }

    pub fn allows_nice_bevel(&self) -> bool {
        self.fits() && self.angle > MIN_NICE_BEVEL_JOIN_ANGLE
    }
}

/// Adjusts the shared corners of two consecutive segment quads and returns the quad filling
/// the corner between them.
///
/// The join quad is made of corners 2 and 3 of `prev` followed by corners 0 and 1 of `next`.
/// It has no area when the miter join applies.
pub fn resolve_join(
    prev: &mut Quad,
    next: &mut Quad,
    line_width: f32,
    line_join: LineJoin,
) -> Join {
    let geometry = JoinGeometry::new(prev, next, line_width);

    let kind = match geometry {
        Some(g) if line_join == LineJoin::Miter && g.allows_miter() => {
            prev.set_position(2, g.miter_a);
            prev.set_position(3, g.miter_b);
            next.set_position(0, g.miter_b);
            next.set_position(1, g.miter_a);
            JoinKind::Miter
        }
        Some(g) if g.allows_nice_bevel() => {
            if g.sign < 0.0 {
                prev.set_position(2, g.miter_a);
                next.set_position(1, g.miter_a);
            } else {
                prev.set_position(3, g.miter_b);
                next.set_position(0, g.miter_b);
            }
            JoinKind::NiceBevel
        }
        _ => JoinKind::Bevel,
    };

    log::trace!(
        "join {:?} (requested {:?}, angle: {:?}, miter distance: {:?})",
        kind,
        line_join,
        geometry.map(|g| g.angle.to_degrees()),
        geometry.map(|g| g.miter_distance),
    );

    Join {
        kind,
        quad: Quad {
            kind: QuadKind::Join,
            vertices: [
                prev.vertices[2],
                prev.vertices[3],
                next.vertices[0],
                next.vertices[1],
            ],
        },
    }
}

#[cfg(test)]
use crate::math::{point, vector};
#[cfg(test)]
use crate::uv::UvSets;
#[cfg(test)]
use crate::Color;
#[cfg(test)]
use crate::QuadBuilder;

#[cfg(test)]
fn assert_approx_eq(a: Point, b: Point) {
    if (a - b).length() > 1e-4 {
        panic!("{:?} != {:?}", a, b);
    }
}

#[cfg(test)]
fn quads(points: &[Point], line_width: f32) -> (Quad, Quad) {
    let uvs = UvSets::default();
    let builder = QuadBuilder::new(line_width, Color::WHITE, &uvs);
    (
        builder.segment(points[0], points[1]),
        builder.segment(points[1], points[2]),
    )
}

#[test]
fn right_angle_miter() {
    let (mut prev, mut next) = quads(
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
        2.0,
    );

    let join = resolve_join(&mut prev, &mut next, 2.0, LineJoin::Miter);
    assert_eq!(join.kind, JoinKind::Miter);

    // The shared corners coincide exactly.
    assert_eq!(prev.position(2), next.position(1));
    assert_eq!(prev.position(3), next.position(0));
    assert_approx_eq(prev.position(2), point(9.0, 1.0));
    assert_approx_eq(prev.position(3), point(11.0, -1.0));

    // The other corners are untouched.
    assert_eq!(prev.position(0), point(0.0, -1.0));
    assert_eq!(next.position(2), point(9.0, 10.0));

    assert_eq!(join.quad.kind, QuadKind::Join);
    assert_eq!(
        join.quad.positions(),
        [
            prev.position(2),
            prev.position(3),
            next.position(0),
            next.position(1)
        ]
    );
    assert_eq!(join.quad.vertices[0].uv(), prev.vertices[2].uv());
    assert_eq!(join.quad.vertices[3].uv(), next.vertices[1].uv());
}

#[test]
fn right_angle_bevel() {
    // Counter-clockwise turn in a y-up space.
    let (mut prev, mut next) = quads(
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
        2.0,
    );
    let join = resolve_join(&mut prev, &mut next, 2.0, LineJoin::Bevel);

    assert_eq!(join.kind, JoinKind::NiceBevel);
    assert_eq!(prev.position(2), next.position(1));
    assert_approx_eq(prev.position(2), point(9.0, 1.0));
    assert_eq!(prev.position(3), point(10.0, -1.0));
    assert_eq!(next.position(0), point(11.0, 0.0));

    // Clockwise turn.
    let (mut prev, mut next) = quads(
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, -10.0)],
        2.0,
    );
    let join = resolve_join(&mut prev, &mut next, 2.0, LineJoin::Bevel);

    assert_eq!(join.kind, JoinKind::NiceBevel);
    assert_eq!(prev.position(3), next.position(0));
    assert_approx_eq(prev.position(3), point(9.0, -1.0));
    assert_eq!(prev.position(2), point(10.0, 1.0));
    assert_eq!(next.position(1), point(11.0, 0.0));
}

#[test]
fn miter_angle_threshold() {
    let geometry = JoinGeometry {
        angle: MIN_MITER_JOIN_ANGLE,
        sign: 1.0,
        miter_distance: 1.0,
        incoming_length: 100.0,
        outgoing_length: 100.0,
        miter_a: point(0.0, 0.0),
        miter_b: point(0.0, 0.0),
    };
    assert!(!geometry.allows_miter());
    assert!(!geometry.allows_nice_bevel());

    let geometry = JoinGeometry {
        angle: MIN_MITER_JOIN_ANGLE + 1e-5,
        ..geometry
    };
    assert!(geometry.allows_miter());

    let geometry = JoinGeometry {
        angle: MIN_NICE_BEVEL_JOIN_ANGLE,
        ..geometry
    };
    assert!(!geometry.allows_nice_bevel());
}

#[test]
fn sharp_turns() {
    let turn = |degrees: f32| {
        let angle = degrees.to_radians();
        let corner = point(100.0, 0.0);
        let end = corner + vector(-angle.cos(), angle.sin()) * 100.0;
        quads(&[point(0.0, 0.0), corner, end], 2.0)
    };

    let (mut prev, mut next) = turn(16.0);
    let join = resolve_join(&mut prev, &mut next, 2.0, LineJoin::Miter);
    assert_eq!(join.kind, JoinKind::Miter);
    assert_eq!(prev.position(2), next.position(1));
    assert_eq!(prev.position(3), next.position(0));

    let (mut prev, mut next) = turn(14.0);
    let (prev_before, next_before) = (prev, next);
    let join = resolve_join(&mut prev, &mut next, 2.0, LineJoin::Miter);
    assert_eq!(join.kind, JoinKind::Bevel);
    assert_eq!(prev, prev_before);
    assert_eq!(next, next_before);
}

#[test]
fn short_segments_degrade_to_bevel() {
    // The miter point would be far away from these short segments.
    let (mut prev, mut next) = quads(&[point(0.0, 0.0), point(2.0, 0.0), point(0.5, 0.5)], 2.0);
    let join = resolve_join(&mut prev, &mut next, 2.0, LineJoin::Miter);
    assert_eq!(join.kind, JoinKind::Bevel);
}

#[test]
fn degenerate_joins() {
    // Second segment has no length.
    let (mut prev, mut next) = quads(&[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 0.0)], 2.0);
    assert!(JoinGeometry::new(&prev, &next, 2.0).is_none());
    let join = resolve_join(&mut prev, &mut next, 2.0, LineJoin::Miter);
    assert_eq!(join.kind, JoinKind::Bevel);
    for p in &join.quad.positions() {
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    // The line folds back onto itself.
    let (mut prev, mut next) = quads(&[point(0.0, 0.0), point(10.0, 0.0), point(5.0, 0.0)], 2.0);
    let join = resolve_join(&mut prev, &mut next, 2.0, LineJoin::Miter);
    assert_eq!(join.kind, JoinKind::Bevel);
    for p in &join.quad.positions() {
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}

#[test]
fn straight_line() {
    let (mut prev, mut next) = quads(&[point(0.0, 0.0), point(10.0, 0.0), point(20.0, 0.0)], 2.0);
    let join = resolve_join(&mut prev, &mut next, 2.0, LineJoin::Miter);

    assert_eq!(join.kind, JoinKind::Miter);
    assert_eq!(prev.position(2), point(10.0, 1.0));
    assert_eq!(prev.position(3), point(10.0, -1.0));
    assert_eq!(next.position(0), point(10.0, -1.0));
    assert_eq!(next.position(1), point(10.0, 1.0));
}
