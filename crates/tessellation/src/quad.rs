use crate::geom::LineSegment;
use crate::math::Point;
use crate::uv::UvSets;
use crate::Color;

/// A vertex produced by the stroke tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct StrokeVertex {
    pub(crate) position: Point,
    pub(crate) color: Color,
    pub(crate) uv: Point,
}

impl StrokeVertex {
    pub fn new(position: Point, color: Color, uv: Point) -> Self {
        StrokeVertex {
            position,
            color,
            uv,
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Texture coordinates of the vertex.
    #[inline]
    pub fn uv(&self) -> Point {
        self.uv
    }
}

/// The role of a quad in the stroke, which selects its texture coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum QuadKind {
    /// Start cap.
    Start,
    /// Segment.
    Middle,
    /// End cap.
    End,
    /// A quad covering the whole texture.
    Full,
    /// Fills the corner between two segments.
    Join,
}

/// Which end of a segment a cap is added to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum CapPosition {
    Start,
    End,
}

/// Four vertices forming the triangles `(0, 1, 2)` and `(0, 2, 3)`.
///
/// For a segment going from `start` to `end` with an offset `o` perpendicular to it:
///
/// ```ascii
///  1 (start + o)        2 (end + o)
///   +------------------+
///   |                  |   -->
///   +------------------+
///  0 (start - o)        3 (end - o)
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Quad {
    pub kind: QuadKind,
    pub vertices: [StrokeVertex; 4],
}

impl Quad {
    #[inline]
    pub fn position(&self, corner: usize) -> Point {
        self.vertices[corner].position
    }

    #[inline]
    pub fn set_position(&mut self, corner: usize, position: Point) {
        self.vertices[corner].position = position;
    }

    pub fn positions(&self) -> [Point; 4] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
            self.vertices[3].position,
        ]
    }
}

/// Builds the quads of segments and caps with a given width, color and set of texture
/// coordinates.
pub struct QuadBuilder<'l> {
    line_width: f32,
    color: Color,
    uvs: &'l UvSets,
}

impl<'l> QuadBuilder<'l> {
    pub fn new(line_width: f32, color: Color, uvs: &'l UvSets) -> Self {
        QuadBuilder {
            line_width,
            color,
            uvs,
        }
    }

    /// The quad covering the segment `[start, end]`.
    ///
    /// A segment of length zero produces a quad of width zero.
    pub fn segment(&self, start: Point, end: Point) -> Quad {
        self.quad(start, end, QuadKind::Middle)
    }

    /// The quad extending the segment `[start, end]` by half a line width beyond one of
    /// its ends.
    pub fn cap(&self, start: Point, end: Point, position: CapPosition) -> Quad {
        let segment = LineSegment {
            from: start,
            to: end,
        };
        let half_width = self.line_width * 0.5;
        match position {
            CapPosition::Start => {
                let cap = segment.extension_before(half_width);
                self.quad(cap.from, cap.to, QuadKind::Start)
            }
            CapPosition::End => {
                let cap = segment.extension_after(half_width);
                self.quad(cap.from, cap.to, QuadKind::End)
            }
        }
    }

    /// Same as `segment` with the texture coordinates of a specific kind of quad.
    pub fn quad(&self, start: Point, end: Point, kind: QuadKind) -> Quad {
        let offset = LineSegment {
            from: start,
            to: end,
        }
        .normal_offset(self.line_width * 0.5);

        let positions = [start - offset, start + offset, end + offset, end - offset];
        let uvs = self.uvs.get(kind);
        let color = self.color;

        Quad {
            kind,
            vertices: [
                StrokeVertex::new(positions[0], color, uvs[0]),
                StrokeVertex::new(positions[1], color, uvs[1]),
                StrokeVertex::new(positions[2], color, uvs[2]),
                StrokeVertex::new(positions[3], color, uvs[3]),
            ],
        }
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn segment_corners() {
    let uvs = UvSets::default();
    let builder = QuadBuilder::new(2.0, Color::WHITE, &uvs);

    let quad = builder.segment(point(0.0, 0.0), point(10.0, 0.0));
    assert_eq!(quad.kind, QuadKind::Middle);
    assert_eq!(
        quad.positions(),
        [
            point(0.0, -1.0),
            point(0.0, 1.0),
            point(10.0, 1.0),
            point(10.0, -1.0)
        ]
    );
    assert_eq!(quad.vertices[0].uv(), uvs.middle[0]);
    assert_eq!(quad.vertices[2].color(), Color::WHITE);

    let quad = builder.segment(point(10.0, 0.0), point(10.0, 10.0));
    assert_eq!(
        quad.positions(),
        [
            point(11.0, 0.0),
            point(9.0, 0.0),
            point(9.0, 10.0),
            point(11.0, 10.0)
        ]
    );
}

#[test]
fn empty_segment() {
    let uvs = UvSets::default();
    let builder = QuadBuilder::new(2.0, Color::WHITE, &uvs);

    let quad = builder.segment(point(3.0, 4.0), point(3.0, 4.0));
    for p in &quad.positions() {
        assert_eq!(*p, point(3.0, 4.0));
    }

    let cap = builder.cap(point(3.0, 4.0), point(3.0, 4.0), CapPosition::End);
    for p in &cap.positions() {
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}

#[test]
fn caps() {
    let uvs = UvSets::default();
    let builder = QuadBuilder::new(2.0, Color::WHITE, &uvs);

    let start = builder.cap(point(0.0, 0.0), point(10.0, 0.0), CapPosition::Start);
    assert_eq!(start.kind, QuadKind::Start);
    assert_eq!(
        start.positions(),
        [
            point(-1.0, -1.0),
            point(-1.0, 1.0),
            point(0.0, 1.0),
            point(0.0, -1.0)
        ]
    );
    assert_eq!(start.vertices[0].uv(), uvs.start[0]);

    let end = builder.cap(point(0.0, 0.0), point(10.0, 0.0), CapPosition::End);
    assert_eq!(end.kind, QuadKind::End);
    assert_eq!(
        end.positions(),
        [
            point(10.0, -1.0),
            point(10.0, 1.0),
            point(11.0, 1.0),
            point(11.0, -1.0)
        ]
    );
    assert_eq!(end.vertices[3].uv(), uvs.end[3]);
}
