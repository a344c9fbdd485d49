#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Tessellation of thick polylines into textured quads.
//!
//! This crate is reexported in [polystroke](../polystroke/index.html).
//!
//! ## Overview
//!
//! The most interesting types and traits of this crate are:
//!
//! * [StrokeTessellator](struct.StrokeTessellator.html) - Turns a
//!   [PolylineInput](enum.PolylineInput.html) into a mesh of quads.
//! * [StrokeOptions](struct.StrokeOptions.html) - Line width, joins, caps, smoothing and
//!   the other parameters of the stroke.
//! * [`GeometryBuilder`](geometry_builder/trait.GeometryBuilder.html) - (See the documentation of the
//!   [geometry_builder module](geometry_builder/index.html)) which the tessellator is built on. This trait
//!   provides an interface for types that help with building and assembling the vertices and triangles that
//!   form the tessellation, usually in the form of arbitrary vertex and index buffers.
//!
//! ## The tessellation pipeline
//!
//! Each point array of the input goes through the following steps:
//!
//! 1. Optional bézier smoothing, which replaces the points with samples of a curve
//!    (see [Smoothing](enum.Smoothing.html)).
//! 2. Mapping into the local coordinate space (see [CoordinateSpace](enum.CoordinateSpace.html)).
//! 3. Each segment becomes a quad of the width of the line, and optional caps extend the
//!    first and last segments.
//! 4. Consecutive quads are joined: their shared corners are adjusted and a join quad
//!    fills the gap between them.
//! 5. The quads are submitted to the geometry builder, four vertices and two triangles
//!    at a time.
//!
//! ### Texture coordinates
//!
//! Strokes are meant to be rendered with a texture split in three slices: the left part
//! for the start cap, the stretched middle part along the line and the right part for the
//! end cap. See [TextureRegion](struct.TextureRegion.html).
//!
//! ### Vertex budget
//!
//! A stroke is rendered with 16 bits indices, so the number of vertices of a single
//! tessellation is limited by [StrokeOptions::max_vertices](struct.StrokeOptions.html#structfield.max_vertices).
//! Exceeding it aborts the geometry and returns an error.
//!
//! ## Examples
//!
//! ```
//! use polystroke_tessellation::*;
//! use polystroke_tessellation::math::point;
//!
//! let input = PolylineInput::Points(vec![
//!     point(0.0, 0.0),
//!     point(10.0, 0.0),
//!     point(10.0, 10.0),
//! ]);
//!
//! let options = StrokeOptions::default()
//!     .with_line_width(2.0)
//!     .with_line_join(LineJoin::Miter)
//!     .with_caps(true);
//!
//! let mesh = build_mesh(&input, &options, None).unwrap();
//!
//! // Start cap, two segments, one join and the end cap.
//! assert_eq!(mesh.vertices.len(), 5 * 4);
//! assert_eq!(mesh.indices.len(), 5 * 6);
//! ```

pub use polystroke_path as path;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod error;
pub mod geometry_builder;
mod join;
mod quad;
mod stroke;
mod uv;

pub use crate::path::math;

pub use crate::path::geom;

#[doc(inline)]
pub use crate::stroke::*;

#[doc(inline)]
pub use crate::quad::*;

#[doc(inline)]
pub use crate::uv::*;

#[doc(inline)]
pub use crate::join::{
    resolve_join, Join, JoinGeometry, JoinKind, MIN_MITER_JOIN_ANGLE, MIN_NICE_BEVEL_JOIN_ANGLE,
};

#[doc(inline)]
pub use crate::geometry_builder::{
    BuffersBuilder, GeometryBuilder, GeometryBuilderError, StrokeGeometryBuilder,
    StrokeVertexConstructor, VertexBuffers,
};

#[doc(inline)]
pub use crate::error::*;

pub use crate::path::{PolylineInput, QueryError, Smoothing, SmoothingOptions};

use crate::math::{point, Point, Size, Vector};

use std::ops::{Add, Sub};

/// How the corner between two segments is drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    /// The gap on the outside of the corner is filled with a flat quad.
    Bevel,
    /// The edges of the segments are extended until they meet.
    ///
    /// Falls back to `Bevel` when the angle is too sharp or the segments too short.
    Miter,
}

/// How the points of an array are connected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineMode {
    /// Each point is connected to the next one.
    Continuous,
    /// Points `(0, 1)`, `(2, 3)`, etc. form independent segments.
    ///
    /// A trailing point without a partner is ignored. Pairs are never joined.
    Pairs,
}

/// The space input positions are expressed in.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum CoordinateSpace {
    /// Positions are used as they are.
    Local,
    /// Positions are fractions of a rectangle of the given size, `pivot` being the
    /// normalized position of the origin within that rectangle.
    Normalized { size: Size, pivot: Vector },
}

impl CoordinateSpace {
    /// Maps a position into the local space.
    #[inline]
    pub fn to_local(&self, p: Point) -> Point {
        match *self {
            CoordinateSpace::Local => p,
            CoordinateSpace::Normalized { size, pivot } => point(
                p.x * size.width - pivot.x * size.width,
                p.y * size.height - pivot.y * size.height,
            ),
        }
    }
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        CoordinateSpace::Local
    }
}

/// An 8 bits per channel RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Color::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Parameters for the tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct StrokeOptions {
    /// Line width
    ///
    /// Must be greater than zero.
    /// Default value: `StrokeOptions::DEFAULT_LINE_WIDTH`.
    pub line_width: f32,

    /// Default value: `LineJoin::Bevel`.
    pub line_join: LineJoin,

    /// Whether to extend each point array by half a line width at both ends.
    ///
    /// Default value: `false`.
    pub caps: bool,

    /// Default value: `LineMode::Continuous`.
    pub line_mode: LineMode,

    /// Bézier smoothing applied to each point array before it is stroked.
    ///
    /// Default value: `SmoothingOptions::DEFAULT`, which does not smooth.
    pub smoothing: SmoothingOptions,

    /// Color of every vertex.
    ///
    /// Default value: `Color::WHITE`.
    pub color: Color,

    /// Default value: `CoordinateSpace::Local`.
    pub coordinate_space: CoordinateSpace,

    /// Maximum number of vertices of a single tessellation.
    ///
    /// Default value: `StrokeOptions::DEFAULT_MAX_VERTICES`.
    pub max_vertices: u32,
}

impl StrokeOptions {
    pub const DEFAULT_LINE_WIDTH: f32 = 2.0;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Bevel;
    pub const DEFAULT_LINE_MODE: LineMode = LineMode::Continuous;
    /// Leaves some room below the 65535 vertices addressable with 16 bits indices.
    pub const DEFAULT_MAX_VERTICES: u32 = 64000;

    pub const DEFAULT: Self = StrokeOptions {
        line_width: Self::DEFAULT_LINE_WIDTH,
        line_join: Self::DEFAULT_LINE_JOIN,
        caps: false,
        line_mode: Self::DEFAULT_LINE_MODE,
        smoothing: SmoothingOptions::DEFAULT,
        color: Color::WHITE,
        coordinate_space: CoordinateSpace::Local,
        max_vertices: Self::DEFAULT_MAX_VERTICES,
    };

    #[inline]
    pub fn line_width(width: f32) -> Self {
        Self::DEFAULT.with_line_width(width)
    }

    #[inline]
    pub fn with_line_width(mut self, width: f32) -> Self {
        assert!(width > 0.0);
        self.line_width = width;
        self
    }

    #[inline]
    pub const fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub const fn with_caps(mut self, caps: bool) -> Self {
        self.caps = caps;
        self
    }

    #[inline]
    pub const fn with_line_mode(mut self, mode: LineMode) -> Self {
        self.line_mode = mode;
        self
    }

    #[inline]
    pub const fn with_smoothing(mut self, smoothing: SmoothingOptions) -> Self {
        self.smoothing = smoothing;
        self
    }

    #[inline]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub const fn with_coordinate_space(mut self, space: CoordinateSpace) -> Self {
        self.coordinate_space = space;
        self
    }

    #[inline]
    pub const fn with_max_vertices(mut self, max: u32) -> Self {
        self.max_vertices = max;
        self
    }
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

type Index = u32;

/// A virtual vertex offset in a geometry.
///
/// The `VertexId`s are only valid between `GeometryBuilder::begin_geometry` and
/// `GeometryBuilder::end_geometry`. `GeometryBuilder` implementations typically translate
/// the ids internally so that first `VertexId` after `begin_geometry` is zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexId(pub Index);

impl VertexId {
    pub const INVALID: VertexId = VertexId(u32::MAX);

    pub fn offset(self) -> Index {
        self.0
    }

    pub fn to_usize(self) -> usize {
        self.0 as usize
    }

    pub fn from_usize(v: usize) -> Self {
        VertexId(v as Index)
    }
}

impl Add<u32> for VertexId {
    type Output = Self;
    fn add(self, rhs: u32) -> Self {
        VertexId(self.0 + rhs)
    }
}

impl Sub<u32> for VertexId {
    type Output = Self;
    fn sub(self, rhs: u32) -> Self {
        VertexId(self.0 - rhs)
    }
}

impl From<u16> for VertexId {
    fn from(v: u16) -> Self {
        VertexId(v as Index)
    }
}
impl From<u32> for VertexId {
    fn from(v: u32) -> Self {
        VertexId(v)
    }
}
impl From<i32> for VertexId {
    fn from(v: i32) -> Self {
        VertexId(v as Index)
    }
}

impl From<VertexId> for u16 {
    fn from(v: VertexId) -> Self {
        v.0 as u16
    }
}
impl From<VertexId> for u32 {
    fn from(v: VertexId) -> Self {
        v.0
    }
}
impl From<VertexId> for i32 {
    fn from(v: VertexId) -> Self {
        v.0 as i32
    }
}
impl From<VertexId> for usize {
    fn from(v: VertexId) -> Self {
        v.0 as usize
    }
}

#[cfg(test)]
use crate::math::{size, vector};

#[test]
fn default_options() {
    let options = StrokeOptions::default();
    assert_eq!(options, StrokeOptions::DEFAULT);
    assert_eq!(options.line_width, 2.0);
    assert_eq!(options.line_join, LineJoin::Bevel);
    assert!(!options.caps);
    assert_eq!(options.line_mode, LineMode::Continuous);
    assert_eq!(options.smoothing.mode, Smoothing::None);
    assert_eq!(options.color, Color::WHITE);
    assert_eq!(options.max_vertices, 64000);

    let options = StrokeOptions::line_width(5.0)
        .with_line_join(LineJoin::Miter)
        .with_caps(true)
        .with_line_mode(LineMode::Pairs)
        .with_max_vertices(100);
    assert_eq!(options.line_width, 5.0);
    assert_eq!(options.line_join, LineJoin::Miter);
    assert!(options.caps);
    assert_eq!(options.line_mode, LineMode::Pairs);
    assert_eq!(options.max_vertices, 100);
}

#[test]
#[should_panic]
fn zero_line_width() {
    let _ = StrokeOptions::default().with_line_width(0.0);
}

#[test]
fn normalized_space() {
    let space = CoordinateSpace::Normalized {
        size: size(200.0, 100.0),
        pivot: vector(0.5, 0.5),
    };

    assert_eq!(space.to_local(point(0.5, 0.5)), point(0.0, 0.0));
    assert_eq!(space.to_local(point(0.0, 0.0)), point(-100.0, -50.0));
    assert_eq!(space.to_local(point(1.0, 0.25)), point(100.0, -25.0));

    assert_eq!(
        CoordinateSpace::Local.to_local(point(3.0, 4.0)),
        point(3.0, 4.0)
    );
}
