//! Tools to help with generating vertex and index buffers.
//!
//! ## Overview
//!
//! The stroke tessellator does not write vertices into a specific container. Instead it
//! talks to a [`StrokeGeometryBuilder`](trait.StrokeGeometryBuilder.html), which decides
//! what the output looks like. Every quad of the stroke is submitted as four vertices
//! followed by the two triangles `(0, 1, 2)` and `(0, 2, 3)`.
//!
//! It is very common to push vertices and indices into a pair of vectors, so this module
//! provides:
//!
//! * The struct [`VertexBuffers`](struct.VertexBuffers.html), a simple pair of vectors of
//!   vertices and indices (generic parameters).
//! * The struct [`BuffersBuilder`](struct.BuffersBuilder.html) which writes into a
//!   `VertexBuffers` and implements the geometry builder traits. Producing the output
//!   vertices is delegated to a [`StrokeVertexConstructor`](trait.StrokeVertexConstructor.html).
//! * The [`Positions`](struct.Positions.html) constructor which only keeps vertex positions.
//!
//! Implementing the builder traits directly is the right thing to do for more specific needs,
//! such as writing into de-interleaved buffers or directly into mapped GPU memory.
//!
//! ## Examples
//!
//! ### Generating custom vertices
//!
//! ```
//! use polystroke_tessellation::{
//!     BuffersBuilder, PolylineInput, StrokeOptions, StrokeTessellator, StrokeVertex, VertexBuffers,
//! };
//! use polystroke_tessellation::math::point;
//!
//! // Our custom vertex.
//! #[derive(Copy, Clone, Debug)]
//! pub struct MyVertex {
//!     position: [f32; 2],
//!     uv: [f32; 2],
//! }
//!
//! let input = PolylineInput::Points(vec![point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)]);
//!
//! let mut output: VertexBuffers<MyVertex, u16> = VertexBuffers::new();
//! let mut tessellator = StrokeTessellator::new();
//! tessellator.tessellate(
//!     &input,
//!     &StrokeOptions::default(),
//!     None,
//!     &mut BuffersBuilder::new(&mut output, |vertex: StrokeVertex| MyVertex {
//!         position: vertex.position().to_array(),
//!         uv: vertex.uv().to_array(),
//!     }),
//! ).unwrap();
//!
//! // Two segments and one join.
//! assert_eq!(output.vertices.len(), 12);
//! assert_eq!(output.indices.len(), 18);
//! ```
//!
//! ### Generating a completely custom output
//!
//! ```
//! use polystroke_tessellation::{
//!     GeometryBuilder, GeometryBuilderError, PolylineInput, StrokeGeometryBuilder,
//!     StrokeOptions, StrokeTessellator, StrokeVertex, VertexId,
//! };
//! use polystroke_tessellation::math::point;
//!
//! // A geometry builder that writes the result of the tessellation to stdout instead
//! // of filling vertex and index buffers.
//! pub struct ToStdOut {
//!     vertices: u32,
//!     indices: u32,
//! }
//!
//! impl GeometryBuilder for ToStdOut {
//!     fn begin_geometry(&mut self) {
//!         // Reset the vertex in index counters.
//!         self.vertices = 0;
//!         self.indices = 0;
//!         println!(" -- begin geometry");
//!     }
//!
//!     fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
//!         println!("triangle ({}, {}, {})", a.offset(), b.offset(), c.offset());
//!         self.indices += 3;
//!     }
//!
//!     fn abort_geometry(&mut self) {
//!         println!(" -- oops!");
//!     }
//! }
//!
//! impl StrokeGeometryBuilder for ToStdOut {
//!     fn add_stroke_vertex(&mut self, vertex: StrokeVertex) -> Result<VertexId, GeometryBuilderError> {
//!         println!("vertex {:?}", vertex.position());
//!         if self.vertices >= u32::MAX {
//!             return Err(GeometryBuilderError::TooManyVertices);
//!         }
//!         self.vertices += 1;
//!         Ok(VertexId(self.vertices - 1))
//!     }
//! }
//!
//! let mut output = ToStdOut { vertices: 0, indices: 0 };
//! let mut tessellator = StrokeTessellator::new();
//! tessellator.tessellate(
//!     &PolylineInput::Points(vec![point(0.0, 0.0), point(10.0, 0.0), point(5.0, 5.0)]),
//!     &StrokeOptions::default(),
//!     None,
//!     &mut output,
//! ).unwrap();
//! ```
//!

pub use crate::error::GeometryBuilderError;
use crate::math::Point;
use crate::{Index, StrokeVertex, VertexId};

use std::convert::From;
use std::ops::Add;

/// An interface separating the tessellator from the actual vertex construction.
///
/// See the [`geometry_builder`](index.html) module documentation for more detailed explanation.
pub trait GeometryBuilder {
    /// Called at the beginning of a generation.
    ///
    /// end_geometry must be called before begin_geometry is called again.
    fn begin_geometry(&mut self) {}

    /// Called at the end of a generation.
    fn end_geometry(&mut self) {}

    /// Insert a triangle made of vertices that were added after the last call to begin_geometry.
    ///
    /// This method can only be called between begin_geometry and end_geometry.
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId);

    /// abort_geometry is called instead of end_geometry if an error occurred while producing
    /// the geometry and we won't be able to finish.
    ///
    /// The implementation is expected to discard the geometry that was generated since the last
    /// time begin_geometry was called, and to remain in a usable state.
    fn abort_geometry(&mut self) {}
}

/// A Geometry builder to interface with the [`StrokeTessellator`](../struct.StrokeTessellator.html).
///
/// Types implementing this trait must also implement the [`GeometryBuilder`](trait.GeometryBuilder.html) trait.
pub trait StrokeGeometryBuilder: GeometryBuilder {
    /// Inserts a vertex and returns its id, which is only valid between begin_geometry
    /// and end_geometry.
    ///
    /// This method can only be called between begin_geometry and end_geometry.
    fn add_stroke_vertex(&mut self, vertex: StrokeVertex)
        -> Result<VertexId, GeometryBuilderError>;
}

/// Structure that holds the vertex and index data.
///
/// Usually written into though temporary `BuffersBuilder` objects.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexBuffers<OutputVertex, OutputIndex> {
    pub vertices: Vec<OutputVertex>,
    pub indices: Vec<OutputIndex>,
}

impl<OutputVertex, OutputIndex> VertexBuffers<OutputVertex, OutputIndex> {
    /// Constructor
    pub fn new() -> Self {
        VertexBuffers::with_capacity(512, 1024)
    }

    /// Constructor
    pub fn with_capacity(num_vertices: usize, num_indices: usize) -> Self {
        VertexBuffers {
            vertices: Vec::with_capacity(num_vertices),
            indices: Vec::with_capacity(num_indices),
        }
    }

    /// Empty the buffers without freeing memory, for reuse without reallocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }
}

/// A temporary view on a `VertexBuffers` object which facilitate the population of vertex and index
/// data.
///
/// `BuffersBuilders` record the size of the buffers when a generation begins so that an
/// aborted generation can be rolled back without affecting geometry added beforehand.
///
/// The `StrokeVertexConstructor` does the translation from `StrokeVertex` to `OutputVertex`.
pub struct BuffersBuilder<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor> {
    buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>,
    first_vertex: Index,
    first_index: Index,
    vertex_offset: Index,
    vertex_constructor: Ctor,
}

impl<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor>
    BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
{
    pub fn new(buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>, ctor: Ctor) -> Self {
        let first_vertex = buffers.vertices.len() as Index;
        let first_index = buffers.indices.len() as Index;
        BuffersBuilder {
            buffers,
            first_vertex,
            first_index,
            vertex_offset: 0,
            vertex_constructor: ctor,
        }
    }

    pub fn with_vertex_offset(mut self, offset: Index) -> Self {
        self.vertex_offset = offset;

        self
    }
}

/// A trait specifying how to create vertex values.
pub trait StrokeVertexConstructor<OutputVertex> {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> OutputVertex;
}

/// A simple vertex constructor that just takes the position.
pub struct Positions;

impl StrokeVertexConstructor<Point> for Positions {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> Point {
        vertex.position()
    }
}

impl<F, OutputVertex> StrokeVertexConstructor<OutputVertex> for F
where
    F: Fn(StrokeVertex) -> OutputVertex,
{
    fn new_vertex(&mut self, vertex: StrokeVertex) -> OutputVertex {
        self(vertex)
    }
}

/// A `BuffersBuilder` that only keeps vertex positions.
pub type SimpleBuffersBuilder<'l> = BuffersBuilder<'l, Point, u16, Positions>;

/// Creates a `SimpleBuffersBuilder`.
pub fn simple_builder(buffers: &mut VertexBuffers<Point, u16>) -> SimpleBuffersBuilder {
    BuffersBuilder::new(buffers, Positions)
}

impl<'l, OutputVertex, OutputIndex, Ctor> GeometryBuilder
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: Add + From<VertexId> + MaxIndex,
{
    fn begin_geometry(&mut self) {
        self.first_vertex = self.buffers.vertices.len() as Index;
        self.first_index = self.buffers.indices.len() as Index;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
        debug_assert!(a != VertexId::INVALID);
        debug_assert!(b != VertexId::INVALID);
        debug_assert!(c != VertexId::INVALID);
        self.buffers.indices.push((a + self.vertex_offset).into());
        self.buffers.indices.push((b + self.vertex_offset).into());
        self.buffers.indices.push((c + self.vertex_offset).into());
    }

    fn abort_geometry(&mut self) {
        self.buffers.vertices.truncate(self.first_vertex as usize);
        self.buffers.indices.truncate(self.first_index as usize);
    }
}

impl<'l, OutputVertex, OutputIndex, Ctor> StrokeGeometryBuilder
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: Add + From<VertexId> + MaxIndex,
    Ctor: StrokeVertexConstructor<OutputVertex>,
{
    fn add_stroke_vertex(&mut self, v: StrokeVertex) -> Result<VertexId, GeometryBuilderError> {
        self.buffers
            .vertices
            .push(self.vertex_constructor.new_vertex(v));
        let len = self.buffers.vertices.len();
        if len > OutputIndex::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        Ok(VertexId((len - 1) as Index))
    }
}

/// A geometry builder that does not output any geometry.
///
/// Mostly useful for testing.
pub struct NoOutput {
    next_vertex: u32,
}

impl NoOutput {
    pub fn new() -> Self {
        NoOutput { next_vertex: 0 }
    }
}

impl Default for NoOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryBuilder for NoOutput {
    fn begin_geometry(&mut self) {
        self.next_vertex = 0;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
    }
}

impl StrokeGeometryBuilder for NoOutput {
    fn add_stroke_vertex(&mut self, _: StrokeVertex) -> Result<VertexId, GeometryBuilderError> {
        if self.next_vertex == u32::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.next_vertex += 1;
        Ok(VertexId(self.next_vertex - 1))
    }
}

/// Provides the maximum value of an index.
///
/// This should be the maximum value representable by the index type up
/// to u32::MAX because the tessellator can't internally represent more
/// than u32::MAX indices.
pub trait MaxIndex {
    const MAX: usize;
}

impl MaxIndex for u16 {
    const MAX: usize = u16::MAX as usize;
}
impl MaxIndex for u32 {
    const MAX: usize = u32::MAX as usize;
}

#[cfg(test)]
use crate::math::point;
#[cfg(test)]
use crate::{Color, PolylineInput, StrokeOptions, StrokeTessellator};

#[test]
fn abort_keeps_previous_geometry() {
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    let mut tessellator = StrokeTessellator::new();

    let input = PolylineInput::Points(vec![point(0.0, 0.0), point(10.0, 0.0)]);
    tessellator
        .tessellate(
            &input,
            &StrokeOptions::default(),
            None,
            &mut simple_builder(&mut buffers),
        )
        .unwrap();
    assert_eq!(buffers.vertices.len(), 4);
    assert_eq!(buffers.indices, vec![0, 1, 2, 0, 2, 3]);

    // Too many vertices for the budget.
    let long_input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(20.0, 0.0),
    ]);
    let options = StrokeOptions::default().with_max_vertices(8);
    let result = tessellator.tessellate(
        &long_input,
        &options,
        None,
        &mut simple_builder(&mut buffers),
    );
    assert!(result.is_err());
    assert_eq!(buffers.vertices.len(), 4);
    assert_eq!(buffers.indices.len(), 6);
}

#[test]
fn vertex_offset() {
    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    let input = PolylineInput::Points(vec![point(0.0, 0.0), point(10.0, 0.0)]);
    StrokeTessellator::new()
        .tessellate(
            &input,
            &StrokeOptions::default(),
            None,
            &mut BuffersBuilder::new(&mut buffers, Positions).with_vertex_offset(10),
        )
        .unwrap();

    assert_eq!(buffers.indices, vec![10, 11, 12, 10, 12, 13]);
}

#[test]
fn no_output() {
    let input = PolylineInput::Points(vec![point(0.0, 0.0), point(10.0, 0.0), point(10.0, 5.0)]);
    let options = StrokeOptions::default().with_color(Color::new(255, 0, 0, 255));
    let mut output = NoOutput::new();
    StrokeTessellator::new()
        .tessellate(&input, &options, None, &mut output)
        .unwrap();
    assert_eq!(output.next_vertex, 12);
}
