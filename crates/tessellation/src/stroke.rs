use crate::geometry_builder::{BuffersBuilder, StrokeGeometryBuilder, VertexBuffers};
use crate::join::resolve_join;
use crate::math::Point;
use crate::path::smoothing::smooth;
use crate::quad::{CapPosition, Quad, QuadBuilder, StrokeVertex};
use crate::uv::{TextureRegion, UvSets};
use crate::{
    LineMode, PolylineInput, Smoothing, StrokeOptions, TessellationError, TessellationResult,
    UnsupportedParameter,
};

/// Vertex and index buffers of a stroke, with 16 bits indices.
pub type Mesh = VertexBuffers<StrokeVertex, u16>;

/// A Context object that can tessellate thick polylines.
///
/// ## Overview
///
/// Each segment of the polyline is turned into a quad of the width of the line. The
/// corners shared by consecutive quads are adjusted to form miter or bevel joins, and an
/// extra quad fills the gap on the outside of each corner. Since quads are simply laid
/// next to each other, a polyline that overlaps itself produces overlapping triangles.
///
/// The tessellator takes a [`PolylineInput`](enum.PolylineInput.html) and
/// [`StrokeOptions`](struct.StrokeOptions.html) as inputs, and produces its outputs using
/// a [`StrokeGeometryBuilder`](geometry_builder/trait.StrokeGeometryBuilder.html).
///
/// See the [`geometry_builder` module documentation](geometry_builder/index.html)
/// for more details about how to output custom vertex layouts.
///
/// The tessellator keeps scratch buffers that are reused from one tessellation to the
/// next. Every tessellation recomputes the whole geometry.
///
/// # Examples
///
/// ```
/// # extern crate polystroke_tessellation as tess;
/// # use tess::math::*;
/// # use tess::geometry_builder::{VertexBuffers, simple_builder};
/// # use tess::*;
/// # fn main() {
/// let input = PolylineInput::Points(vec![
///     point(0.0, 0.0),
///     point(1.0, 2.0),
///     point(2.0, 0.0),
///     point(1.0, 1.0),
/// ]);
///
/// // Create the destination vertex and index buffers.
/// let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
///
/// {
///     // Create the destination vertex and index buffers.
///     let mut vertex_builder = simple_builder(&mut buffers);
///
///     // Create the tessellator.
///     let mut tessellator = StrokeTessellator::new();
///
///     // Compute the tessellation.
///     tessellator.tessellate(
///         &input,
///         &StrokeOptions::default().with_line_width(0.2),
///         None,
///         &mut vertex_builder
///     ).unwrap();
/// }
///
/// // Three segments and two joins.
/// println!("The generated vertices are: {:?}.", &buffers.vertices[..]);
/// println!("The generated indices are: {:?}.", &buffers.indices[..]);
/// assert_eq!(buffers.vertices.len(), 20);
///
/// # }
/// ```
#[derive(Default)]
pub struct StrokeTessellator {
    points: Vec<Point>,
    quads: Vec<Quad>,
    joins: Vec<Quad>,
}

impl StrokeTessellator {
    pub fn new() -> Self {
        StrokeTessellator {
            points: Vec::new(),
            quads: Vec::new(),
            joins: Vec::new(),
        }
    }

    /// Compute the tessellation of every point array of the input.
    ///
    /// `texture` selects the region of the stroke texture, the unit square split in its
    /// middle is used if there is none.
    ///
    /// If the geometry needs more than `options.max_vertices` vertices, the tessellation
    /// is aborted: the output is restored to its state before the call and an error is
    /// returned.
    pub fn tessellate(
        &mut self,
        input: &PolylineInput,
        options: &StrokeOptions,
        texture: Option<&TextureRegion>,
        output: &mut dyn StrokeGeometryBuilder,
    ) -> TessellationResult {
        validate(input, options)?;

        let uvs = UvSets::new(texture);
        let quads = QuadBuilder::new(options.line_width, options.color, &uvs);

        output.begin_geometry();

        let result = self.tessellate_arrays(input, options, &quads, output);

        match result {
            Ok(()) => {
                output.end_geometry();
                Ok(())
            }
            Err(e) => {
                output.abort_geometry();
                Err(e)
            }
        }
    }

    fn tessellate_arrays(
        &mut self,
        input: &PolylineInput,
        options: &StrokeOptions,
        quads: &QuadBuilder,
        output: &mut dyn StrokeGeometryBuilder,
    ) -> TessellationResult {
        let mut emitter = QuadEmitter {
            output,
            vertex_count: 0,
            max_vertices: options.max_vertices,
        };

        for points in input.point_arrays() {
            let smoothed = smooth(points, &options.smoothing);

            self.points.clear();
            self.points.extend(
                smoothed
                    .iter()
                    .map(|p| options.coordinate_space.to_local(*p)),
            );

            match options.line_mode {
                LineMode::Continuous => self.stroke_continuous(options, quads, &mut emitter)?,
                LineMode::Pairs => self.stroke_pairs(options, quads, &mut emitter)?,
            }
        }

        Ok(())
    }

    fn stroke_continuous(
        &mut self,
        options: &StrokeOptions,
        builder: &QuadBuilder,
        emitter: &mut QuadEmitter,
    ) -> TessellationResult {
        let StrokeTessellator {
            points,
            quads,
            joins,
        } = self;

        quads.clear();
        joins.clear();

        let n = points.len();
        if n < 2 {
            return Ok(());
        }

        for segment in points.windows(2) {
            quads.push(builder.segment(segment[0], segment[1]));
        }

        for i in 1..quads.len() {
            let (before, after) = quads.split_at_mut(i);
            let join = resolve_join(
                &mut before[i - 1],
                &mut after[0],
                options.line_width,
                options.line_join,
            );
            joins.push(join.quad);
        }

        if options.caps {
            emitter.emit(&builder.cap(points[0], points[1], CapPosition::Start))?;
        }

        for (i, quad) in quads.iter().enumerate() {
            emitter.emit(quad)?;
            if let Some(join) = joins.get(i) {
                emitter.emit(join)?;
            }
        }

        if options.caps {
            emitter.emit(&builder.cap(points[n - 2], points[n - 1], CapPosition::End))?;
        }

        Ok(())
    }

    fn stroke_pairs(
        &self,
        options: &StrokeOptions,
        builder: &QuadBuilder,
        emitter: &mut QuadEmitter,
    ) -> TessellationResult {
        for pair in self.points.chunks_exact(2) {
            let (start, end) = (pair[0], pair[1]);

            if options.caps {
                emitter.emit(&builder.cap(start, end, CapPosition::Start))?;
            }

            emitter.emit(&builder.segment(start, end))?;

            if options.caps {
                emitter.emit(&builder.cap(start, end, CapPosition::End))?;
            }
        }

        Ok(())
    }
}

/// Builds the stroke of `input` into a new mesh.
pub fn build_mesh(
    input: &PolylineInput,
    options: &StrokeOptions,
    texture: Option<&TextureRegion>,
) -> Result<Mesh, TessellationError> {
    let mut mesh = Mesh::new();
    StrokeTessellator::new().tessellate(
        input,
        options,
        texture,
        &mut BuffersBuilder::new(&mut mesh, |vertex: StrokeVertex| vertex),
    )?;

    Ok(mesh)
}

fn validate(input: &PolylineInput, options: &StrokeOptions) -> TessellationResult {
    if !(options.line_width > 0.0 && options.line_width.is_finite()) {
        return Err(UnsupportedParameter::InvalidLineWidth(options.line_width).into());
    }

    let fixed_sampling = matches!(
        options.smoothing.mode,
        Smoothing::FixedBasic | Smoothing::FixedImproved
    );
    if fixed_sampling && options.smoothing.segments_per_curve == 0 {
        return Err(UnsupportedParameter::NoSegmentsPerCurve.into());
    }

    for points in input.point_arrays() {
        if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(UnsupportedParameter::PositionIsNotFinite.into());
        }
    }

    Ok(())
}

/// Submits quads to the output, keeping track of the vertex budget.
struct QuadEmitter<'l> {
    output: &'l mut dyn StrokeGeometryBuilder,
    vertex_count: u32,
    max_vertices: u32,
}

impl<'l> QuadEmitter<'l> {
    fn emit(&mut self, quad: &Quad) -> TessellationResult {
        let vertex_count = self.vertex_count.saturating_add(4);
        if vertex_count > self.max_vertices {
            log::error!(
                "Max vertex count is {}, the stroke needs more: cannot draw",
                self.max_vertices
            );
            return Err(TessellationError::TooManyVertices {
                max: self.max_vertices,
            });
        }
        self.vertex_count = vertex_count;

        let a = self.output.add_stroke_vertex(quad.vertices[0])?;
        let b = self.output.add_stroke_vertex(quad.vertices[1])?;
        let c = self.output.add_stroke_vertex(quad.vertices[2])?;
        let d = self.output.add_stroke_vertex(quad.vertices[3])?;

        self.output.add_triangle(a, b, c);
        self.output.add_triangle(a, c, d);

        Ok(())
    }
}

#[cfg(test)]
use crate::geometry_builder::NoOutput;
#[cfg(test)]
use crate::math::point;
#[cfg(test)]
use crate::{LineJoin, QuadKind, SmoothingOptions};

#[cfg(test)]
fn quad_kinds(mesh: &Mesh, uvs: &UvSets) -> Vec<QuadKind> {
    // Join quads copy their corners, so the first texture coordinate of a join is the
    // one of corner 2 of the previous segment.
    mesh.vertices
        .chunks(4)
        .map(|quad| {
            if quad[0].uv() == uvs.start[0] && quad[1].uv() == uvs.start[1] {
                QuadKind::Start
            } else if quad[0].uv() == uvs.end[0] && quad[2].uv() == uvs.end[2] {
                QuadKind::End
            } else if quad[0].uv() == uvs.middle[2] {
                QuadKind::Join
            } else {
                QuadKind::Middle
            }
        })
        .collect()
}

#[test]
fn vertex_count() {
    fn count(n: usize, caps: bool) -> usize {
        let points = (0..n)
            .map(|i| point(i as f32 * 10.0, (i % 2) as f32 * 10.0))
            .collect();
        let options = StrokeOptions::default().with_caps(caps);
        let mesh = build_mesh(&PolylineInput::Points(points), &options, None).unwrap();
        assert_eq!(mesh.indices.len(), mesh.vertices.len() / 4 * 6);
        mesh.vertices.len()
    }

    assert_eq!(count(0, false), 0);
    assert_eq!(count(1, false), 0);
    assert_eq!(count(1, true), 0);
    assert_eq!(count(2, false), 4);
    assert_eq!(count(2, true), 12);
    assert_eq!(count(3, false), 12);
    assert_eq!(count(5, false), 4 * 4 + 4 * 3);
    assert_eq!(count(5, true), 4 * 4 + 4 * 3 + 8);
}

#[test]
fn emission_order() {
    let uvs = UvSets::default();
    let input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
        point(20.0, 10.0),
    ]);
    let options = StrokeOptions::default().with_caps(true);
    let mesh = build_mesh(&input, &options, None).unwrap();

    assert_eq!(
        quad_kinds(&mesh, &uvs),
        vec![
            QuadKind::Start,
            QuadKind::Middle,
            QuadKind::Join,
            QuadKind::Middle,
            QuadKind::Join,
            QuadKind::Middle,
            QuadKind::End,
        ]
    );

    // Two triangles per quad, indexing the quad's own vertices.
    for (i, triangles) in mesh.indices.chunks(6).enumerate() {
        let base = (i * 4) as u16;
        assert_eq!(
            triangles,
            &[base, base + 1, base + 2, base, base + 2, base + 3]
        );
    }
}

#[test]
fn miter_joins_share_corners() {
    let input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
    ]);
    let options = StrokeOptions::default().with_line_join(LineJoin::Miter);
    let mesh = build_mesh(&input, &options, None).unwrap();
    assert_eq!(mesh.vertices.len(), 12);

    let first = &mesh.vertices[0..4];
    let join = &mesh.vertices[4..8];
    let second = &mesh.vertices[8..12];

    assert_eq!(first[2].position(), second[1].position());
    assert_eq!(first[3].position(), second[0].position());
    assert_eq!(join[0].position(), first[2].position());
    assert_eq!(join[1].position(), first[3].position());
    assert_eq!(join[2].position(), second[0].position());
    assert_eq!(join[3].position(), second[1].position());
}

#[test]
fn pairs() {
    let input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(50.0, 50.0),
    ]);

    let options = StrokeOptions::default().with_line_mode(LineMode::Pairs);
    let mesh = build_mesh(&input, &options, None).unwrap();
    assert_eq!(mesh.vertices.len(), 8);
    assert_eq!(mesh.vertices[4].position(), point(0.0, 9.0));

    // The trailing point gets no caps either.
    let mesh = build_mesh(&input, &options.with_caps(true), None).unwrap();
    assert_eq!(mesh.vertices.len(), 24);

    let single = PolylineInput::Points(vec![point(0.0, 0.0)]);
    let mesh = build_mesh(&single, &options.with_caps(true), None).unwrap();
    assert!(mesh.is_empty());
}

#[test]
fn multiple_arrays() {
    let input = PolylineInput::Segments(vec![
        vec![point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
        vec![],
        vec![point(5.0, 5.0)],
        vec![point(0.0, 20.0), point(10.0, 20.0)],
    ]);
    let mesh = build_mesh(&input, &StrokeOptions::default(), None).unwrap();

    // No join between the arrays.
    assert_eq!(mesh.vertices.len(), 12 + 4);
    assert_eq!(mesh.vertices[12].position(), point(0.0, 19.0));
}

#[test]
fn degenerate_segments() {
    let input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 0.0),
    ]);
    let options = StrokeOptions::default()
        .with_caps(true)
        .with_line_join(LineJoin::Miter);
    let mesh = build_mesh(&input, &options, None).unwrap();

    assert_eq!(mesh.vertices.len(), 4 * 3 + 4 * 2 + 8);
    for vertex in &mesh.vertices {
        assert!(vertex.position().x.is_finite());
        assert!(vertex.position().y.is_finite());
    }
}

#[test]
fn too_many_vertices() {
    let input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(20.0, 5.0),
    ]);

    // Exactly enough.
    let options = StrokeOptions::default().with_max_vertices(12);
    assert!(build_mesh(&input, &options, None).is_ok());

    let options = StrokeOptions::default().with_max_vertices(11);
    assert_eq!(
        build_mesh(&input, &options, None),
        Err(TessellationError::TooManyVertices { max: 11 })
    );

    // The budget applies to the whole input, not to each array.
    let input = PolylineInput::Segments(vec![
        vec![point(0.0, 0.0), point(10.0, 0.0)],
        vec![point(0.0, 10.0), point(10.0, 10.0)],
    ]);
    let options = StrokeOptions::default().with_max_vertices(4);
    assert!(build_mesh(&input, &options, None).is_err());
}

#[test]
fn invalid_parameters() {
    let input = PolylineInput::Points(vec![point(0.0, 0.0), point(10.0, 0.0)]);
    let mut output = NoOutput::new();
    let mut tessellator = StrokeTessellator::new();

    let mut options = StrokeOptions::default();
    options.line_width = -1.0;
    assert_eq!(
        tessellator.tessellate(&input, &options, None, &mut output),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::InvalidLineWidth(-1.0)
        ))
    );

    options.line_width = f32::INFINITY;
    assert!(tessellator
        .tessellate(&input, &options, None, &mut output)
        .is_err());

    let nan_input = PolylineInput::Points(vec![point(0.0, 0.0), point(f32::NAN, 0.0)]);
    assert_eq!(
        tessellator.tessellate(&nan_input, &StrokeOptions::default(), None, &mut output),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::PositionIsNotFinite
        ))
    );

    let infinite_input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(f32::INFINITY, 0.0),
        point(5.0, 5.0),
    ]);
    let miter = StrokeOptions::default().with_line_join(LineJoin::Miter);
    assert_eq!(
        tessellator.tessellate(&infinite_input, &miter, None, &mut output),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::PositionIsNotFinite
        ))
    );

    let infinite_input = PolylineInput::Segments(vec![
        vec![point(0.0, 0.0), point(1.0, 0.0)],
        vec![point(0.0, f32::NEG_INFINITY), point(1.0, 0.0)],
    ]);
    assert!(build_mesh(&infinite_input, &miter, None).is_err());

    let mut smoothing = SmoothingOptions::mode(Smoothing::FixedBasic);
    smoothing.segments_per_curve = 0;
    let options = StrokeOptions::default().with_smoothing(smoothing);
    assert_eq!(
        tessellator.tessellate(&input, &options, None, &mut output),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::NoSegmentsPerCurve
        ))
    );
}

#[test]
fn smoothing() {
    let input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(10.0, 10.0),
        point(20.0, 0.0),
        point(30.0, 10.0),
    ]);
    let options = StrokeOptions::default()
        .with_smoothing(SmoothingOptions::mode(Smoothing::FixedImproved));
    let mesh = build_mesh(&input, &options, None).unwrap();

    // 31 points.
    assert_eq!(mesh.vertices.len(), 4 * 30 + 4 * 29);
    let first = mesh.vertices[0].position();
    assert!(((first - point(0.0, 0.0)).length() - 1.0).abs() < 1e-4);
}

#[test]
fn reuse() {
    let input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
        point(0.0, 10.0),
    ]);
    let options = StrokeOptions::default()
        .with_caps(true)
        .with_line_join(LineJoin::Miter);

    let mut tessellator = StrokeTessellator::new();
    let mut first = Mesh::new();
    let mut second = Mesh::new();
    tessellator
        .tessellate(
            &input,
            &options,
            None,
            &mut BuffersBuilder::new(&mut first, |v: StrokeVertex| v),
        )
        .unwrap();
    tessellator
        .tessellate(
            &input,
            &options,
            None,
            &mut BuffersBuilder::new(&mut second, |v: StrokeVertex| v),
        )
        .unwrap();

    assert_eq!(first, second);
}
