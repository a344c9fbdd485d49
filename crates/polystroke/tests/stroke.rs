use polystroke::math::{point, size, vector, Box2D, Point};
use polystroke::path::{QueryError, Smoothing, SmoothingOptions};
use polystroke::tessellation::geometry_builder::{simple_builder, NoOutput};
use polystroke::tessellation::{
    build_mesh, BuffersBuilder, CoordinateSpace, JoinGeometry, LineJoin, LineMode, Mesh,
    PolylineInput, StrokeOptions, StrokeTessellator, StrokeVertex, TessellationError,
    TextureRegion, UnsupportedParameter, UvSets, VertexBuffers, MIN_MITER_JOIN_ANGLE,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_approx_eq(a: Point, b: Point) {
    if (a - b).length() > 1e-4 {
        panic!("{:?} != {:?}", a, b);
    }
}

fn zigzag(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| point(i as f32 * 10.0, (i % 2) as f32 * 10.0))
        .collect()
}

fn straight_line(n: usize) -> Vec<Point> {
    (0..n).map(|i| point(i as f32, 0.0)).collect()
}

/// Two segments meeting at `(100, 0)` with an angle of `degrees` between them.
fn turn(degrees: f32) -> PolylineInput {
    let angle = degrees.to_radians();
    PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(100.0, 0.0),
        point(100.0 - 100.0 * angle.cos(), 100.0 * angle.sin()),
    ])
}

#[test]
fn vertex_count_formula() {
    init_logger();

    for &join in &[LineJoin::Bevel, LineJoin::Miter] {
        for &caps in &[false, true] {
            for n in 2..20 {
                let options = StrokeOptions::default()
                    .with_line_join(join)
                    .with_caps(caps);
                let mesh = build_mesh(&PolylineInput::Points(zigzag(n)), &options, None).unwrap();

                let joins = if n >= 3 { n - 2 } else { 0 };
                let expected = 4 * (n - 1) + 4 * joins + 8 * caps as usize;
                assert_eq!(mesh.vertices.len(), expected);
                assert_eq!(mesh.indices.len(), expected / 4 * 6);
            }
        }
    }
}

#[test]
fn idempotence() {
    let input = PolylineInput::Segments(vec![
        zigzag(7),
        vec![point(0.0, 50.0), point(3.0, 51.0), point(3.0, 51.0), point(9.0, 40.0)],
    ]);
    let options = StrokeOptions::default()
        .with_line_width(3.0)
        .with_line_join(LineJoin::Miter)
        .with_caps(true)
        .with_smoothing(SmoothingOptions::mode(Smoothing::FixedImproved));

    let first = build_mesh(&input, &options, None).unwrap();
    let second = build_mesh(&input, &options, None).unwrap();

    assert_eq!(first.vertices.len(), second.vertices.len());
    for (a, b) in first.vertices.iter().zip(second.vertices.iter()) {
        assert_eq!(a.position().x.to_bits(), b.position().x.to_bits());
        assert_eq!(a.position().y.to_bits(), b.position().y.to_bits());
        assert_eq!(a.uv(), b.uv());
    }
    assert_eq!(first.indices, second.indices);
}

#[test]
fn degenerate_inputs() {
    let options = StrokeOptions::default()
        .with_caps(true)
        .with_line_join(LineJoin::Miter);

    let empty = build_mesh(&PolylineInput::Points(Vec::new()), &options, None).unwrap();
    assert!(empty.is_empty());

    let empty = build_mesh(&PolylineInput::Segments(Vec::new()), &options, None).unwrap();
    assert!(empty.is_empty());

    let single = build_mesh(&PolylineInput::Points(vec![point(1.0, 2.0)]), &options, None);
    assert!(single.unwrap().is_empty());

    let repeated = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(5.0, 5.0),
        point(5.0, 5.0),
        point(5.0, 5.0),
        point(10.0, 0.0),
    ]);
    for &join in &[LineJoin::Bevel, LineJoin::Miter] {
        let mesh = build_mesh(&repeated, &options.with_line_join(join), None).unwrap();
        assert_eq!(mesh.vertices.len(), 4 * 4 + 4 * 3 + 8);
        for vertex in &mesh.vertices {
            assert!(vertex.position().x.is_finite());
            assert!(vertex.position().y.is_finite());
        }
    }
}

#[test]
fn right_angle_miter() {
    let input = PolylineInput::Points(vec![point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)]);
    let options = StrokeOptions::default()
        .with_line_width(2.0)
        .with_line_join(LineJoin::Miter);

    let mesh = build_mesh(&input, &options, None).unwrap();
    assert_eq!(mesh.vertices.len(), 12);

    let first = &mesh.vertices[0..4];
    let second = &mesh.vertices[8..12];

    // Both quads meet at the miter points, half a line width before the corner along
    // each segment.
    assert_eq!(first[2].position(), second[1].position());
    assert_eq!(first[3].position(), second[0].position());
    assert_approx_eq(first[2].position(), point(9.0, 1.0));
    assert_approx_eq(first[3].position(), point(11.0, -1.0));

    // The join quad has no area.
    let join = &mesh.vertices[4..8];
    assert_eq!(join[0].position(), join[3].position());
    assert_eq!(join[1].position(), join[2].position());
}

#[test]
fn miter_angle_threshold() {
    let at_threshold = JoinGeometry {
        angle: MIN_MITER_JOIN_ANGLE,
        sign: 1.0,
        miter_distance: 1.0,
        incoming_length: 100.0,
        outgoing_length: 100.0,
        miter_a: point(0.0, 0.0),
        miter_b: point(0.0, 0.0),
    };
    assert!(!at_threshold.allows_miter());

    let options = StrokeOptions::default().with_line_join(LineJoin::Miter);

    // Just above the threshold the shared corners coincide.
    let mesh = build_mesh(&turn(16.0), &options, None).unwrap();
    assert_eq!(mesh.vertices[2].position(), mesh.vertices[9].position());
    assert_eq!(mesh.vertices[3].position(), mesh.vertices[8].position());

    // Below it the join degrades to a bevel and the quads keep their corners.
    let mesh = build_mesh(&turn(14.0), &options, None).unwrap();
    assert_approx_eq(mesh.vertices[2].position(), point(100.0, 1.0));
    assert_approx_eq(mesh.vertices[3].position(), point(100.0, -1.0));
    assert_ne!(mesh.vertices[2].position(), mesh.vertices[9].position());
}

#[test]
fn overflow() {
    init_logger();

    let options = StrokeOptions::default();

    // 4 * 8000 + 4 * 7999 = 63996 vertices.
    let mesh = build_mesh(&PolylineInput::Points(straight_line(8001)), &options, None).unwrap();
    assert_eq!(mesh.vertices.len(), 63996);

    // 64004 vertices.
    assert_eq!(
        build_mesh(&PolylineInput::Points(straight_line(8002)), &options, None),
        Err(TessellationError::TooManyVertices { max: 64000 })
    );

    // Geometry from previous tessellations is kept, the aborted one is discarded.
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    let mut tessellator = StrokeTessellator::new();
    tessellator
        .tessellate(
            &PolylineInput::Points(straight_line(2)),
            &options,
            None,
            &mut simple_builder(&mut buffers),
        )
        .unwrap();

    let result = tessellator.tessellate(
        &PolylineInput::Points(straight_line(16001)),
        &options,
        None,
        &mut simple_builder(&mut buffers),
    );
    assert!(result.is_err());
    assert_eq!(buffers.vertices.len(), 4);
    assert_eq!(buffers.indices.len(), 6);
}

#[test]
fn pairs() {
    let input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(0.0, 10.0),
        point(0.0, 20.0),
        point(30.0, 30.0),
    ]);
    let options = StrokeOptions::default()
        .with_line_mode(LineMode::Pairs)
        .with_line_join(LineJoin::Miter)
        .with_caps(true);

    let mesh = build_mesh(&input, &options, None).unwrap();

    // Start cap, segment and end cap for each pair, nothing for the trailing point.
    assert_eq!(mesh.vertices.len(), 2 * 3 * 4);
    assert_approx_eq(mesh.vertices[0].position(), point(-1.0, -1.0));
    assert_approx_eq(mesh.vertices[4].position(), point(0.0, -1.0));
    assert_approx_eq(mesh.vertices[22].position(), point(-1.0, 21.0));

    let mut output = NoOutput::new();
    StrokeTessellator::new()
        .tessellate(
            &PolylineInput::Points(vec![point(0.0, 0.0)]),
            &options,
            None,
            &mut output,
        )
        .unwrap();
}

#[test]
fn queries() {
    let input = PolylineInput::Segments(vec![
        vec![point(0.0, 0.0), point(1.0, 0.0)],
        vec![point(2.0, 0.0), point(3.0, 0.0), point(4.0, 0.0)],
    ]);

    assert_eq!(input.position(1, None), Ok(point(0.0, 0.0)));
    assert_eq!(input.position(3, None), Ok(point(2.0, 0.0)));
    assert_eq!(input.position(2, Some(2)), Ok(point(3.0, 0.0)));
    assert_eq!(input.position_in_segment(2, 1), Ok(point(3.0, 0.0)));
    assert_eq!(input.position(0, None), Err(QueryError::ZeroIndex));
    assert_eq!(
        input.position(6, None),
        Err(QueryError::IndexOutOfRange { index: 6, len: 5 })
    );
    assert_eq!(
        input.position(1, Some(3)),
        Err(QueryError::SegmentOutOfRange {
            segment: 3,
            count: 2
        })
    );

    assert_eq!(
        PolylineInput::closest_point(point(0.0, 0.0), point(10.0, 0.0), point(4.0, 3.0)),
        point(4.0, 0.0)
    );
    assert_eq!(
        PolylineInput::closest_point(point(0.0, 0.0), point(10.0, 0.0), point(-4.0, 3.0)),
        point(0.0, 0.0)
    );
    assert_eq!(
        PolylineInput::closest_point(point(2.0, 2.0), point(2.0, 2.0), point(-4.0, 3.0)),
        point(2.0, 2.0)
    );
}

#[test]
fn texture_coordinates() {
    let region = TextureRegion::new(
        Box2D::new(point(0.25, 0.0), point(0.75, 0.5)),
        Box2D::new(point(0.375, 0.0), point(0.625, 0.5)),
    );
    let uvs = UvSets::new(Some(&region));

    let input = PolylineInput::Points(vec![point(0.0, 0.0), point(10.0, 0.0)]);
    let options = StrokeOptions::default().with_caps(true);
    let mesh = build_mesh(&input, &options, Some(&region)).unwrap();
    assert_eq!(mesh.vertices.len(), 12);

    let quad_uvs = |i: usize| -> Vec<Point> {
        mesh.vertices[i * 4..i * 4 + 4]
            .iter()
            .map(|v| v.uv())
            .collect()
    };

    assert_eq!(quad_uvs(0), uvs.start.to_vec());
    assert_eq!(quad_uvs(1), uvs.middle.to_vec());
    assert_eq!(quad_uvs(2), uvs.end.to_vec());
    assert_eq!(uvs.start[0], point(0.25, 0.0));
    assert_eq!(uvs.end[2], point(0.75, 0.5));
}

#[test]
fn normalized_coordinates() {
    let input = PolylineInput::Points(vec![point(0.0, 0.5), point(1.0, 0.5)]);
    let options = StrokeOptions::default()
        .with_line_width(4.0)
        .with_coordinate_space(CoordinateSpace::Normalized {
            size: size(100.0, 50.0),
            pivot: vector(0.5, 0.0),
        });

    let mesh = build_mesh(&input, &options, None).unwrap();

    // The line width is not scaled.
    assert_eq!(mesh.vertices[0].position(), point(-50.0, 23.0));
    assert_eq!(mesh.vertices[1].position(), point(-50.0, 27.0));
    assert_eq!(mesh.vertices[2].position(), point(50.0, 27.0));
}

#[test]
fn smoothing() {
    init_logger();

    let collinear = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(2.0, 0.0),
        point(3.0, 0.0),
    ]);
    let options = StrokeOptions::default()
        .with_smoothing(SmoothingOptions::mode(Smoothing::AdaptiveRecursive));
    let mesh = build_mesh(&collinear, &options, None).unwrap();
    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.vertices[0].position(), point(0.0, -1.0));
    assert_eq!(mesh.vertices[2].position(), point(3.0, 1.0));

    let arch = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(0.0, 100.0),
        point(100.0, 100.0),
        point(100.0, 0.0),
    ]);
    let mesh = build_mesh(&arch, &options, None).unwrap();
    assert!(mesh.vertices.len() > 4 * 8);

    let options = StrokeOptions::default().with_smoothing(
        SmoothingOptions::mode(Smoothing::FixedBasic).with_segments_per_curve(5),
    );
    let mesh = build_mesh(&arch, &options, None).unwrap();
    // 6 points.
    assert_eq!(mesh.vertices.len(), 4 * 5 + 4 * 4);

    // Three points or less are never smoothed.
    let short = PolylineInput::Points(vec![point(0.0, 0.0), point(5.0, 5.0), point(10.0, 0.0)]);
    let mesh = build_mesh(&short, &options, None).unwrap();
    assert_eq!(mesh.vertices.len(), 12);
}

#[test]
fn invalid_parameters() {
    let input = PolylineInput::Points(vec![point(0.0, 0.0), point(f32::NAN, 1.0)]);
    let result = build_mesh(&input, &StrokeOptions::default(), None);
    assert!(matches!(
        result,
        Err(TessellationError::UnsupportedParameter(_))
    ));

    // Infinite coordinates would turn into NaN vertices.
    let input = PolylineInput::Points(vec![
        point(0.0, 0.0),
        point(f32::INFINITY, 0.0),
        point(5.0, 5.0),
    ]);
    let options = StrokeOptions::default().with_line_join(LineJoin::Miter);
    assert_eq!(
        build_mesh(&input, &options, None),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::PositionIsNotFinite
        ))
    );

    let mut options = StrokeOptions::default();
    options.line_width = 0.0;
    let input = PolylineInput::Points(vec![point(0.0, 0.0), point(1.0, 1.0)]);
    assert!(build_mesh(&input, &options, None).is_err());
}

#[test]
fn custom_vertices() {
    #[derive(Copy, Clone, Debug, PartialEq)]
    struct GpuVertex {
        position: [f32; 2],
        uv: [f32; 2],
        color: [u8; 4],
    }

    let input = PolylineInput::Points(zigzag(4));
    let mut buffers: VertexBuffers<GpuVertex, u32> = VertexBuffers::new();
    StrokeTessellator::new()
        .tessellate(
            &input,
            &StrokeOptions::default(),
            None,
            &mut BuffersBuilder::new(&mut buffers, |v: StrokeVertex| GpuVertex {
                position: v.position().to_array(),
                uv: v.uv().to_array(),
                color: v.color().to_array(),
            }),
        )
        .unwrap();

    let mesh: Mesh = build_mesh(&input, &StrokeOptions::default(), None).unwrap();
    assert_eq!(buffers.vertices.len(), mesh.vertices.len());
    assert_eq!(buffers.vertices[0].color, [255, 255, 255, 255]);
    for (a, b) in buffers.indices.iter().zip(mesh.indices.iter()) {
        assert_eq!(*a, *b as u32);
    }
}
