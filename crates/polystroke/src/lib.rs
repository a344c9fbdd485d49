#![deny(bare_trait_objects)]

//! Textured meshes for thick polylines.
//!
//! # Crates
//!
//! This meta-crate (`polystroke`) reexports the following sub-crates for convenience:
//!
//! * **polystroke_tessellation** - Quads, joins, texture coordinates and the stroke tessellator.
//! * **polystroke_path** - Point sources, position queries and bézier smoothing.
//! * **polystroke_geom** - Line segment and cubic bézier math.
//!
//! Each `polystroke_<name>` crate is reexported as a `<name>` module in `polystroke`. For example:
//!
//! ```ignore
//! extern crate polystroke_tessellation;
//! use polystroke_tessellation::StrokeTessellator;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate polystroke;
//! use polystroke::tessellation::StrokeTessellator;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! # Examples
//!
//! ## Stroking a smoothed polyline
//!
//! ```
//! use polystroke::math::point;
//! use polystroke::path::{Smoothing, SmoothingOptions};
//! use polystroke::tessellation::{
//!     build_mesh, LineJoin, PolylineInput, StrokeOptions, TextureRegion,
//! };
//!
//! let input = PolylineInput::Points(vec![
//!     point(0.0, 0.0),
//!     point(40.0, 30.0),
//!     point(80.0, 0.0),
//!     point(120.0, 30.0),
//! ]);
//!
//! let options = StrokeOptions::default()
//!     .with_line_width(4.0)
//!     .with_line_join(LineJoin::Miter)
//!     .with_caps(true)
//!     .with_smoothing(
//!         SmoothingOptions::mode(Smoothing::FixedImproved).with_segments_per_curve(8)
//!     );
//!
//! let mesh = build_mesh(&input, &options, Some(&TextureRegion::default())).unwrap();
//!
//! // 25 points: 24 segments, 23 joins and two caps.
//! assert_eq!(mesh.vertices.len(), 4 * (24 + 23 + 2));
//! ```

pub extern crate polystroke_tessellation;

pub use polystroke_tessellation as tessellation;
pub use tessellation::geom;
pub use tessellation::path;

pub use path::math;
