#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Point sources for thick polylines and bézier smoothing.
//!
//! This crate is reexported in [polystroke](../polystroke/index.html).
//!
//! # Examples
//!
//! ```
//! use polystroke_path::math::point;
//! use polystroke_path::{PolylineInput, Smoothing, SmoothingOptions, smooth};
//!
//! let input = PolylineInput::Points(vec![
//!     point(0.0, 0.0),
//!     point(10.0, 10.0),
//!     point(20.0, 0.0),
//!     point(30.0, 10.0),
//! ]);
//!
//! // Positions can be queried with 1-based indices.
//! assert_eq!(input.position(2, None), Ok(point(10.0, 10.0)));
//!
//! let options = SmoothingOptions::DEFAULT.with_mode(Smoothing::FixedImproved);
//! for points in input.point_arrays() {
//!     let smoothed = smooth(points, &options);
//!     assert_eq!(smoothed.len(), 3 * 10 + 1);
//! }
//! ```

pub use polystroke_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod polyline;
pub mod smoothing;

#[doc(inline)]
pub use crate::polyline::{PointArrays, PolylineInput, QueryError};
#[doc(inline)]
pub use crate::smoothing::{smooth, BezierPath, Smoothing, SmoothingOptions};

pub mod math {
    //! f32 version of the polystroke_geom types used everywhere. The other polystroke
    //! crates reexport them.

    use crate::geom::euclid;

    /// Alias for ```euclid::default::Point2D<f32>```.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for ```euclid::default::Vector2D<f32>```.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Alias for ```euclid::default::Size2D<f32>```.
    pub type Size = euclid::default::Size2D<f32>;

    /// Alias for ```euclid::default::Box2D<f32>```
    pub type Box2D = euclid::default::Box2D<f32>;

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Size::new(w, h)`.
    #[inline]
    pub fn size(w: f32, h: f32) -> Size {
        Size::new(w, h)
    }
}
