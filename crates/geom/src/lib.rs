#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::many_single_char_names)]
#![no_std]

//! Simple 2D geometric primitives on top of euclid.
//!
//! This crate is reexported in [polystroke](../polystroke/index.html).
//!
//! # Overview.
//!
//! This crate implements the maths needed to turn a polyline into a thick stroke:
//!
//! - line segments (perpendicular offsets, projections),
//! - cubic bézier curves (uniform sampling and adaptive subdivision),
//! - a few vector helpers that stay well defined on degenerate input.
//!
//! # Sampling curves
//!
//! Curves are approximated with a succession of points. Two strategies are available:
//!
//! - [`CubicBezierSegment::for_each_uniform_sample`] evaluates the curve at evenly spaced
//!   parameter values. The number of points only depends on the requested step count.
//! - [`CubicBezierSegment::for_each_subdivided`] recursively bisects the curve and only keeps
//!   a midpoint where the curve bends, which yields fewer points on straight-ish stretches
//!   and concentrates them around sharp bends.
//!
//! Both report the points after the start of the curve, so that consecutive curves sharing an
//! endpoint can be chained without duplicating it.

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod cubic_bezier;
mod line;
pub mod utils;

#[doc(inline)]
pub use crate::cubic_bezier::{CubicBezierSegment, SubdivisionParameters};
#[doc(inline)]
pub use crate::line::LineSegment;

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use num_traits::{Float, FloatConst, NumCast};

    use core::fmt::{Debug, Display};
    use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float
        + NumCast
        + FloatConst
        + Sized
        + Display
        + Debug
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
    {
        const HALF: Self;
        const ZERO: Self;
        const ONE: Self;
        const TWO: Self;
        const THREE: Self;
        const FOUR: Self;
        const NINE: Self;

        /// Below this magnitude lengths and angles are treated as degenerate.
        const EPSILON: Self;

        fn value(v: f32) -> Self;
    }

    impl Scalar for f32 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const NINE: Self = 9.0;

        const EPSILON: Self = 1e-6;

        #[inline]
        fn value(v: f32) -> Self {
            v
        }
    }

    impl Scalar for f64 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const NINE: Self = 9.0;

        const EPSILON: Self = 1e-12;

        #[inline]
        fn value(v: f32) -> Self {
            v as f64
        }
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// Alias for `euclid::default::Size2D`.
pub use euclid::default::Size2D as Size;

/// Alias for `euclid::default::Box2D`
pub use euclid::default::Box2D;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}

/// Shorthand for `Size::new(x, y)`.
#[inline]
pub fn size<S>(w: S, h: S) -> Size<S> {
    Size::new(w, h)
}
