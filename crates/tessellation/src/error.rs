use thiserror::Error;

/// The stroke tessellator's result type.
pub type TessellationResult = Result<(), TessellationError>;

/// An error that can happen while generating geometry.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryBuilderError {
    #[error("Too many vertices")]
    TooManyVertices,
}

#[non_exhaustive]
#[derive(Error, Copy, Clone, Debug, PartialEq)]
pub enum UnsupportedParameter {
    #[error("Position is not a finite number")]
    PositionIsNotFinite,
    #[error("Line width must be a positive number, got {0}")]
    InvalidLineWidth(f32),
    #[error("Curves must be sampled with at least one segment")]
    NoSegmentsPerCurve,
}

/// The stroke tessellator's error enumeration.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum TessellationError {
    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(#[from] UnsupportedParameter),
    #[error("Geometry builder error: {0}")]
    GeometryBuilder(#[from] GeometryBuilderError),
    #[error("Max vertex count is {max}, the stroke needs more: cannot draw")]
    TooManyVertices { max: u32 },
}
