use thiserror::Error;

/// Failures raised while constructing or evaluating a NURBS curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("Curve degree must be at least 1 (got {degree})")]
    InvalidDegree { degree: usize },

    #[error("Degree {degree} curve needs at least {required} control points, got {actual}")]
    TooFewControlPoints {
        degree: usize,
        required: usize,
        actual: usize,
    },

    #[error("Expected {expected} weights (one per control point), got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },

    #[error("Knot vector length must be n + p + 1 = {expected}, got {actual}")]
    KnotCountMismatch { expected: usize, actual: usize },

    #[error("Knot {index} is not finite")]
    NonFiniteKnot { index: usize },

    #[error("Knot vector decreases at index {index}")]
    NonMonotonicKnots { index: usize },

    #[error("Knot {value} at index {index} repeats {multiplicity} times (at most {max} allowed)")]
    ExcessKnotMultiplicity {
        index: usize,
        value: f64,
        multiplicity: usize,
        max: usize,
    },

    #[error("Basis domain [{min}, {max}] is empty")]
    EmptyBasisDomain { min: f64, max: f64 },

    #[error("Active knot range [{start}, {end}] is invalid for {len} knots")]
    InvalidKnotRange { start: usize, end: usize, len: usize },

    #[error("Control point {index} has invalid weight {weight} (must be finite and > 0)")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("Control point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("Parameter u = {u} lies outside the curve domain [{min}, {max}]")]
    ParameterOutOfDomain { u: f64, min: f64, max: f64 },

    #[error("Tangent is undefined at t = {t} (u = {u}): first derivative has zero length")]
    DegenerateTangent { t: f64, u: f64 },

    #[error("Sampling requires at least one division")]
    EmptySampling,
}
