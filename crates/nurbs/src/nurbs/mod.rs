pub mod basis;
pub mod control_point;
pub mod eval;
pub mod knots;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::EvalConfig;
use crate::error::CurveError;
use crate::geometry::point::Point3d;

use control_point::{ControlPoint, InputPoint, normalize_control_points};
use knots::KnotVector;

/// A NURBS (Non-Uniform Rational B-Spline) curve in 3D.
///
/// The configuration is validated once and never changes afterwards, so a
/// curve can be shared freely between threads. Evaluation takes a normalized
/// parameter `t` that is mapped onto the active knot span
/// `[knots[start_knot], knots[end_knot]]`. Both points and tangents use that
/// same span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveDescription", into = "CurveDescription")]
pub struct NurbsCurve {
    degree: usize,
    knots: KnotVector,
    control_points: Vec<ControlPoint>,
    start_knot: usize,
    end_knot: usize,
    config: EvalConfig,
}

/// Serialized form of a curve. Loading one goes through the same checks as
/// [`NurbsCurve::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveDescription {
    pub degree: usize,
    pub knots: Vec<f64>,
    pub control_points: Vec<ControlPoint>,
    #[serde(default)]
    pub start_knot: Option<usize>,
    #[serde(default)]
    pub end_knot: Option<usize>,
    #[serde(default)]
    pub config: EvalConfig,
}

impl TryFrom<CurveDescription> for NurbsCurve {
    type Error = CurveError;

    fn try_from(desc: CurveDescription) -> Result<Self, Self::Error> {
        Ok(NurbsCurve::new(
            desc.degree,
            desc.knots,
            desc.control_points,
            desc.start_knot,
            desc.end_knot,
        )?
        .with_config(desc.config))
    }
}

impl From<NurbsCurve> for CurveDescription {
    fn from(curve: NurbsCurve) -> Self {
        Self {
            degree: curve.degree,
            knots: curve.knots.into_vec(),
            control_points: curve.control_points,
            start_knot: Some(curve.start_knot),
            end_knot: Some(curve.end_knot),
            config: curve.config,
        }
    }
}

impl NurbsCurve {
    /// Build a curve from 2-, 3- or 4-component control points.
    ///
    /// `start_knot` / `end_knot` default to `0` and `knots.len() - 1` only
    /// when `None`; `Some(0)` is an explicit index.
    pub fn new<K, I, P>(
        degree: usize,
        knots: K,
        control_points: I,
        start_knot: Option<usize>,
        end_knot: Option<usize>,
    ) -> Result<Self, CurveError>
    where
        K: Into<KnotVector>,
        I: IntoIterator<Item = P>,
        P: Into<InputPoint>,
    {
        Self::from_parts(
            degree,
            knots.into(),
            normalize_control_points(control_points),
            start_knot,
            end_knot,
        )
    }

    #[instrument(
        skip(knots, control_points),
        fields(num_control_points = control_points.len(), num_knots = knots.len())
    )]
    fn from_parts(
        degree: usize,
        knots: KnotVector,
        control_points: Vec<ControlPoint>,
        start_knot: Option<usize>,
        end_knot: Option<usize>,
    ) -> Result<Self, CurveError> {
        let result = Self::validate(degree, &knots, &control_points, start_knot, end_knot);
        let (start_knot, end_knot) = match result {
            Ok(range) => range,
            Err(err) => {
                warn!(%err, "rejected NURBS curve configuration");
                return Err(err);
            }
        };

        debug!(start_knot, end_knot, "constructed NURBS curve");
        Ok(Self {
            degree,
            knots,
            control_points,
            start_knot,
            end_knot,
            config: EvalConfig::default(),
        })
    }

    /// Non-rational B-spline over the full knot range.
    pub fn bspline(
        degree: usize,
        control_points: Vec<Point3d>,
        knots: Vec<f64>,
    ) -> Result<Self, CurveError> {
        Self::new(degree, knots, control_points, None, None)
    }

    /// Rational curve from 3D points and one weight per point.
    pub fn rational(
        degree: usize,
        control_points: Vec<Point3d>,
        weights: Vec<f64>,
        knots: Vec<f64>,
    ) -> Result<Self, CurveError> {
        if weights.len() != control_points.len() {
            return Err(CurveError::WeightCountMismatch {
                expected: control_points.len(),
                actual: weights.len(),
            });
        }
        let weighted = control_points
            .iter()
            .zip(&weights)
            .map(|(p, w)| ControlPoint::new(p.x, p.y, p.z, *w));
        Self::new(degree, knots, weighted, None, None)
    }

    /// Closed periodic curve through the control polygon `points`.
    ///
    /// The first `degree` points are repeated at the end and a uniform knot
    /// vector is used; the active span hides the wrap-around spans so
    /// `t = 0` and `t = 1` meet with `C^(degree-1)` continuity.
    pub fn closed<P: Into<InputPoint>>(degree: usize, points: Vec<P>) -> Result<Self, CurveError> {
        if degree == 0 {
            return Err(CurveError::InvalidDegree { degree });
        }
        if points.len() <= degree {
            return Err(CurveError::TooFewControlPoints {
                degree,
                required: degree + 1,
                actual: points.len(),
            });
        }
        let mut cps = normalize_control_points(points);
        let wrap = cps[..degree].to_vec();
        cps.extend(wrap);

        let knots = KnotVector::uniform(degree, cps.len());
        let end_knot = knots.len() - 1 - degree;
        Ok(Self::new(degree, knots, cps, Some(degree), Some(end_knot))?
            .with_config(EvalConfig::periodic()))
    }

    /// Replace the evaluation settings.
    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    fn validate(
        degree: usize,
        knots: &KnotVector,
        control_points: &[ControlPoint],
        start_knot: Option<usize>,
        end_knot: Option<usize>,
    ) -> Result<(usize, usize), CurveError> {
        if degree == 0 {
            return Err(CurveError::InvalidDegree { degree });
        }
        if control_points.len() <= degree {
            return Err(CurveError::TooFewControlPoints {
                degree,
                required: degree + 1,
                actual: control_points.len(),
            });
        }
        let expected = control_points.len() + degree + 1;
        if knots.len() != expected {
            return Err(CurveError::KnotCountMismatch {
                expected,
                actual: knots.len(),
            });
        }
        knots.validate_for_degree(degree)?;

        for (index, cp) in control_points.iter().enumerate() {
            if !(cp.x.is_finite() && cp.y.is_finite() && cp.z.is_finite()) {
                return Err(CurveError::NonFiniteCoordinate { index });
            }
            if !cp.w.is_finite() || cp.w <= 0.0 {
                return Err(CurveError::InvalidWeight {
                    index,
                    weight: cp.w,
                });
            }
        }

        let start = start_knot.unwrap_or(0);
        let end = end_knot.unwrap_or(knots.len() - 1);
        if start >= end || end > knots.len() - 1 {
            return Err(CurveError::InvalidKnotRange {
                start,
                end,
                len: knots.len(),
            });
        }
        Ok((start, end))
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.control_points
    }

    pub fn start_knot(&self) -> usize {
        self.start_knot
    }

    pub fn end_knot(&self) -> usize {
        self.end_knot
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Knot values bounding the active span: `(knots[start_knot], knots[end_knot])`.
    pub fn active_range(&self) -> (f64, f64) {
        (self.knots[self.start_knot], self.knots[self.end_knot])
    }

    /// Range of `u` the basis is defined on.
    pub fn domain(&self) -> (f64, f64) {
        self.knots.basis_domain(self.degree)
    }

    /// True when any weight differs from 1.
    pub fn is_rational(&self) -> bool {
        self.control_points.iter().any(|cp| cp.w != 1.0)
    }
}
