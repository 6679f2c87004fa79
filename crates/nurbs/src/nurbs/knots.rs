use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::debug;

use crate::config::DomainPolicy;
use crate::error::CurveError;

/// A non-decreasing sequence of knot values.
///
/// Construction through `From<Vec<f64>>` does not check monotonicity; curves
/// call [`KnotVector::validate`] before accepting one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnotVector(Vec<f64>);

impl KnotVector {
    /// Checked constructor.
    pub fn new(knots: Vec<f64>) -> Result<Self, CurveError> {
        let kv = Self(knots);
        kv.validate()?;
        Ok(kv)
    }

    /// Open-uniform (clamped) knots on `[0, 1]` for `num_control_points`
    /// points: `degree + 1` repeated knots at each end, evenly spaced interior.
    pub fn clamped_uniform(degree: usize, num_control_points: usize) -> Self {
        let interior = num_control_points.saturating_sub(degree + 1);
        let segments = (interior + 1) as f64;
        let mut knots = Vec::with_capacity(num_control_points + degree + 1);
        knots.extend(std::iter::repeat_n(0.0, degree + 1));
        knots.extend((1..=interior).map(|i| i as f64 / segments));
        knots.extend(std::iter::repeat_n(1.0, degree + 1));
        Self(knots)
    }

    /// Uniform knots with unit spacing: `0, 1, 2, ..., n + degree`.
    pub fn uniform(degree: usize, num_control_points: usize) -> Self {
        Self((0..=num_control_points + degree).map(|i| i as f64).collect())
    }

    pub fn validate(&self) -> Result<(), CurveError> {
        for (index, k) in self.0.iter().enumerate() {
            if !k.is_finite() {
                return Err(CurveError::NonFiniteKnot { index });
            }
        }
        if let Some(index) = self.0.windows(2).position(|w| w[1] < w[0]) {
            return Err(CurveError::NonMonotonicKnots { index: index + 1 });
        }
        Ok(())
    }

    /// Checks that also depend on the curve degree: no knot may repeat more
    /// than `degree + 1` times, and the basis domain must be non-empty.
    pub fn validate_for_degree(&self, degree: usize) -> Result<(), CurveError> {
        self.validate()?;

        let max = degree + 1;
        let mut index = 0;
        for run in self.0.chunk_by(|a, b| a == b) {
            if run.len() > max {
                return Err(CurveError::ExcessKnotMultiplicity {
                    index,
                    value: run[0],
                    multiplicity: run.len(),
                    max,
                });
            }
            index += run.len();
        }

        let (min, max) = self.basis_domain(degree);
        if min >= max {
            return Err(CurveError::EmptyBasisDomain { min, max });
        }
        Ok(())
    }

    /// Interval on which `degree`-th order basis functions sum to one:
    /// `[knots[degree], knots[len - degree - 1]]`.
    pub fn basis_domain(&self, degree: usize) -> (f64, f64) {
        (self.0[degree], self.0[self.0.len() - degree - 1])
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for KnotVector {
    fn from(knots: Vec<f64>) -> Self {
        Self(knots)
    }
}

impl From<&[f64]> for KnotVector {
    fn from(knots: &[f64]) -> Self {
        Self(knots.to_vec())
    }
}

impl Deref for KnotVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Linear map from normalized `t` onto the knot range `[knots[start], knots[end]]`.
///
/// `t` is not clamped: values outside `[0, 1]` extrapolate past the range ends.
pub fn map_parameter(knots: &[f64], start: usize, end: usize, t: f64) -> f64 {
    let lo = knots[start];
    let hi = knots[end];
    lo + t * (hi - lo)
}

/// Bring `u` back inside `domain` according to `policy`.
///
/// `active` is the span wrapped over by `DomainPolicy::Wrap`; the result is
/// still clamped to `domain` when the active span reaches past it. A NaN parameter
/// is always rejected since it has no position relative to the domain.
pub fn resolve_parameter(
    u: f64,
    domain: (f64, f64),
    active: (f64, f64),
    policy: DomainPolicy,
) -> Result<f64, CurveError> {
    let (min, max) = domain;
    let out_of_domain = CurveError::ParameterOutOfDomain { u, min, max };

    if u.is_nan() {
        return Err(out_of_domain);
    }

    match policy {
        DomainPolicy::Reject => {
            if u < min || u > max {
                Err(out_of_domain)
            } else {
                Ok(u)
            }
        }
        DomainPolicy::Clamp => {
            if u < min || u > max {
                let clamped = u.clamp(min, max);
                debug!(u, clamped, "clamped parameter to curve domain");
                Ok(clamped)
            } else {
                Ok(u)
            }
        }
        DomainPolicy::Wrap => {
            let (lo, hi) = active;
            if u >= lo && u <= hi {
                return Ok(u.clamp(min, max));
            }
            if !u.is_finite() {
                return Err(out_of_domain);
            }
            let period = hi - lo;
            let wrapped = if period > 0.0 {
                lo + (u - lo).rem_euclid(period)
            } else {
                lo
            };
            let wrapped = wrapped.clamp(min, max);
            debug!(u, wrapped, "wrapped parameter into active span");
            Ok(wrapped)
        }
    }
}
