//! Evaluation settings attached to a curve.

use serde::{Deserialize, Serialize};

/// What to do with a mapped parameter `u` that falls outside the basis domain
/// `[knots[degree], knots[len - degree - 1]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DomainPolicy {
    /// Clamp `u` to the nearest domain boundary.
    #[default]
    Clamp,
    /// Wrap `u` periodically into the active knot span. Intended for closed curves.
    Wrap,
    /// Fail with `CurveError::ParameterOutOfDomain`.
    Reject,
}

/// Tolerance thresholds used during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// First derivatives shorter than this have no tangent direction.
    pub zero_length: f64,
    /// Points closer than this are considered coincident.
    pub coincidence: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            zero_length: crate::geometry::vector::MIN_NORMALIZABLE_LENGTH,
            coincidence: 1e-7,
        }
    }
}

/// Configuration controlling out-of-domain handling and sampling density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    pub domain_policy: DomainPolicy,
    pub tolerance: Tolerance,
    /// Number of chords used for arc-length tables and sampled bounds.
    pub arc_length_divisions: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            domain_policy: DomainPolicy::Clamp,
            tolerance: Tolerance::default(),
            arc_length_divisions: 200,
        }
    }
}

impl EvalConfig {
    /// Out-of-domain parameters are errors.
    pub fn strict() -> Self {
        Self {
            domain_policy: DomainPolicy::Reject,
            ..Self::default()
        }
    }

    /// Parameters wrap around the active span.
    pub fn periodic() -> Self {
        Self {
            domain_policy: DomainPolicy::Wrap,
            ..Self::default()
        }
    }
}
