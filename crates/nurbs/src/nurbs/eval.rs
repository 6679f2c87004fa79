//! Point and tangent evaluation for [`NurbsCurve`].
//!
//! Each call maps `t` onto the active knot span, resolves the result against
//! the basis domain with the curve's `DomainPolicy`, then hands the knot-space
//! parameter to a basis or derivative evaluator. The `*_with` variants take the
//! evaluator explicitly; the others use [`DeBoorEvaluator`].

use tracing::debug;

use super::NurbsCurve;
use super::basis::{BasisEvaluator, DeBoorEvaluator, DerivativeEvaluator, HomogeneousPoint};
use super::knots::{map_parameter, resolve_parameter};
use crate::curve::ParametricCurve;
use crate::error::CurveError;
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;

/// Project `(wx, wy, wz, w)` to Euclidean space.
///
/// A weight of exactly 1.0 is taken as already projected.
pub fn project(h: &HomogeneousPoint) -> Point3d {
    if h.w != 1.0 {
        Point3d::new(h.x / h.w, h.y / h.w, h.z / h.w)
    } else {
        Point3d::new(h.x, h.y, h.z)
    }
}

impl NurbsCurve {
    /// Map normalized `t` onto the active knot span. Not clamped.
    pub fn map_parameter(&self, t: f64) -> f64 {
        map_parameter(&self.knots, self.start_knot, self.end_knot, t)
    }

    /// Map `t` and resolve it against the basis domain.
    pub fn knot_parameter(&self, t: f64) -> Result<f64, CurveError> {
        resolve_parameter(
            self.map_parameter(t),
            self.domain(),
            self.active_range(),
            self.config.domain_policy,
        )
    }

    /// The weighted point `(wx, wy, wz, w)` at `t`, before projection.
    pub fn homogeneous_at_with<E>(&self, evaluator: &E, t: f64) -> Result<HomogeneousPoint, CurveError>
    where
        E: BasisEvaluator + ?Sized,
    {
        let u = self.knot_parameter(t)?;
        Ok(evaluator.evaluate(self.degree, &self.knots, &self.control_points, u))
    }

    pub fn homogeneous_at(&self, t: f64) -> Result<HomogeneousPoint, CurveError> {
        self.homogeneous_at_with(&DeBoorEvaluator, t)
    }

    pub fn point_at_with<E>(&self, evaluator: &E, t: f64) -> Result<Point3d, CurveError>
    where
        E: BasisEvaluator + ?Sized,
    {
        let h = self.homogeneous_at_with(evaluator, t)?;
        Ok(project(&h))
    }

    /// Write the point at `t` into `out`. `out` is untouched on error.
    pub fn point_at_into_with<E>(
        &self,
        evaluator: &E,
        t: f64,
        out: &mut Point3d,
    ) -> Result<(), CurveError>
    where
        E: BasisEvaluator + ?Sized,
    {
        let p = self.point_at_with(evaluator, t)?;
        out.set(p.x, p.y, p.z);
        Ok(())
    }

    /// Euclidean point at `t`.
    pub fn point_at(&self, t: f64) -> Result<Point3d, CurveError> {
        self.point_at_with(&DeBoorEvaluator, t)
    }

    pub fn point_at_into(&self, t: f64, out: &mut Point3d) -> Result<(), CurveError> {
        self.point_at_into_with(&DeBoorEvaluator, t, out)
    }

    /// Unit tangent at `t`.
    ///
    /// Returns `CurveError::DegenerateTangent` when the first derivative is
    /// shorter than `config.tolerance.zero_length`, e.g. at coincident
    /// consecutive control points.
    pub fn tangent_at_with<E>(&self, evaluator: &E, t: f64) -> Result<Vec3, CurveError>
    where
        E: DerivativeEvaluator + ?Sized,
    {
        let u = self.knot_parameter(t)?;
        let ders = evaluator.evaluate_derivatives(self.degree, &self.knots, &self.control_points, u, 1);
        let first = ders.get(1).copied().unwrap_or(Vec3::ZERO);
        match first.normalized_above(self.config.tolerance.zero_length) {
            Some(tangent) => Ok(tangent),
            None => {
                debug!(t, u, length = first.length(), "degenerate tangent");
                Err(CurveError::DegenerateTangent { t, u })
            }
        }
    }

    /// Write the unit tangent at `t` into `out`. `out` is untouched on error.
    pub fn tangent_at_into_with<E>(
        &self,
        evaluator: &E,
        t: f64,
        out: &mut Vec3,
    ) -> Result<(), CurveError>
    where
        E: DerivativeEvaluator + ?Sized,
    {
        let v = self.tangent_at_with(evaluator, t)?;
        out.set(v.x, v.y, v.z);
        Ok(())
    }

    pub fn tangent_at(&self, t: f64) -> Result<Vec3, CurveError> {
        self.tangent_at_with(&DeBoorEvaluator, t)
    }

    pub fn tangent_at_into(&self, t: f64, out: &mut Vec3) -> Result<(), CurveError> {
        self.tangent_at_into_with(&DeBoorEvaluator, t, out)
    }

    /// Derivatives up to `order` with respect to the normalized parameter `t`.
    ///
    /// Index 0 is the point. Index `k` is the knot-space derivative scaled by
    /// `(du/dt)^k`.
    pub fn derivatives_at_with<E>(
        &self,
        evaluator: &E,
        t: f64,
        order: usize,
    ) -> Result<Vec<Vec3>, CurveError>
    where
        E: DerivativeEvaluator + ?Sized,
    {
        let u = self.knot_parameter(t)?;
        let (lo, hi) = self.active_range();
        let scale = hi - lo;
        let mut ders =
            evaluator.evaluate_derivatives(self.degree, &self.knots, &self.control_points, u, order);
        let mut factor = 1.0;
        for d in ders.iter_mut().skip(1) {
            factor *= scale;
            *d = *d * factor;
        }
        Ok(ders)
    }

    pub fn derivatives_at(&self, t: f64, order: usize) -> Result<Vec<Vec3>, CurveError> {
        self.derivatives_at_with(&DeBoorEvaluator, t, order)
    }

    /// Whether `point` coincides with the curve point at `t` within
    /// `config.tolerance.coincidence`.
    pub fn passes_through(&self, point: &Point3d, t: f64) -> bool {
        self.point_on_curve(point, t, self.config.tolerance.coincidence)
    }
}
