//! The host parametric-curve capability.
//!
//! A curve type supplies `point_at` and `tangent_at` over the normalized
//! parameter `t ∈ [0, 1]`. Sampling, arc-length reparameterization and bounds
//! are provided on top of those two operations.

use crate::error::CurveError;
use crate::geometry::bounds::BoundingBox;
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::nurbs::NurbsCurve;

pub trait ParametricCurve {
    /// Point on the curve at normalized parameter `t`.
    fn point_at(&self, t: f64) -> Result<Point3d, CurveError>;

    /// Unit tangent at normalized parameter `t`.
    fn tangent_at(&self, t: f64) -> Result<Vec3, CurveError>;

    /// Chord count used by `length` and the arc-length mapping.
    fn arc_length_divisions(&self) -> usize {
        200
    }

    /// `divisions + 1` points at evenly spaced parameters, endpoints included.
    fn points(&self, divisions: usize) -> Result<Vec<Point3d>, CurveError> {
        if divisions == 0 {
            return Err(CurveError::EmptySampling);
        }
        (0..=divisions)
            .map(|i| self.point_at(i as f64 / divisions as f64))
            .collect()
    }

    /// Cumulative chord lengths at `divisions + 1` evenly spaced parameters,
    /// starting at 0.
    fn cumulative_lengths(&self, divisions: usize) -> Result<Vec<f64>, CurveError> {
        let points = self.points(divisions)?;
        let mut lengths = Vec::with_capacity(points.len());
        let mut sum = 0.0;
        lengths.push(sum);
        for pair in points.windows(2) {
            sum += pair[0].distance_to(&pair[1]);
            lengths.push(sum);
        }
        Ok(lengths)
    }

    /// Approximate arc length.
    fn length(&self) -> Result<f64, CurveError> {
        let lengths = self.cumulative_lengths(self.arc_length_divisions())?;
        Ok(lengths.last().copied().unwrap_or(0.0))
    }

    /// Parameter `t` at which the curve has covered `fraction` of its length.
    fn arc_to_param(&self, fraction: f64) -> Result<f64, CurveError> {
        let lengths = self.cumulative_lengths(self.arc_length_divisions())?;
        Ok(param_from_lengths(&lengths, fraction))
    }

    fn point_at_arc(&self, fraction: f64) -> Result<Point3d, CurveError> {
        let t = self.arc_to_param(fraction)?;
        self.point_at(t)
    }

    fn tangent_at_arc(&self, fraction: f64) -> Result<Vec3, CurveError> {
        let t = self.arc_to_param(fraction)?;
        self.tangent_at(t)
    }

    /// `divisions + 1` points equally spaced by arc length.
    fn spaced_points(&self, divisions: usize) -> Result<Vec<Point3d>, CurveError> {
        if divisions == 0 {
            return Err(CurveError::EmptySampling);
        }
        let lengths = self.cumulative_lengths(self.arc_length_divisions())?;
        (0..=divisions)
            .map(|i| self.point_at(param_from_lengths(&lengths, i as f64 / divisions as f64)))
            .collect()
    }

    /// Box around `divisions + 1` sampled points. Rational curves can bulge
    /// between samples, so this is an estimate rather than a hull.
    fn bounding_box(&self, divisions: usize) -> Result<BoundingBox, CurveError> {
        Ok(BoundingBox::from_points(&self.points(divisions)?))
    }

    /// Whether `point` lies within `tolerance` of the curve point at `t`.
    fn point_on_curve(&self, point: &Point3d, t: f64, tolerance: f64) -> bool {
        self.point_at(t)
            .map(|p| point.distance_to(&p) < tolerance)
            .unwrap_or(false)
    }
}

/// Invert a cumulative length table: the parameter at which `fraction`
/// (clamped to `[0, 1]`) of the total length is reached.
pub fn param_from_lengths(lengths: &[f64], fraction: f64) -> f64 {
    let divisions = lengths.len().saturating_sub(1);
    let total = lengths.last().copied().unwrap_or(0.0);
    let fraction = fraction.clamp(0.0, 1.0);
    if divisions == 0 || total <= 0.0 {
        return fraction;
    }

    let target = fraction * total;
    let i = lengths.partition_point(|&l| l <= target).saturating_sub(1);
    if i >= divisions {
        return 1.0;
    }
    let segment = lengths[i + 1] - lengths[i];
    let local = if segment > 0.0 {
        (target - lengths[i]) / segment
    } else {
        0.0
    };
    (i as f64 + local) / divisions as f64
}

impl ParametricCurve for NurbsCurve {
    fn point_at(&self, t: f64) -> Result<Point3d, CurveError> {
        NurbsCurve::point_at(self, t)
    }

    fn tangent_at(&self, t: f64) -> Result<Vec3, CurveError> {
        NurbsCurve::tangent_at(self, t)
    }

    fn arc_length_divisions(&self) -> usize {
        self.config().arc_length_divisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `p(t) = (t², 0, 0)`: uneven speed, so arc length and parameter differ.
    struct Quadratic;

    impl ParametricCurve for Quadratic {
        fn point_at(&self, t: f64) -> Result<Point3d, CurveError> {
            Ok(Point3d::new(t * t, 0.0, 0.0))
        }

        fn tangent_at(&self, _t: f64) -> Result<Vec3, CurveError> {
            Ok(Vec3::X)
        }

        fn arc_length_divisions(&self) -> usize {
            1000
        }
    }

    #[test]
    fn test_points_include_endpoints() {
        let pts = Quadratic.points(4).unwrap();
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], Point3d::ORIGIN);
        assert_eq!(pts[4], Point3d::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_zero_divisions_rejected() {
        assert_eq!(Quadratic.points(0), Err(CurveError::EmptySampling));
        assert_eq!(Quadratic.spaced_points(0), Err(CurveError::EmptySampling));
    }

    #[test]
    fn test_length() {
        assert!((Quadratic.length().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_arc_to_param_inverts_speed() {
        // Half the length is reached at t = sqrt(0.5).
        let t = Quadratic.arc_to_param(0.5).unwrap();
        assert!((t - 0.5_f64.sqrt()).abs() < 1e-3, "t = {}", t);
        assert_eq!(Quadratic.arc_to_param(0.0).unwrap(), 0.0);
        assert_eq!(Quadratic.arc_to_param(1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_spaced_points_are_evenly_spaced() {
        let pts = Quadratic.spaced_points(4).unwrap();
        for (i, p) in pts.iter().enumerate() {
            assert!((p.x - i as f64 / 4.0).abs() < 1e-3, "point {} at {}", i, p.x);
        }
    }

    #[test]
    fn test_param_from_lengths_degenerate_table() {
        assert_eq!(param_from_lengths(&[0.0, 0.0, 0.0], 0.4), 0.4);
        assert_eq!(param_from_lengths(&[], 0.4), 0.4);
        assert_eq!(param_from_lengths(&[0.0, 1.0, 2.0], 1.7), 1.0);
    }

    #[test]
    fn test_bounding_box_and_point_on_curve() {
        let bb = Quadratic.bounding_box(8).unwrap();
        assert_eq!(bb.min, Point3d::ORIGIN);
        assert_eq!(bb.max, Point3d::new(1.0, 0.0, 0.0));
        assert!(Quadratic.point_on_curve(&Point3d::new(0.25, 0.0, 0.0), 0.5, 1e-10));
        assert!(!Quadratic.point_on_curve(&Point3d::new(0.25, 1.0, 0.0), 0.5, 1e-10));
    }

    #[test]
    fn test_nurbs_curve_through_trait_object() {
        let c = NurbsCurve::bspline(
            1,
            vec![Point3d::ORIGIN, Point3d::new(3.0, 4.0, 0.0)],
            vec![0.0, 0.0, 1.0, 1.0],
        )
        .unwrap();
        let host: &dyn ParametricCurve = &c;
        assert!((host.length().unwrap() - 5.0).abs() < 1e-9);
        let p = host.point_at_arc(0.5).unwrap();
        assert!(p.distance_to(&Point3d::new(1.5, 2.0, 0.0)) < 1e-9);
        assert_eq!(host.arc_length_divisions(), 200);
    }
}
