//! B-spline basis evaluation backing the curve evaluator.
//!
//! The curve only talks to the two traits here. `DeBoorEvaluator` is the
//! built-in implementation: knot span lookup by binary search, the triangular
//! basis recurrence, and basis derivatives from the `ndu` table.
//!
//! All functions assume a validated configuration: `knots.len() ==
//! control_points.len() + degree + 1` and `control_points.len() > degree`.

use nalgebra::{DMatrix, Vector4};

use super::control_point::ControlPoint;
use crate::geometry::vector::Vec3;

/// Weighted point `(Σ N·w·x, Σ N·w·y, Σ N·w·z, Σ N·w)`.
pub type HomogeneousPoint = Vector4<f64>;

/// Evaluates the homogeneous curve point at a knot-space parameter.
pub trait BasisEvaluator {
    fn evaluate(
        &self,
        degree: usize,
        knots: &[f64],
        control_points: &[ControlPoint],
        u: f64,
    ) -> HomogeneousPoint;
}

/// Evaluates Euclidean curve derivatives at a knot-space parameter.
pub trait DerivativeEvaluator {
    /// Returns `order + 1` vectors; index `k` is the k-th derivative of the
    /// rational curve with respect to `u` (index 0 is the point itself).
    fn evaluate_derivatives(
        &self,
        degree: usize,
        knots: &[f64],
        control_points: &[ControlPoint],
        u: f64,
        order: usize,
    ) -> Vec<Vec3>;
}

/// Default basis and derivative evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeBoorEvaluator;

impl BasisEvaluator for DeBoorEvaluator {
    fn evaluate(
        &self,
        degree: usize,
        knots: &[f64],
        control_points: &[ControlPoint],
        u: f64,
    ) -> HomogeneousPoint {
        let span = find_span(degree, knots, u);
        let basis = basis_functions(knots, span, u, degree);

        let mut h = HomogeneousPoint::zeros();
        for (i, n) in basis.iter().enumerate() {
            h += weighted(&control_points[span - degree + i]) * *n;
        }
        h
    }
}

impl DerivativeEvaluator for DeBoorEvaluator {
    fn evaluate_derivatives(
        &self,
        degree: usize,
        knots: &[f64],
        control_points: &[ControlPoint],
        u: f64,
        order: usize,
    ) -> Vec<Vec3> {
        let homogeneous = homogeneous_derivatives(degree, knots, control_points, u, order);
        rational_derivatives(&homogeneous)
    }
}

fn weighted(cp: &ControlPoint) -> HomogeneousPoint {
    HomogeneousPoint::new(cp.x * cp.w, cp.y * cp.w, cp.z * cp.w, cp.w)
}

/// Index `i` of the knot span with `knots[i] <= u < knots[i + 1]`, restricted
/// to `[degree, n]`. Parameters past either end resolve to the nearest
/// non-empty boundary span.
pub fn find_span(degree: usize, knots: &[f64], u: f64) -> usize {
    let n = knots.len() - degree - 2;
    let p = degree;

    if u >= knots[n + 1] {
        let mut span = n;
        while span > p && knots[span] >= knots[span + 1] {
            span -= 1;
        }
        return span;
    }
    if u <= knots[p] {
        let mut span = p;
        while span < n && knots[span] >= knots[span + 1] {
            span += 1;
        }
        return span;
    }

    let mut low = p;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// The `degree + 1` non-zero basis functions on `span`.
pub fn basis_functions(knots: &[f64], span: usize, u: f64, degree: usize) -> Vec<f64> {
    let p = degree;
    let mut n_vals = vec![0.0; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];

    n_vals[0] = 1.0;
    for j in 1..=p {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = n_vals[r] / (right[r + 1] + left[j - r]);
            n_vals[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n_vals[j] = saved;
    }
    n_vals
}

/// Basis functions and their derivatives up to order `n` (`n <= degree`).
///
/// Row `k` holds the k-th derivatives of the `degree + 1` functions on `span`.
pub fn basis_function_derivatives(
    knots: &[f64],
    span: usize,
    u: f64,
    degree: usize,
    n: usize,
) -> DMatrix<f64> {
    let p = degree;
    let n = n.min(p);

    // Upper triangle: basis functions. Lower triangle: knot differences.
    let mut ndu = DMatrix::<f64>::zeros(p + 1, p + 1);
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];
    ndu[(0, 0)] = 1.0;
    for j in 1..=p {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            ndu[(j, r)] = right[r + 1] + left[j - r];
            let temp = ndu[(r, j - 1)] / ndu[(j, r)];
            ndu[(r, j)] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[(j, j)] = saved;
    }

    let mut ders = DMatrix::<f64>::zeros(n + 1, p + 1);
    for j in 0..=p {
        ders[(0, j)] = ndu[(j, p)];
    }

    // Two alternating rows of coefficients.
    let mut a = DMatrix::<f64>::zeros(2, p + 1);
    for r in 0..=p {
        let mut s1 = 0;
        let mut s2 = 1;
        a[(0, 0)] = 1.0;
        for k in 1..=n {
            let mut d = 0.0;
            let rk = r as isize - k as isize;
            let pk = p - k;
            if rk >= 0 {
                a[(s2, 0)] = a[(s1, 0)] / ndu[(pk + 1, rk as usize)];
                d = a[(s2, 0)] * ndu[(rk as usize, pk)];
            }
            let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
            let j2 = if r <= pk + 1 { k - 1 } else { p - r };
            for j in j1..=j2 {
                let row = (rk + j as isize) as usize;
                a[(s2, j)] = (a[(s1, j)] - a[(s1, j - 1)]) / ndu[(pk + 1, row)];
                d += a[(s2, j)] * ndu[(row, pk)];
            }
            if r <= pk {
                a[(s2, k)] = -a[(s1, k - 1)] / ndu[(pk + 1, r)];
                d += a[(s2, k)] * ndu[(r, pk)];
            }
            ders[(k, r)] = d;
            std::mem::swap(&mut s1, &mut s2);
        }
    }

    let mut factor = p as f64;
    for k in 1..=n {
        for j in 0..=p {
            ders[(k, j)] *= factor;
        }
        factor *= (p - k) as f64;
    }
    ders
}

/// Derivatives of the homogeneous curve up to `order`. Entries above the
/// degree are zero.
pub fn homogeneous_derivatives(
    degree: usize,
    knots: &[f64],
    control_points: &[ControlPoint],
    u: f64,
    order: usize,
) -> Vec<HomogeneousPoint> {
    let span = find_span(degree, knots, u);
    let ders = basis_function_derivatives(knots, span, u, degree, order);

    let mut out = vec![HomogeneousPoint::zeros(); order + 1];
    for (k, slot) in out.iter_mut().enumerate().take(ders.nrows()) {
        for j in 0..=degree {
            *slot += weighted(&control_points[span - degree + j]) * ders[(k, j)];
        }
    }
    out
}

/// Apply the quotient rule to homogeneous derivatives:
/// `C(k) = (A(k) - sum_{i=1..k} binom(k, i) * w(i) * C(k - i)) / w(0)`.
pub fn rational_derivatives(homogeneous: &[HomogeneousPoint]) -> Vec<Vec3> {
    let mut ck: Vec<Vec3> = Vec::with_capacity(homogeneous.len());
    let Some(w0) = homogeneous.first().map(|h| h.w) else {
        return ck;
    };
    for (k, h) in homogeneous.iter().enumerate() {
        let mut v = Vec3::new(h.x, h.y, h.z);
        for i in 1..=k {
            v = v - ck[k - i] * (binomial(k, i) * homogeneous[i].w);
        }
        ck.push(v / w0);
    }
    ck
}

fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(points: &[[f64; 3]]) -> Vec<ControlPoint> {
        points
            .iter()
            .map(|p| ControlPoint::new(p[0], p[1], p[2], 1.0))
            .collect()
    }

    #[test]
    fn test_find_span() {
        let knots = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0];
        assert_eq!(find_span(2, &knots, 0.0), 2);
        assert_eq!(find_span(2, &knots, 0.5), 2);
        assert_eq!(find_span(2, &knots, 1.0), 3);
        assert_eq!(find_span(2, &knots, 2.5), 4);
        assert_eq!(find_span(2, &knots, 3.0), 4);
    }

    #[test]
    fn test_find_span_skips_empty_boundary_spans() {
        // Domain [1, 2]; spans 1 and 3 have zero length.
        let knots = [0.0, 1.0, 1.0, 2.0, 2.0];
        assert_eq!(find_span(1, &knots, 1.0), 2);
        assert_eq!(find_span(1, &knots, 0.5), 2);
        assert_eq!(find_span(1, &knots, 2.0), 2);
        for u in [1.0, 1.5, 2.0] {
            let basis = basis_functions(&knots, find_span(1, &knots, u), u, 1);
            assert!(basis.iter().all(|b| b.is_finite()), "basis at u={} is {:?}", u, basis);
            assert!((basis.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_basis_partition_of_unity() {
        let knots = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0];
        for i in 0..=30 {
            let u = i as f64 * 0.1;
            let span = find_span(2, &knots, u);
            let sum: f64 = basis_functions(&knots, span, u, 2).iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "sum at u={} is {}", u, sum);
        }
    }

    #[test]
    fn test_basis_derivative_row_zero_matches_basis() {
        let knots = [0.0, 0.0, 0.0, 0.0, 0.4, 1.0, 1.0, 1.0, 1.0];
        let u = 0.25;
        let span = find_span(3, &knots, u);
        let plain = basis_functions(&knots, span, u, 3);
        let ders = basis_function_derivatives(&knots, span, u, 3, 2);
        for j in 0..=3 {
            assert!((ders[(0, j)] - plain[j]).abs() < 1e-12);
        }
        // Derivatives of a partition of unity sum to zero.
        for k in 1..=2 {
            let s: f64 = (0..=3).map(|j| ders[(k, j)]).sum();
            assert!(s.abs() < 1e-9, "row {} sums to {}", k, s);
        }
    }

    #[test]
    fn test_basis_derivative_order_capped_at_degree() {
        let knots = [0.0, 0.0, 1.0, 1.0];
        let ders = basis_function_derivatives(&knots, 1, 0.5, 1, 4);
        assert_eq!(ders.nrows(), 2);
        assert!((ders[(1, 0)] + 1.0).abs() < 1e-12);
        assert!((ders[(1, 1)] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_quadratic_bezier_point_and_derivatives() {
        // C(u) = (1-u)^2 P0 + 2u(1-u) P1 + u^2 P2
        let cps = unit(&[[0.0, 0.0, 0.0], [5.0, 10.0, 0.0], [10.0, 0.0, 0.0]]);
        let knots = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let h = DeBoorEvaluator.evaluate(2, &knots, &cps, 0.5);
        assert!((h.x - 5.0).abs() < 1e-12);
        assert!((h.y - 5.0).abs() < 1e-12);
        assert!((h.w - 1.0).abs() < 1e-12);

        let d = DeBoorEvaluator.evaluate_derivatives(2, &knots, &cps, 0.25, 3);
        assert_eq!(d.len(), 4);
        // C'(u) = 2(1-u)(P1-P0) + 2u(P2-P1)
        assert!((d[1].x - 10.0).abs() < 1e-9);
        assert!((d[1].y - 10.0).abs() < 1e-9);
        // C''(u) = 2(P2 - 2P1 + P0)
        assert!(d[2].x.abs() < 1e-9);
        assert!((d[2].y + 40.0).abs() < 1e-9);
        assert!(d[3].length() < 1e-9);
    }

    #[test]
    fn test_rational_quarter_circle_derivative() {
        let w = std::f64::consts::FRAC_1_SQRT_2;
        let cps = vec![
            ControlPoint::new(1.0, 0.0, 0.0, 1.0),
            ControlPoint::new(1.0, 1.0, 0.0, w),
            ControlPoint::new(0.0, 1.0, 0.0, 1.0),
        ];
        let knots = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        for i in 0..=10 {
            let u = i as f64 / 10.0;
            let d = DeBoorEvaluator.evaluate_derivatives(2, &knots, &cps, u, 1);
            let radius = Vec3::new(d[0].x, d[0].y, d[0].z);
            assert!((radius.length() - 1.0).abs() < 1e-12);
            // Tangent of a circle is perpendicular to its radius.
            assert!(radius.dot(&d[1]).abs() < 1e-9, "u={}", u);
        }
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(4, 0), 1.0);
        assert_eq!(binomial(4, 2), 6.0);
        assert_eq!(binomial(5, 5), 1.0);
        assert_eq!(binomial(6, 3), 20.0);
    }
}
