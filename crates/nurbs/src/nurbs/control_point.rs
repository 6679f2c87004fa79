use serde::{Deserialize, Serialize};

use crate::geometry::point::{Point2d, Point3d, Point4d};

/// A weighted control point `(x, y, z, w)`.
///
/// Coordinates are stored unmultiplied; the basis evaluator applies `w` when
/// it forms the homogeneous sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

/// Control point input with two, three or four components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputPoint {
    Xy(Point2d),
    Xyz(Point3d),
    Xyzw(Point4d),
}

impl InputPoint {
    /// Resolve into the canonical weighted form: missing `z` is 0, missing `w` is 1.
    pub fn to_control_point(self) -> ControlPoint {
        match self {
            InputPoint::Xy(p) => ControlPoint::new(p.x, p.y, 0.0, 1.0),
            InputPoint::Xyz(p) => ControlPoint::new(p.x, p.y, p.z, 1.0),
            InputPoint::Xyzw(p) => ControlPoint::new(p.x, p.y, p.z, p.w),
        }
    }
}

impl From<Point2d> for InputPoint {
    fn from(p: Point2d) -> Self {
        InputPoint::Xy(p)
    }
}

impl From<Point3d> for InputPoint {
    fn from(p: Point3d) -> Self {
        InputPoint::Xyz(p)
    }
}

impl From<Point4d> for InputPoint {
    fn from(p: Point4d) -> Self {
        InputPoint::Xyzw(p)
    }
}

impl From<ControlPoint> for InputPoint {
    fn from(p: ControlPoint) -> Self {
        InputPoint::Xyzw(Point4d::new(p.x, p.y, p.z, p.w))
    }
}

impl From<[f64; 2]> for InputPoint {
    fn from(a: [f64; 2]) -> Self {
        InputPoint::Xy(Point2d::new(a[0], a[1]))
    }
}

impl From<[f64; 3]> for InputPoint {
    fn from(a: [f64; 3]) -> Self {
        InputPoint::Xyz(Point3d::from_array(a))
    }
}

impl From<[f64; 4]> for InputPoint {
    fn from(a: [f64; 4]) -> Self {
        InputPoint::Xyzw(Point4d::new(a[0], a[1], a[2], a[3]))
    }
}

/// Convert mixed-dimension input points into weighted control points,
/// preserving count and order.
pub fn normalize_control_points<I, P>(points: I) -> Vec<ControlPoint>
where
    I: IntoIterator<Item = P>,
    P: Into<InputPoint>,
{
    points
        .into_iter()
        .map(|p| p.into().to_control_point())
        .collect()
}
