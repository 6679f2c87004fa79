pub mod config;
pub mod curve;
pub mod error;
pub mod geometry;
pub mod nurbs;

// Re-export the evaluation surface at crate root for convenience.
pub use config::{DomainPolicy, EvalConfig, Tolerance};
pub use curve::ParametricCurve;
pub use error::CurveError;
pub use geometry::{BoundingBox, Point2d, Point3d, Point4d, Vec3};
pub use nurbs::basis::{BasisEvaluator, DeBoorEvaluator, DerivativeEvaluator, HomogeneousPoint};
pub use nurbs::control_point::{ControlPoint, InputPoint, normalize_control_points};
pub use nurbs::knots::KnotVector;
pub use nurbs::{CurveDescription, NurbsCurve};

