pub mod point;
pub mod vector;
pub mod bounds;

pub use bounds::BoundingBox;
pub use point::{Point2d, Point3d, Point4d};
pub use vector::Vec3;
