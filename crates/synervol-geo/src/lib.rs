//! Geofence geometry: turns a selection center plus shape parameters into a
//! geodetically correct boundary ring.

mod boundary;
pub mod geodesy;
mod point;
mod shape;

pub use boundary::{compute_boundary, BoundaryRing, BoundingBox, GeoFence, CIRCLE_STEPS};
pub use point::GeoPoint;
pub use shape::{ShapeKind, ShapeParameters};
