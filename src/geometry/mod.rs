//! Procedural geometry primitives: bounds, meshes, splines and tubes.

pub mod aabb;
pub mod mesh;
pub mod spline;
pub mod tube;

pub use aabb::{Aabb, Axis};
pub use mesh::{LiquidVertex, MeshData};
pub use spline::SmoothCurve;
pub use tube::sweep_tube;
