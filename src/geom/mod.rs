//! Geometry layer
//!
//! Vectors with a Cartesian/Polar dual representation, composable hitbox trees,
//! and the visitors that flatten and bound them. Nothing here knows about
//! entities or the frame loop.

pub mod bounds;
pub mod flatten;
pub mod hitbox;
pub mod vector;
pub mod visitor;

pub use bounds::{BoundingBoxCalculator, Bounds};
pub use flatten::{Component, ComponentFlattener, Primitive};
pub use hitbox::{Circle, Hitbox, Rectangle};
pub use vector::Vector;
pub use visitor::{OffsetStack, ShapeVisitor};

/// Geometry construction errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A vector component was NaN or infinite
    #[error("invalid vector components: ({0}, {1})")]
    InvalidVector(f64, f64),

    /// Negative rectangle dimensions, non-positive radius, empty bounds
    #[error("invalid shape: {0}")]
    InvalidShape(String),
}
