//! Double-dispatch traversal over hitbox trees
//!
//! `Hitbox::accept` picks the handler for its variant; visitors that care
//! about absolute position keep an [`OffsetStack`] and push/pop around
//! `on_positioned`.

use super::hitbox::{Circle, Hitbox, Rectangle};
use super::{GeometryError, Vector};

/// One handler per hitbox variant
pub trait ShapeVisitor {
    type Output;

    fn on_rectangle(&mut self, rect: &Rectangle) -> Self::Output;
    fn on_circle(&mut self, circle: &Circle) -> Self::Output;
    /// Must push `offset` before visiting `shape` and pop it afterwards on
    /// every path, including errors
    fn on_positioned(&mut self, offset: &Vector, shape: &Hitbox) -> Self::Output;
    fn on_group(&mut self, shapes: &[Hitbox]) -> Self::Output;
}

/// Offsets pushed along the path from the root to the current node
#[derive(Debug, Clone, Default)]
pub struct OffsetStack {
    offsets: Vec<Vector>,
}

impl OffsetStack {
    /// Stack seeded with a base offset (usually an entity's world position)
    pub fn with_origin(origin: Vector) -> Self {
        Self {
            offsets: vec![origin],
        }
    }

    pub fn push(&mut self, offset: Vector) {
        self.offsets.push(offset);
    }

    pub fn pop(&mut self) -> Option<Vector> {
        self.offsets.pop()
    }

    pub fn depth(&self) -> usize {
        self.offsets.len()
    }

    /// Sum of every offset on the stack, as a Cartesian vector
    pub fn absolute(&self) -> Result<Vector, GeometryError> {
        self.offsets
            .iter()
            .try_fold(Vector::ZERO, |acc, offset| acc.add(offset))
    }

    /// Run `visit` with `offset` pushed, popping it again whatever `visit` returns
    pub fn scoped<V, R>(visitor: &mut V, offset: &Vector, visit: impl FnOnce(&mut V) -> R) -> R
    where
        V: AsMut<OffsetStack>,
    {
        visitor.as_mut().push(*offset);
        let result = visit(visitor);
        visitor.as_mut().pop();
        result
    }
}
