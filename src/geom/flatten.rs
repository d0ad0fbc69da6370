//! Flattening hitbox trees into absolutely positioned primitives

use super::hitbox::{Circle, Hitbox, Rectangle};
use super::visitor::{OffsetStack, ShapeVisitor};
use super::{GeometryError, Vector};

/// A leaf shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Rectangle(Rectangle),
    Circle(Circle),
}

/// A primitive at an absolute position
///
/// Rectangles are anchored at their top-left corner, circles at their centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub position: Vector,
    pub shape: Primitive,
}

impl Component {
    /// Back to a one-leaf hitbox tree
    pub fn to_hitbox(&self) -> Hitbox {
        let leaf = match self.shape {
            Primitive::Rectangle(rect) => Hitbox::Rectangle(rect),
            Primitive::Circle(circle) => Hitbox::Circle(circle),
        };
        Hitbox::positioned(self.position, leaf)
    }
}

/// Visitor producing the flat component list of a tree, in traversal order
#[derive(Debug, Default)]
pub struct ComponentFlattener {
    offsets: OffsetStack,
}

impl ComponentFlattener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten `hitbox` as if it were placed at `origin`
    pub fn flatten_at(origin: Vector, hitbox: &Hitbox) -> Result<Vec<Component>, GeometryError> {
        let mut flattener = Self {
            offsets: OffsetStack::with_origin(origin),
        };
        hitbox.accept(&mut flattener)
    }

    fn leaf(&self, shape: Primitive) -> Result<Vec<Component>, GeometryError> {
        let position = self.offsets.absolute()?;
        Ok(vec![Component { position, shape }])
    }
}

impl AsMut<OffsetStack> for ComponentFlattener {
    fn as_mut(&mut self) -> &mut OffsetStack {
        &mut self.offsets
    }
}

impl ShapeVisitor for ComponentFlattener {
    type Output = Result<Vec<Component>, GeometryError>;

    fn on_rectangle(&mut self, rect: &Rectangle) -> Self::Output {
        self.leaf(Primitive::Rectangle(*rect))
    }

    fn on_circle(&mut self, circle: &Circle) -> Self::Output {
        self.leaf(Primitive::Circle(*circle))
    }

    fn on_positioned(&mut self, offset: &Vector, shape: &Hitbox) -> Self::Output {
        OffsetStack::scoped(self, offset, |flattener| shape.accept(flattener))
    }

    fn on_group(&mut self, shapes: &[Hitbox]) -> Self::Output {
        let mut output = Vec::with_capacity(shapes.len());
        for shape in shapes {
            output.extend(shape.accept(self)?);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(c: &Component) -> (f64, f64) {
        (c.position.x(), c.position.y())
    }

    #[test]
    fn test_flatten_group_preserves_order() {
        let tree = Hitbox::group([
            Hitbox::at(5.0, 5.0, Hitbox::rectangle(10.0, 10.0).unwrap()).unwrap(),
            Hitbox::at(20.0, 20.0, Hitbox::circle(3.0).unwrap()).unwrap(),
        ]);
        let components = tree.accept(&mut ComponentFlattener::new()).unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(pos(&components[0]), (5.0, 5.0));
        assert!(matches!(components[0].shape, Primitive::Rectangle(_)));
        assert_eq!(pos(&components[1]), (20.0, 20.0));
        assert!(matches!(components[1].shape, Primitive::Circle(c) if c.radius() == 3.0));
    }

    #[test]
    fn test_nested_offsets_accumulate() {
        let tree = Hitbox::at(
            1.0,
            2.0,
            Hitbox::group([
                Hitbox::rectangle(1.0, 1.0).unwrap(),
                Hitbox::at(10.0, 0.0, Hitbox::circle(1.0).unwrap()).unwrap(),
            ]),
        )
        .unwrap();
        let origin = Vector::cartesian(100.0, 100.0).unwrap();
        let components = ComponentFlattener::flatten_at(origin, &tree).unwrap();
        assert_eq!(pos(&components[0]), (101.0, 102.0));
        assert_eq!(pos(&components[1]), (111.0, 102.0));
    }

    #[test]
    fn test_empty_group_flattens_to_nothing() {
        let components = Hitbox::Group(Vec::new()).accept(&mut ComponentFlattener::new()).unwrap();
        assert!(components.is_empty());
    }

    #[test]
    fn test_polar_offsets_resolve_to_cartesian() {
        let offset = Vector::polar(2.0, std::f64::consts::FRAC_PI_2).unwrap();
        let tree = Hitbox::positioned(offset, Hitbox::circle(1.0).unwrap());
        let components = tree.accept(&mut ComponentFlattener::new()).unwrap();
        assert!(components[0].position.x().abs() < 1e-12);
        assert!((components[0].position.y() - 2.0).abs() < 1e-12);
    }
}
