//! Composable hitbox trees
//!
//! Two primitives (rectangle anchored at its top-left, circle anchored at its
//! centre), an offset wrapper, and an ordered group. Children are owned by
//! their parent, so a tree can never contain a cycle.

use serde::{Deserialize, Serialize};

use super::visitor::ShapeVisitor;
use super::{GeometryError, Vector};

/// Axis-aligned rectangle extending right and down from its anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectangleDims")]
pub struct Rectangle {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RectangleDims {
    width: f64,
    height: f64,
}

impl Rectangle {
    pub fn new(width: f64, height: f64) -> Result<Self, GeometryError> {
        if !(width >= 0.0 && height >= 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(GeometryError::InvalidShape(format!(
                "rectangle dimensions must be finite and non-negative: ({width}, {height})"
            )));
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl TryFrom<RectangleDims> for Rectangle {
    type Error = GeometryError;

    fn try_from(dims: RectangleDims) -> Result<Self, Self::Error> {
        Self::new(dims.width, dims.height)
    }
}

/// Circle anchored at its centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CircleDims")]
pub struct Circle {
    radius: f64,
}

#[derive(Deserialize)]
struct CircleDims {
    radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Result<Self, GeometryError> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(GeometryError::InvalidShape(format!(
                "circle radius must be finite and positive: {radius}"
            )));
        }
        Ok(Self { radius })
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl TryFrom<CircleDims> for Circle {
    type Error = GeometryError;

    fn try_from(dims: CircleDims) -> Result<Self, Self::Error> {
        Self::new(dims.radius)
    }
}

/// A shape tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hitbox {
    Rectangle(Rectangle),
    Circle(Circle),
    /// Nested shape shifted by `offset`; offsets add up along the path to a leaf
    Positioned { offset: Vector, shape: Box<Hitbox> },
    /// Union of shapes sharing the current offset
    Group(Vec<Hitbox>),
}

impl Hitbox {
    /// Rectangle leaf
    pub fn rectangle(width: f64, height: f64) -> Result<Self, GeometryError> {
        Ok(Hitbox::Rectangle(Rectangle::new(width, height)?))
    }

    /// Circle leaf
    pub fn circle(radius: f64) -> Result<Self, GeometryError> {
        Ok(Hitbox::Circle(Circle::new(radius)?))
    }

    /// Wrap `shape` at a Cartesian offset
    pub fn at(x: f64, y: f64, shape: Hitbox) -> Result<Self, GeometryError> {
        Ok(Self::positioned(Vector::cartesian(x, y)?, shape))
    }

    pub fn positioned(offset: Vector, shape: Hitbox) -> Self {
        Hitbox::Positioned {
            offset,
            shape: Box::new(shape),
        }
    }

    pub fn group(shapes: impl IntoIterator<Item = Hitbox>) -> Self {
        Hitbox::Group(shapes.into_iter().collect())
    }

    /// Dispatch to the visitor handler for this variant and return its result
    pub fn accept<V: ShapeVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Hitbox::Rectangle(rect) => visitor.on_rectangle(rect),
            Hitbox::Circle(circle) => visitor.on_circle(circle),
            Hitbox::Positioned { offset, shape } => visitor.on_positioned(offset, shape),
            Hitbox::Group(shapes) => visitor.on_group(shapes),
        }
    }
}

impl From<Rectangle> for Hitbox {
    fn from(rect: Rectangle) -> Self {
        Hitbox::Rectangle(rect)
    }
}

impl From<Circle> for Hitbox {
    fn from(circle: Circle) -> Self {
        Hitbox::Circle(circle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_validation() {
        assert!(Rectangle::new(0.0, 0.0).is_ok());
        assert!(Rectangle::new(-1.0, 5.0).is_err());
        assert!(Rectangle::new(5.0, f64::NAN).is_err());
    }

    #[test]
    fn test_circle_validation() {
        assert!(Circle::new(0.5).is_ok());
        assert!(Circle::new(0.0).is_err());
        assert!(Circle::new(-3.0).is_err());
        assert!(Circle::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_deserialize_tree() {
        let json = r#"{
            "group": [
                {"rectangle": {"width": 10.0, "height": 4.0}},
                {"positioned": {"offset": {"x": 3.0, "y": 2.0}, "shape": {"circle": {"radius": 1.5}}}}
            ]
        }"#;
        let hitbox: Hitbox = serde_json::from_str(json).unwrap();
        let expected = Hitbox::group([
            Hitbox::rectangle(10.0, 4.0).unwrap(),
            Hitbox::at(3.0, 2.0, Hitbox::circle(1.5).unwrap()).unwrap(),
        ]);
        assert_eq!(hitbox, expected);
    }

    #[test]
    fn test_deserialize_rejects_bad_radius() {
        let result: Result<Hitbox, _> = serde_json::from_str(r#"{"circle": {"radius": 0.0}}"#);
        assert!(result.is_err());
    }
}
