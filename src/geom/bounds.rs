//! Axis-aligned bounding boxes of hitbox trees

use glam::DVec2;

use super::hitbox::{Circle, Hitbox, Rectangle};
use super::visitor::{OffsetStack, ShapeVisitor};
use super::{GeometryError, Vector};

/// Running extrema in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    fn around(min: DVec2, max: DVec2) -> Self {
        Self {
            left: min.x,
            right: max.x,
            top: min.y,
            bottom: max.y,
        }
    }

    fn extend(&mut self, min: DVec2, max: DVec2) {
        self.left = self.left.min(min.x);
        self.right = self.right.max(max.x);
        self.top = self.top.min(min.y);
        self.bottom = self.bottom.max(max.y);
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// The box as `Positioned { offset: (left, top), shape: Rectangle }`
    pub fn to_hitbox(&self) -> Result<Hitbox, GeometryError> {
        Hitbox::at(
            self.left,
            self.top,
            Hitbox::rectangle(self.width(), self.height())?,
        )
    }
}

/// Visitor accumulating the smallest box enclosing everything visited
///
/// Extrema are shared across the whole traversal and seeded by the first
/// primitive, so every handler can report the box seen so far.
#[derive(Debug, Default)]
pub struct BoundingBoxCalculator {
    offsets: OffsetStack,
    bounds: Option<Bounds>,
}

impl BoundingBoxCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds of `hitbox` placed at `origin`, `None` when it has no primitives
    pub fn bounds_at(origin: Vector, hitbox: &Hitbox) -> Result<Option<Bounds>, GeometryError> {
        let mut calculator = Self {
            offsets: OffsetStack::with_origin(origin),
            bounds: None,
        };
        hitbox.accept(&mut calculator)?;
        Ok(calculator.bounds)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    fn include(&mut self, min: DVec2, max: DVec2) -> <Self as ShapeVisitor>::Output {
        self.bounds = Some(match self.bounds {
            Some(mut bounds) => {
                bounds.extend(min, max);
                bounds
            }
            None => Bounds::around(min, max),
        });
        self.current()
    }

    fn current(&self) -> <Self as ShapeVisitor>::Output {
        self.bounds.as_ref().map(Bounds::to_hitbox).transpose()
    }
}

impl AsMut<OffsetStack> for BoundingBoxCalculator {
    fn as_mut(&mut self) -> &mut OffsetStack {
        &mut self.offsets
    }
}

impl ShapeVisitor for BoundingBoxCalculator {
    type Output = Result<Option<Hitbox>, GeometryError>;

    fn on_rectangle(&mut self, rect: &Rectangle) -> Self::Output {
        let corner = self.offsets.absolute()?.to_dvec2();
        self.include(corner, corner + DVec2::new(rect.width(), rect.height()))
    }

    fn on_circle(&mut self, circle: &Circle) -> Self::Output {
        let center = self.offsets.absolute()?.to_dvec2();
        let r = DVec2::splat(circle.radius());
        self.include(center - r, center + r)
    }

    fn on_positioned(&mut self, offset: &Vector, shape: &Hitbox) -> Self::Output {
        OffsetStack::scoped(self, offset, |calculator| shape.accept(calculator))?;
        self.current()
    }

    fn on_group(&mut self, shapes: &[Hitbox]) -> Self::Output {
        for shape in shapes {
            shape.accept(self)?;
        }
        self.current()
    }
}
