//! Drawing entities and hitbox overlays onto a [`RenderSink`]

use glam::DVec2;

use super::sink::{Color, RenderSink, colors};
use crate::geom::{Circle, GeometryError, Hitbox, OffsetStack, Rectangle, ShapeVisitor, Vector};
use crate::sim::{Entity, GamePhase, SimError, World};

/// Visitor that fills and outlines every primitive of a hitbox tree
///
/// Nested offsets accumulate, so a `Positioned` inside a `Positioned` is
/// drawn at the sum of both.
pub struct HitboxPainter<'a, S: RenderSink + ?Sized> {
    sink: &'a mut S,
    offsets: OffsetStack,
    fill: Color,
    outline: Color,
}

impl<'a, S: RenderSink + ?Sized> HitboxPainter<'a, S> {
    pub fn new(sink: &'a mut S, origin: Vector) -> Self {
        Self {
            sink,
            offsets: OffsetStack::with_origin(origin),
            fill: colors::HITBOX_FILL,
            outline: colors::HITBOX_OUTLINE,
        }
    }

    fn anchor(&self) -> Result<DVec2, GeometryError> {
        Ok(self.offsets.absolute()?.to_dvec2())
    }
}

impl<S: RenderSink + ?Sized> AsMut<OffsetStack> for HitboxPainter<'_, S> {
    fn as_mut(&mut self) -> &mut OffsetStack {
        &mut self.offsets
    }
}

impl<S: RenderSink + ?Sized> ShapeVisitor for HitboxPainter<'_, S> {
    type Output = Result<(), GeometryError>;

    fn on_rectangle(&mut self, rect: &Rectangle) -> Self::Output {
        let origin = self.anchor()?;
        let size = DVec2::new(rect.width(), rect.height());
        self.sink.fill_rectangle(origin, size, self.fill);
        self.sink.stroke_rectangle(origin, size, self.outline);
        Ok(())
    }

    fn on_circle(&mut self, circle: &Circle) -> Self::Output {
        let center = self.anchor()?;
        self.sink.fill_circle(center, circle.radius(), self.fill);
        self.sink.stroke_circle(center, circle.radius(), self.outline);
        Ok(())
    }

    fn on_positioned(&mut self, offset: &Vector, shape: &Hitbox) -> Self::Output {
        OffsetStack::scoped(self, offset, |painter| shape.accept(painter))
    }

    fn on_group(&mut self, shapes: &[Hitbox]) -> Self::Output {
        shapes.iter().try_for_each(|shape| shape.accept(self))
    }
}

/// Outline `entity`'s hitbox at its position
pub fn draw_hitbox(
    entity: &Entity,
    sink: &mut (impl RenderSink + ?Sized),
) -> Result<(), GeometryError> {
    let (Some(position), Some(hitbox)) = (entity.position, &entity.hitbox) else {
        return Ok(());
    };
    hitbox.accept(&mut HitboxPainter::new(sink, position))
}

/// Draw `entity`'s sprite stretched over its bounding box
///
/// Entities without a position, hitbox or sprite draw nothing.
pub fn draw_entity(
    entity: &Entity,
    sink: &mut (impl RenderSink + ?Sized),
) -> Result<(), GeometryError> {
    let Some(sprite) = entity.sprite.as_deref() else {
        return Ok(());
    };
    let Some(bounds) = entity.bounds()? else {
        return Ok(());
    };
    sink.draw_image(
        sprite,
        DVec2::new(bounds.left, bounds.top),
        DVec2::new(bounds.width(), bounds.height()),
    );
    Ok(())
}

/// Draw a full frame: background, entities in painter's order, pause overlay
pub fn draw_world(world: &World, sink: &mut (impl RenderSink + ?Sized)) -> Result<(), SimError> {
    let arena = DVec2::new(world.settings.arena_width, world.settings.arena_height);
    sink.fill_rectangle(DVec2::ZERO, arena, colors::BACKGROUND);

    for id in world.entities.paint_order() {
        let Some(entity) = world.entities.get(id) else {
            continue;
        };
        if entity.position.is_none() {
            continue;
        }
        if world.settings.show_hitboxes {
            draw_hitbox(entity, sink)?;
        }
        draw_entity(entity, sink)?;
    }

    if world.phase == GamePhase::Paused {
        sink.fill_rectangle(DVec2::ZERO, arena, colors::PAUSE_OVERLAY);
    }
    Ok(())
}
