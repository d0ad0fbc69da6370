//! Rendering module
//!
//! Backend-agnostic: hosts implement [`RenderSink`] for their canvas, or
//! record into a [`DrawList`] and replay it.

pub mod painter;
pub mod sink;

pub use painter::{HitboxPainter, draw_entity, draw_hitbox, draw_world};
pub use sink::{Color, DrawCommand, DrawList, RenderSink, colors};
