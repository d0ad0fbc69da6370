//! Drawing surface abstraction
//!
//! The game only ever fills and strokes axis-aligned rectangles and circles
//! and blits sprites, so that is all a host has to provide.

use glam::DVec2;

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
    pub const HITBOX_FILL: Color = [1.0, 0.0, 0.0, 1.0];
    pub const HITBOX_OUTLINE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const PAUSE_OVERLAY: Color = [0.0, 0.0, 0.0, 0.5];
}

/// A 2D canvas
pub trait RenderSink {
    /// Rectangle with its top-left corner at `origin`
    fn fill_rectangle(&mut self, origin: DVec2, size: DVec2, color: Color);
    fn stroke_rectangle(&mut self, origin: DVec2, size: DVec2, color: Color);
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color);
    fn stroke_circle(&mut self, center: DVec2, radius: f64, color: Color);
    /// Sprite stretched over the rectangle at `origin`
    fn draw_image(&mut self, sprite: &str, origin: DVec2, size: DVec2);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRectangle { origin: DVec2, size: DVec2, color: Color },
    StrokeRectangle { origin: DVec2, size: DVec2, color: Color },
    FillCircle { center: DVec2, radius: f64, color: Color },
    StrokeCircle { center: DVec2, radius: f64, color: Color },
    Image { sprite: String, origin: DVec2, size: DVec2 },
}

/// Sink that records commands for later replay
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Sprites in the order they were drawn
    pub fn sprites(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image { sprite, .. } => Some(sprite.as_str()),
            _ => None,
        })
    }

    /// Replay every recorded command onto another sink
    pub fn replay(&self, sink: &mut impl RenderSink) {
        for command in &self.commands {
            match command {
                DrawCommand::FillRectangle { origin, size, color } => {
                    sink.fill_rectangle(*origin, *size, *color)
                }
                DrawCommand::StrokeRectangle { origin, size, color } => {
                    sink.stroke_rectangle(*origin, *size, *color)
                }
                DrawCommand::FillCircle { center, radius, color } => {
                    sink.fill_circle(*center, *radius, *color)
                }
                DrawCommand::StrokeCircle { center, radius, color } => {
                    sink.stroke_circle(*center, *radius, *color)
                }
                DrawCommand::Image { sprite, origin, size } => {
                    sink.draw_image(sprite, *origin, *size)
                }
            }
        }
    }
}

impl RenderSink for DrawList {
    fn fill_rectangle(&mut self, origin: DVec2, size: DVec2, color: Color) {
        self.commands.push(DrawCommand::FillRectangle { origin, size, color });
    }

    fn stroke_rectangle(&mut self, origin: DVec2, size: DVec2, color: Color) {
        self.commands.push(DrawCommand::StrokeRectangle { origin, size, color });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle { center, radius, color });
    }

    fn draw_image(&mut self, sprite: &str, origin: DVec2, size: DVec2) {
        self.commands.push(DrawCommand::Image {
            sprite: sprite.to_string(),
            origin,
            size,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_copies_commands() {
        let mut list = DrawList::new();
        list.fill_rectangle(DVec2::ZERO, DVec2::new(4.0, 2.0), colors::BACKGROUND);
        list.stroke_circle(DVec2::new(1.0, 1.0), 3.0, colors::HITBOX_OUTLINE);
        list.draw_image("a.png", DVec2::ZERO, DVec2::ONE);

        let mut copy = DrawList::new();
        list.replay(&mut copy);
        assert_eq!(copy.commands(), list.commands());
        assert_eq!(copy.sprites().collect::<Vec<_>>(), vec!["a.png"]);

        copy.clear();
        assert!(copy.is_empty());
    }
}
