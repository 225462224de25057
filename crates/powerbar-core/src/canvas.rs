//! Canvas implementations for rendering.

use crate::draw::{BoxStyle, DrawCommand};
use crate::widget::{Canvas, TextStyle};
use crate::{Color, CornerRadius, Point, Rect};

/// A Canvas implementation that records draw operations as `DrawCommand`s.
///
/// This is useful for:
/// - Testing (verify what was painted)
/// - Serialization (dump frames as JSON)
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    antialiasing: bool,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the recorded commands, clearing the canvas.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Get the number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clear all recorded commands and reset render hints.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.antialiasing = false;
    }

    /// Whether antialiasing was last switched on.
    #[must_use]
    pub const fn antialiasing(&self) -> bool {
        self.antialiasing
    }

    /// Add a raw draw command.
    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::filled_rect(rect, color));
    }

    fn draw_rounded_rect(&mut self, rect: Rect, radius: f32, style: &BoxStyle) {
        self.commands.push(DrawCommand::Rect {
            bounds: rect,
            radius: CornerRadius::uniform(radius),
            style: style.clone(),
        });
    }

    fn draw_ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32, style: &BoxStyle) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            style: style.clone(),
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn set_antialiasing(&mut self, enabled: bool) {
        self.antialiasing = enabled;
    }
}
