//! Single-line text label that can be shown or hidden.

use powerbar_core::{
    widget::{LayoutResult, TextStyle},
    Canvas, Color, Constraints, Event, Rect, Size, TypeId, Widget,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Text label. A hidden label paints nothing and measures to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Text content
    content: String,
    /// Text color
    color: Color,
    /// Font size in pixels
    font_size: f32,
    /// Whether the label is shown
    visible: bool,
    /// Cached bounds
    #[serde(skip)]
    bounds: Rect,
}

impl Label {
    /// Create a visible label.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            color: Color::BLACK,
            font_size: 14.0,
            visible: true,
            bounds: Rect::default(),
        }
    }

    /// Set text color.
    #[must_use]
    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set font size.
    #[must_use]
    pub const fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Get the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the text.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Whether the label is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the label.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    // Simplified: ~0.6 em per character, 1.2 em line height
    fn estimate_size(&self) -> Size {
        Size::new(
            self.content.chars().count() as f32 * self.font_size * 0.6,
            self.font_size * 1.2,
        )
    }
}

impl Widget for Label {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn size_hint(&self) -> Size {
        if self.visible {
            self.estimate_size()
        } else {
            Size::ZERO
        }
    }

    fn measure(&self, constraints: Constraints) -> Size {
        constraints.constrain(self.size_hint())
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        if !self.visible {
            return;
        }
        let style = TextStyle {
            size: self.font_size,
            color: self.color,
        };
        canvas.draw_text(&self.content, self.bounds.origin(), &style);
    }

    fn event(&mut self, _event: &Event) -> Option<Box<dyn Any + Send>> {
        None
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
