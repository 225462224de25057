//! Widget trait and related types.
//!
//! Widgets follow a measure-layout-paint cycle:
//!
//! 1. **Measure**: Compute the desired size from the size hint and constraints
//! 2. **Layout**: Position self and children within allocated bounds
//! 3. **Paint**: Issue draw calls against a [`Canvas`]
//!
//! Input arrives through [`Widget::event`] and elapsed time through
//! [`Widget::tick`]. Both run on the single UI thread; a widget that changes
//! what it would paint calls [`RepaintHandle::request`] and the driver
//! repaints before the next frame.
//!
//! # Examples
//!
//! ```
//! use powerbar_core::{RepaintHandle, TypeId};
//!
//! let repaint = RepaintHandle::new();
//! let observer = repaint.clone();
//! repaint.request();
//! assert_eq!(observer.pending(), 1);
//!
//! assert_ne!(TypeId::of::<String>(), TypeId::of::<i32>());
//! ```

use crate::constraints::Constraints;
use crate::draw::BoxStyle;
use crate::event::Event;
use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Type identifier for widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Shared counter of outstanding repaint requests.
///
/// Clones observe the same counter, so a subscriber closure can hold a clone
/// and request a repaint of the widget that owns the original.
#[derive(Debug, Clone, Default)]
pub struct RepaintHandle {
    pending: Arc<AtomicU64>,
}

impl RepaintHandle {
    /// Create a handle with no pending requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for the owning widget to be repainted.
    pub fn request(&self) {
        self.pending.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of requests since the last [`RepaintHandle::take`].
    #[must_use]
    pub fn pending(&self) -> u64 {
        self.pending.load(Ordering::Relaxed)
    }

    /// Consume all pending requests, returning how many there were.
    pub fn take(&self) -> u64 {
        self.pending.swap(0, Ordering::Relaxed)
    }
}

/// Core widget trait that all UI elements implement.
pub trait Widget: Send + Sync {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Preferred minimum size in logical units.
    fn size_hint(&self) -> Size;

    /// Compute the size this widget wants under `constraints`.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Position self (and children) within allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Issue draw calls for the current state.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle an input event, optionally returning a message.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Advance animations by `dt`. Returns true if anything changed.
    fn tick(&mut self, _dt: Duration) -> bool {
        false
    }

    /// Whether an animation is currently running.
    fn is_animating(&self) -> bool {
        false
    }

    /// Repaint requests not yet consumed by the driver.
    fn pending_repaints(&self) -> u64 {
        0
    }

    /// Mark all pending repaints as handled.
    fn mark_painted(&self) {}

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Drawing surface that widgets paint onto.
///
/// Shapes take a [`BoxStyle`]: its `fill` is the brush and its `stroke` the
/// pen. A `None` pen draws no outline.
pub trait Canvas {
    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: crate::Color);

    /// Draw a rectangle with uniformly rounded corners.
    fn draw_rounded_rect(&mut self, rect: Rect, radius: f32, style: &BoxStyle);

    /// Draw an ellipse centered on `center`.
    fn draw_ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32, style: &BoxStyle);

    /// Draw text.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Enable or disable antialiasing for subsequent shapes.
    fn set_antialiasing(&mut self, enabled: bool);
}

/// Text style for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: crate::Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: crate::Color::BLACK,
        }
    }
}
