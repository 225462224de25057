//! Vertical integer slider holding a `{minimum, maximum, value}` range.

use log::{debug, trace};
use powerbar_core::{
    widget::LayoutResult, BoxStyle, Canvas, Color, Constraints, Event, MouseButton, Rect,
    RepaintHandle, SharedValue, Signal, Size, SubscriptionId, TypeId, Widget,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Message emitted when the range input's value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeChanged {
    /// The new value
    pub value: i32,
}

/// Bounds and current value of a range input.
///
/// `minimum <= value <= maximum` and `maximum > minimum` always hold for a
/// model owned by a [`RangeInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeModel {
    /// Lowest selectable value
    pub minimum: i32,
    /// Highest selectable value
    pub maximum: i32,
    /// Current value
    pub value: i32,
}

impl Default for RangeModel {
    fn default() -> Self {
        Self {
            minimum: 0,
            maximum: 100,
            value: 0,
        }
    }
}

impl RangeModel {
    /// Clamp `value` into the model's bounds.
    #[must_use]
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.minimum, self.maximum)
    }

    /// Value as a fraction of the range (0.0 - 1.0).
    #[must_use]
    pub fn normalized_value(&self) -> f32 {
        let span = i64::from(self.maximum) - i64::from(self.minimum);
        if span <= 0 {
            0.0
        } else {
            (i64::from(self.value) - i64::from(self.minimum)) as f32 / span as f32
        }
    }
}

/// Vertical slider over an integer range; maximum at the top.
pub struct RangeInput {
    model: SharedValue<RangeModel>,
    value_changed: Signal<i32>,
    repaint: RepaintHandle,
    /// Groove color
    groove_color: Color,
    /// Filled groove color below the handle
    active_color: Color,
    /// Handle color
    handle_color: Color,
    /// Groove thickness
    groove_width: f32,
    /// Handle extent along the groove
    handle_length: f32,
    /// Cached bounds
    bounds: Rect,
    /// Whether currently dragging
    dragging: bool,
}

impl Default for RangeInput {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeInput {
    /// Create a range input over `0..=100` at value 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: SharedValue::new(RangeModel::default()),
            value_changed: Signal::new(),
            repaint: RepaintHandle::new(),
            groove_color: Color::LIGHT_GRAY,
            active_color: Color::rgb(0.2, 0.6, 1.0),
            handle_color: Color::WHITE,
            groove_width: 4.0,
            handle_length: 12.0,
            bounds: Rect::default(),
            dragging: false,
        }
    }

    /// Set the range.
    #[must_use]
    pub fn with_range(mut self, minimum: i32, maximum: i32) -> Self {
        self.set_range(minimum, maximum);
        self
    }

    /// Set the groove color.
    #[must_use]
    pub const fn groove_color(mut self, color: Color) -> Self {
        self.groove_color = color;
        self
    }

    /// Set the filled groove color.
    #[must_use]
    pub const fn active_color(mut self, color: Color) -> Self {
        self.active_color = color;
        self
    }

    /// Set the handle color.
    #[must_use]
    pub const fn handle_color(mut self, color: Color) -> Self {
        self.handle_color = color;
        self
    }

    /// Current lower bound.
    #[must_use]
    pub fn minimum(&self) -> i32 {
        self.model.read().minimum
    }

    /// Current upper bound.
    #[must_use]
    pub fn maximum(&self) -> i32 {
        self.model.read().maximum
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> i32 {
        self.model.read().value
    }

    /// Snapshot of bounds and value.
    #[must_use]
    pub fn range(&self) -> RangeModel {
        self.model.get()
    }

    /// Shared view of the model for widgets that paint from it.
    #[must_use]
    pub fn model(&self) -> SharedValue<RangeModel> {
        self.model.clone()
    }

    /// The value-changed notification.
    #[must_use]
    pub const fn value_changed(&self) -> &Signal<i32> {
        &self.value_changed
    }

    /// Subscribe to value changes.
    pub fn on_value_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&i32) + Send + Sync + 'static,
    {
        self.value_changed.connect(callback)
    }

    /// Repaint requests for this widget.
    #[must_use]
    pub const fn repaint_handle(&self) -> &RepaintHandle {
        &self.repaint
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Set the value, clamped to the range. Returns the new value if it changed.
    pub fn set_value(&mut self, value: i32) -> Option<i32> {
        self.apply(|model| model.value = value)
    }

    /// Set the lower bound. The upper bound moves up if needed to stay above
    /// it; at `i32::MAX` the lower bound steps down instead.
    pub fn set_minimum(&mut self, minimum: i32) -> Option<i32> {
        self.apply(|model| {
            model.minimum = minimum;
            if model.maximum <= minimum {
                model.maximum = minimum.saturating_add(1);
            }
        })
    }

    /// Set the upper bound. The lower bound moves down if needed to stay below it.
    pub fn set_maximum(&mut self, maximum: i32) -> Option<i32> {
        self.apply(|model| {
            model.maximum = maximum;
            if model.minimum >= maximum {
                model.minimum = maximum.saturating_sub(1);
            }
        })
    }

    /// Set both bounds. A range narrower than one step is widened upward.
    pub fn set_range(&mut self, minimum: i32, maximum: i32) -> Option<i32> {
        self.apply(|model| {
            model.minimum = minimum;
            model.maximum = maximum.max(minimum.saturating_add(1));
        })
    }

    /// Mutate the model, re-clamp, and notify if the value moved.
    ///
    /// The signal fires after the model lock is released so subscribers can
    /// read the range input back.
    fn apply(&mut self, change: impl FnOnce(&mut RangeModel)) -> Option<i32> {
        let before = self.model.get();
        let mut after = before;
        change(&mut after);
        if after.maximum <= after.minimum {
            debug!(
                "range {}..={} is degenerate, widening",
                after.minimum, after.maximum
            );
            match after.minimum.checked_add(1) {
                Some(maximum) => after.maximum = maximum,
                None => {
                    after.maximum = i32::MAX;
                    after.minimum = i32::MAX - 1;
                }
            }
        }
        after.value = after.clamp(after.value);
        if after == before {
            return None;
        }
        self.model.set(after);
        self.repaint.request();
        if after.value == before.value {
            return None;
        }
        trace!("range input value {} -> {}", before.value, after.value);
        self.value_changed.emit(&after.value);
        Some(after.value)
    }

    /// Groove extent along the vertical axis.
    fn groove_span(&self) -> (f32, f32) {
        let top = self.bounds.y + self.handle_length / 2.0;
        let length = (self.bounds.height - self.handle_length).max(0.0);
        (top, length)
    }

    /// Handle center for the current value.
    fn handle_y(&self) -> f32 {
        let (top, length) = self.groove_span();
        length.mul_add(-self.range().normalized_value(), top + length)
    }

    /// Value under a pointer at `y`.
    fn value_from_y(&self, y: f32) -> i32 {
        let (top, length) = self.groove_span();
        let range = self.range();
        if length <= 0.0 {
            return range.minimum;
        }
        let normalized = ((top + length - y) / length).clamp(0.0, 1.0);
        let span = f64::from(range.maximum) - f64::from(range.minimum);
        (f64::from(range.minimum) + (f64::from(normalized) * span).round()) as i32
    }

    fn drag_to(&mut self, y: f32) -> Option<Box<dyn Any + Send>> {
        let value = self.value_from_y(y);
        self.set_value(value)
            .map(|value| Box::new(RangeChanged { value }) as Box<dyn Any + Send>)
    }
}

impl Widget for RangeInput {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn size_hint(&self) -> Size {
        Size::new(24.0, 120.0)
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let hint = self.size_hint();
        constraints.constrain(Size::new(
            hint.width,
            constraints.biggest().height.max(hint.height),
        ))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let (top, length) = self.groove_span();
        let groove_x = self.bounds.center().x - self.groove_width / 2.0;
        let radius = self.groove_width / 2.0;

        // Groove
        canvas.draw_rounded_rect(
            Rect::new(groove_x, top, self.groove_width, length),
            radius,
            &BoxStyle::fill(self.groove_color),
        );

        // Filled portion below the handle
        let handle_y = self.handle_y();
        canvas.draw_rounded_rect(
            Rect::new(groove_x, handle_y, self.groove_width, top + length - handle_y),
            radius,
            &BoxStyle::fill(self.active_color),
        );

        // Handle
        let handle = Rect::new(
            self.bounds.x,
            handle_y - self.handle_length / 2.0,
            self.bounds.width,
            self.handle_length,
        );
        canvas.draw_rounded_rect(handle, 2.0, &BoxStyle::fill(self.handle_color));
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } if self.bounds.contains_point(position) => {
                self.dragging = true;
                self.drag_to(position.y)
            }
            Event::MouseMove { position } if self.dragging => self.drag_to(position.y),
            Event::MouseUp {
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = false;
                None
            }
            _ => None,
        }
    }

    fn pending_repaints(&self) -> u64 {
        self.repaint.pending()
    }

    fn mark_painted(&self) {
        self.repaint.take();
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerbar_core::{DrawCommand, Point, RecordingCanvas};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // ===== RangeModel Tests =====

    #[test]
    fn test_range_model_default() {
        let model = RangeModel::default();
        assert_eq!((model.minimum, model.maximum, model.value), (0, 100, 0));
    }

    #[test]
    fn test_range_model_normalized_value() {
        let model = RangeModel {
            minimum: 0,
            maximum: 200,
            value: 50,
        };
        assert!((model.normalized_value() - 0.25).abs() < f32::EPSILON);
    }

    // ===== Value Tests =====

    #[test]
    fn test_set_value_clamps() {
        let mut input = RangeInput::new();
        assert_eq!(input.set_value(150), Some(100));
        assert_eq!(input.value(), 100);
        assert_eq!(input.set_value(-5), Some(0));
    }

    #[test]
    fn test_set_value_unchanged_is_silent() {
        let mut input = RangeInput::new();
        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        input.on_value_changed(move |_| {
            sink.fetch_add(1, Ordering::Relaxed);
        });

        assert_eq!(input.set_value(0), None);
        assert_eq!(count.load(Ordering::Relaxed), 0);
        input.set_value(10);
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_value_changed_carries_new_value() {
        let mut input = RangeInput::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        input.on_value_changed(move |v| sink.lock().unwrap().push(*v));

        input.set_value(30);
        input.set_value(70);
        assert_eq!(*seen.lock().unwrap(), vec![30, 70]);
    }

    // ===== Range Tests =====

    #[test]
    fn test_set_range_reclamps_value() {
        let mut input = RangeInput::new();
        input.set_value(60);
        assert_eq!(input.set_range(0, 1), Some(1));
        assert_eq!(
            input.range(),
            RangeModel {
                minimum: 0,
                maximum: 1,
                value: 1,
            }
        );
    }

    #[test]
    fn test_set_range_never_degenerate() {
        let mut input = RangeInput::new();
        input.set_range(5, 5);
        assert_eq!((input.minimum(), input.maximum()), (5, 6));
        input.set_range(10, 3);
        assert_eq!((input.minimum(), input.maximum()), (10, 11));
    }

    #[test]
    fn test_minimum_at_i32_max_widens_downward() {
        let mut input = RangeInput::new();
        input.set_minimum(i32::MAX);
        assert_eq!((input.minimum(), input.maximum()), (i32::MAX - 1, i32::MAX));
        assert_eq!(input.value(), i32::MAX - 1);

        input.set_range(i32::MAX, i32::MAX);
        assert_eq!((input.minimum(), input.maximum()), (i32::MAX - 1, i32::MAX));
    }

    #[test]
    fn test_set_maximum_below_minimum_pulls_minimum_down() {
        let mut input = RangeInput::new().with_range(10, 20);
        input.set_maximum(5);
        assert_eq!((input.minimum(), input.maximum()), (4, 5));
        assert_eq!(input.value(), 5);
    }

    #[test]
    fn test_set_minimum_above_maximum_pushes_maximum_up() {
        let mut input = RangeInput::new();
        input.set_minimum(100);
        assert_eq!((input.minimum(), input.maximum()), (100, 101));
        assert_eq!(input.value(), 100);
    }

    #[test]
    fn test_model_is_shared() {
        let mut input = RangeInput::new();
        let model = input.model();
        input.set_value(42);
        assert_eq!(model.get().value, 42);
    }

    #[test]
    fn test_range_change_requests_repaint() {
        let mut input = RangeInput::new();
        input.set_range(0, 1);
        assert_eq!(input.pending_repaints(), 1);
        input.mark_painted();
        input.set_range(0, 1);
        assert_eq!(input.pending_repaints(), 0);
    }

    // ===== Paint Tests =====

    #[test]
    fn test_paint_draws_groove_fill_and_handle() {
        let mut input = RangeInput::new();
        input.layout(Rect::new(0.0, 0.0, 24.0, 112.0));
        let mut canvas = RecordingCanvas::new();
        input.paint(&mut canvas);
        assert_eq!(canvas.command_count(), 3);
    }

    #[test]
    fn test_paint_handle_at_top_for_maximum() {
        let mut input = RangeInput::new();
        input.layout(Rect::new(0.0, 0.0, 24.0, 112.0));
        input.set_value(100);
        let mut canvas = RecordingCanvas::new();
        input.paint(&mut canvas);
        match &canvas.commands()[2] {
            DrawCommand::Rect { bounds, .. } => assert_eq!(bounds.y, 0.0),
            _ => panic!("Expected Rect command for handle"),
        }
    }

    // ===== Event Tests =====

    #[test]
    fn test_press_sets_value_from_position() {
        let mut input = RangeInput::new();
        // Groove runs from y=6 to y=106 (length 100)
        input.layout(Rect::new(0.0, 0.0, 24.0, 112.0));
        let msg = input.event(&Event::press(Point::new(12.0, 31.0)));
        assert_eq!(input.value(), 75);
        let changed = msg.and_then(|m| m.downcast::<RangeChanged>().ok());
        assert_eq!(changed.map(|c| c.value), Some(75));
        assert!(input.is_dragging());
    }

    #[test]
    fn test_drag_follows_pointer_until_release() {
        let mut input = RangeInput::new();
        input.layout(Rect::new(0.0, 0.0, 24.0, 112.0));
        input.event(&Event::press(Point::new(12.0, 106.0)));
        input.event(&Event::MouseMove {
            position: Point::new(12.0, 56.0),
        });
        assert_eq!(input.value(), 50);
        input.event(&Event::release(Point::new(12.0, 56.0)));
        input.event(&Event::MouseMove {
            position: Point::new(12.0, 6.0),
        });
        assert_eq!(input.value(), 50);
    }

    #[test]
    fn test_press_outside_ignored() {
        let mut input = RangeInput::new();
        input.layout(Rect::new(0.0, 0.0, 24.0, 112.0));
        assert!(input.event(&Event::press(Point::new(50.0, 50.0))).is_none());
        assert!(!input.is_dragging());
    }

    // ===== Property Tests =====

    proptest! {
        #[test]
        fn prop_value_stays_in_range(
            ops in prop::collection::vec(
                (
                    0u8..4,
                    prop_oneof![-500i32..500, Just(i32::MIN), Just(i32::MAX)],
                    -500i32..500,
                ),
                1..40,
            )
        ) {
            let mut input = RangeInput::new();
            for (op, a, b) in ops {
                match op {
                    0 => { input.set_value(a); }
                    1 => { input.set_minimum(a); }
                    2 => { input.set_maximum(a); }
                    _ => { input.set_range(a, b); }
                }
                let range = input.range();
                prop_assert!(range.minimum < range.maximum);
                prop_assert!(range.minimum <= range.value && range.value <= range.maximum);
            }
        }
    }
}
