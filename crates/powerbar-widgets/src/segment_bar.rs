//! Segmented value indicator.
//!
//! A column of colored segments, the bottom `lit_count` of which are drawn
//! for the current value. Pressing or dragging on the bar maps the pointer
//! back to a value and emits it.

use crate::range_input::RangeModel;
use log::trace;
use powerbar_core::{
    widget::LayoutResult, Canvas, Color, Constraints, Event, MouseButton, Rect, RepaintHandle,
    SharedValue, Signal, Size, SizePolicy, TypeId, Widget, WidgetError,
};
use std::any::Any;

/// Message emitted when the bar is pressed or dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueClicked {
    /// Value under the pointer
    pub value: i32,
}

/// How the segments are specified at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum StepSpec {
    /// `n` segments, all red.
    Count(usize),
    /// One segment per color, bottom first.
    Colors(Vec<Color>),
}

impl StepSpec {
    /// Resolve into the per-segment color list.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidArgument`] for zero segments.
    pub fn into_colors(self) -> Result<Vec<Color>, WidgetError> {
        let colors = match self {
            Self::Count(n) => vec![Color::RED; n],
            Self::Colors(colors) => colors,
        };
        if colors.is_empty() {
            return Err(WidgetError::invalid_argument(
                "steps must be a positive count or a non-empty list of colors",
            ));
        }
        Ok(colors)
    }
}

impl From<usize> for StepSpec {
    fn from(count: usize) -> Self {
        Self::Count(count)
    }
}

impl From<Vec<Color>> for StepSpec {
    fn from(colors: Vec<Color>) -> Self {
        Self::Colors(colors)
    }
}

/// Number of segments lit for `value` in `minimum..=maximum`.
///
/// `floor(step_count * (value - minimum) / (maximum - minimum))`, clamped to
/// `0..=step_count`.
///
/// # Panics
///
/// Panics if `maximum <= minimum`.
#[must_use]
pub fn lit_count(step_count: usize, value: i32, minimum: i32, maximum: i32) -> usize {
    assert!(
        maximum > minimum,
        "degenerate value range {minimum}..={maximum}"
    );
    let steps = step_count as i64;
    let lit = steps * (i64::from(value) - i64::from(minimum))
        / (i64::from(maximum) - i64::from(minimum));
    lit.clamp(0, steps) as usize
}

/// Segmented bar widget.
pub struct SegmentBar {
    /// Segment colors, bottom first; its length is the step count
    step_colors: Vec<Color>,
    /// Fraction of each segment's slot that is painted
    fill_ratio: f32,
    background: Color,
    padding: u32,
    range: SharedValue<RangeModel>,
    value_clicked: Signal<i32>,
    repaint: RepaintHandle,
    bounds: Rect,
    pressed: bool,
}

impl SegmentBar {
    /// Create a bar over its own `0..=100` range.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidArgument`] if `steps` has no segments.
    pub fn new(steps: impl Into<StepSpec>) -> Result<Self, WidgetError> {
        Ok(Self {
            step_colors: steps.into().into_colors()?,
            fill_ratio: 0.8,
            background: Color::BLACK,
            padding: 4,
            range: SharedValue::new(RangeModel::default()),
            value_clicked: Signal::new(),
            repaint: RepaintHandle::new(),
            bounds: Rect::default(),
            pressed: false,
        })
    }

    /// Read value and bounds from `range` at paint time.
    #[must_use]
    pub fn with_range(mut self, range: SharedValue<RangeModel>) -> Self {
        self.range = range;
        self
    }

    /// Number of segments.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.step_colors.len()
    }

    /// Segment colors, bottom first.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.step_colors
    }

    /// Fraction of each segment slot that is painted.
    #[must_use]
    pub const fn fill_ratio(&self) -> f32 {
        self.fill_ratio
    }

    /// Background color.
    #[must_use]
    pub const fn background_color(&self) -> Color {
        self.background
    }

    /// Inset on all sides in pixels.
    #[must_use]
    pub const fn padding(&self) -> u32 {
        self.padding
    }

    /// The value-clicked notification.
    #[must_use]
    pub const fn value_clicked(&self) -> &Signal<i32> {
        &self.value_clicked
    }

    /// Repaint requests for this widget.
    #[must_use]
    pub const fn repaint_handle(&self) -> &RepaintHandle {
        &self.repaint
    }

    /// Ask for a repaint.
    pub fn request_repaint(&self) {
        self.repaint.request();
    }

    /// Paint every segment in `color`, keeping the step count.
    pub fn set_color(&mut self, color: Color) {
        self.step_colors.fill(color);
        self.repaint.request();
    }

    /// Replace the segment colors; the step count becomes `colors.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidArgument`] if `colors` is empty.
    pub fn set_colors(&mut self, colors: Vec<Color>) -> Result<(), WidgetError> {
        self.step_colors = StepSpec::Colors(colors).into_colors()?;
        self.repaint.request();
        Ok(())
    }

    /// Set the inset on all sides.
    pub fn set_padding(&mut self, padding: u32) {
        self.padding = padding;
        self.repaint.request();
    }

    /// Set the painted fraction of each segment slot.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidArgument`] unless `0 < ratio <= 1`.
    pub fn set_fill_ratio(&mut self, ratio: f32) -> Result<(), WidgetError> {
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(WidgetError::invalid_argument(format!(
                "fill ratio must be in (0, 1], got {ratio}"
            )));
        }
        self.fill_ratio = ratio;
        self.repaint.request();
        Ok(())
    }

    /// Set the background color.
    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
        self.repaint.request();
    }

    /// Draw background and lit segments for `value` in `minimum..=maximum`.
    ///
    /// # Panics
    ///
    /// Panics if `maximum <= minimum`.
    pub fn render(&self, canvas: &mut dyn Canvas, value: i32, minimum: i32, maximum: i32) {
        let lit = lit_count(self.step_count(), value, minimum, maximum);
        canvas.fill_rect(self.bounds, self.background);

        let padding = self.padding as f32;
        let draw_width = 2.0f32.mul_add(-padding, self.bounds.width);
        let draw_height = 2.0f32.mul_add(-padding, self.bounds.height);
        let step_size = draw_height / self.step_count() as f32;
        let bar_height = (step_size * self.fill_ratio).trunc();

        for (n, color) in self.step_colors.iter().take(lit).enumerate() {
            let ypos = ((n + 1) as f32 * step_size).trunc();
            let rect = Rect::new(
                self.bounds.x + padding,
                self.bounds.y + padding + draw_height - ypos,
                draw_width,
                bar_height,
            );
            canvas.fill_rect(rect, *color);
        }
    }

    /// Value for a pointer at `pointer_y` (relative to the bar's top edge).
    ///
    /// Uses the same segment slotting as [`SegmentBar::render`], so a press on
    /// the top edge of segment `k` lights up to about segment `k`. The result
    /// is not clamped to the range.
    #[must_use]
    pub fn hit_test_to_value(
        &self,
        pointer_y: f32,
        widget_height: f32,
        minimum: i32,
        maximum: i32,
    ) -> i32 {
        let padding = f64::from(self.padding);
        let height = 2.0f64.mul_add(padding, f64::from(widget_height));
        let step_size = height / self.step_count() as f64;
        let click_y = f64::from(pointer_y) - padding - step_size / 2.0;
        let fraction = (height - click_y) / height;
        let span = f64::from(maximum) - f64::from(minimum);
        fraction.mul_add(span, f64::from(minimum)) as i32
    }

    fn emit_at(&self, y: f32) -> Box<dyn Any + Send> {
        let range = self.range.get();
        let value = self.hit_test_to_value(
            y - self.bounds.y,
            self.bounds.height,
            range.minimum,
            range.maximum,
        );
        trace!("segment bar emits {value}");
        self.value_clicked.emit(&value);
        Box::new(ValueClicked { value })
    }
}

impl std::fmt::Debug for SegmentBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentBar")
            .field("step_colors", &self.step_colors)
            .field("fill_ratio", &self.fill_ratio)
            .field("background", &self.background)
            .field("padding", &self.padding)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl Widget for SegmentBar {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn size_hint(&self) -> Size {
        Size::new(40.0, 120.0)
    }

    fn measure(&self, constraints: Constraints) -> Size {
        SizePolicy::MinimumExpanding.resolve(self.size_hint(), constraints)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let range = self.range.get();
        self.render(canvas, range.value, range.minimum, range.maximum);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } if self.bounds.contains_point(position) => {
                self.pressed = true;
                Some(self.emit_at(position.y))
            }
            Event::MouseMove { position } if self.pressed => Some(self.emit_at(position.y)),
            Event::MouseUp {
                button: MouseButton::Left,
                ..
            } => {
                self.pressed = false;
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
