//! Power bar: a segment bar kept in sync with a range input, plus a toggle
//! that switches between a primary and a secondary value range.
//!
//! ```text
//! +----------------------+
//! | primary label        |   only one label is visible,
//! | secondary label      |   depending on the mode
//! +---------------+------+
//! |  SegmentBar   | Range|
//! |               | Input|
//! +---------------+------+
//! | AnimatedToggle       |
//! +----------------------+
//! ```

use crate::animated_toggle::{AnimatedToggle, ToggleClicked};
use crate::label::Label;
use crate::range_input::{RangeChanged, RangeInput, RangeModel};
use crate::segment_bar::{SegmentBar, StepSpec, ValueClicked};
use log::debug;
use phf::phf_map;
use powerbar_core::{
    parse_color, widget::LayoutResult, Canvas, Color, Constraints, Event, Point, Rect, Size,
    SizePolicy, SubscriptionId, TypeId, Widget, WidgetError,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::time::Duration;

/// Default checked color of the embedded toggle.
pub const DEFAULT_CHECKED_COLOR: &str = "#4400B0EE";
/// Default checked pulse color of the embedded toggle.
pub const DEFAULT_PULSE_CHECKED_COLOR: &str = "#4400B0EE";

/// Gap between the bar and the range input.
const SPACING: f32 = 6.0;

/// Which value range the power bar drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// `0..=100`, primary label shown
    #[default]
    Primary,
    /// `0..=1`, secondary label shown
    Secondary,
}

impl Mode {
    /// Range bounds for the mode.
    #[must_use]
    pub const fn bounds(self) -> (i32, i32) {
        match self {
            Self::Primary => (0, 100),
            Self::Secondary => (0, 1),
        }
    }

    /// Mode selected by the toggle's checked state.
    #[must_use]
    pub const fn from_checked(checked: bool) -> Self {
        if checked {
            Self::Secondary
        } else {
            Self::Primary
        }
    }
}

/// Message emitted when the toggle switches the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChanged {
    /// The new mode
    pub mode: Mode,
}

/// Range input operations reachable by name through [`PowerBar::invoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOperation {
    /// `minimum()`
    Minimum,
    /// `maximum()`
    Maximum,
    /// `value()`
    Value,
    /// `set_minimum(min)`
    SetMinimum,
    /// `set_maximum(max)`
    SetMaximum,
    /// `set_value(value)`
    SetValue,
    /// `set_range(min, max)`
    SetRange,
}

static RANGE_OPERATIONS: phf::Map<&'static str, RangeOperation> = phf_map! {
    "minimum" => RangeOperation::Minimum,
    "maximum" => RangeOperation::Maximum,
    "value" => RangeOperation::Value,
    "set_minimum" => RangeOperation::SetMinimum,
    "setMinimum" => RangeOperation::SetMinimum,
    "set_maximum" => RangeOperation::SetMaximum,
    "setMaximum" => RangeOperation::SetMaximum,
    "set_value" => RangeOperation::SetValue,
    "setValue" => RangeOperation::SetValue,
    "set_range" => RangeOperation::SetRange,
    "setRange" => RangeOperation::SetRange,
};

impl RangeOperation {
    /// Look up an operation by its snake_case or camelCase name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        RANGE_OPERATIONS.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Child {
    Bar,
    RangeInput,
    Toggle,
}

/// Segment bar, range input and mode toggle as one control.
pub struct PowerBar {
    bar: SegmentBar,
    range_input: RangeInput,
    toggle: AnimatedToggle,
    primary_label: Label,
    secondary_label: Label,
    mode: Mode,
    repaint_link: SubscriptionId,
    grab: Option<Child>,
    bounds: Rect,
}

impl PowerBar {
    /// Type name used in dispatch errors.
    pub const TYPE_NAME: &'static str = "PowerBar";

    /// Build a power bar.
    ///
    /// `secondary` selects the initial mode. The two colors (`#AARRGGBB`,
    /// `#RRGGBB` or a color name) go to the embedded toggle.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidArgument`] for an empty step spec and
    /// [`WidgetError::InvalidColor`] for an unparsable color.
    pub fn new(
        steps: impl Into<StepSpec>,
        secondary: bool,
        checked_color: &str,
        pulse_checked_color: &str,
    ) -> Result<Self, WidgetError> {
        let mode = Mode::from_checked(secondary);
        let (minimum, maximum) = mode.bounds();
        let range_input = RangeInput::new().with_range(minimum, maximum);
        let bar = SegmentBar::new(steps)?.with_range(range_input.model());
        let toggle = AnimatedToggle::new()
            .checked_color(parse_color(checked_color)?)
            .pulse_checked_color(parse_color(pulse_checked_color)?)
            .with_checked(secondary);

        // The only link from range input changes to bar repaints.
        let bar_repaint = bar.repaint_handle().clone();
        let repaint_link = range_input.on_value_changed(move |_| bar_repaint.request());

        let mut primary_label = Label::new("Primary range");
        primary_label.set_visible(mode == Mode::Primary);
        let mut secondary_label = Label::new("Secondary range");
        secondary_label.set_visible(mode == Mode::Secondary);

        Ok(Self {
            bar,
            range_input,
            toggle,
            primary_label,
            secondary_label,
            mode,
            repaint_link,
            grab: None,
            bounds: Rect::default(),
        })
    }

    /// Replace the label texts.
    #[must_use]
    pub fn labels(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.primary_label.set_content(primary);
        self.secondary_label.set_content(secondary);
        self
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode: new bounds, value reset to the range minimum, label
    /// visibility swapped. The toggle follows the mode.
    pub fn set_mode(&mut self, mode: Mode) {
        debug!("power bar mode {:?} -> {mode:?}", self.mode);
        self.mode = mode;
        let (minimum, maximum) = mode.bounds();
        self.range_input.set_range(minimum, maximum);
        self.range_input.set_value(minimum);
        self.primary_label.set_visible(mode == Mode::Primary);
        self.secondary_label.set_visible(mode == Mode::Secondary);
        self.toggle.set_checked(mode == Mode::Secondary);
        self.bar.request_repaint();
        self.layout(self.bounds);
    }

    /// The segment bar.
    #[must_use]
    pub const fn bar(&self) -> &SegmentBar {
        &self.bar
    }

    /// The mode toggle.
    #[must_use]
    pub const fn toggle(&self) -> &AnimatedToggle {
        &self.toggle
    }

    /// Label shown in primary mode.
    #[must_use]
    pub const fn primary_label(&self) -> &Label {
        &self.primary_label
    }

    /// Label shown in secondary mode.
    #[must_use]
    pub const fn secondary_label(&self) -> &Label {
        &self.secondary_label
    }

    /// Subscription that repaints the bar on range input changes.
    #[must_use]
    pub const fn repaint_link(&self) -> SubscriptionId {
        self.repaint_link
    }

    /// Checked color of the embedded toggle.
    #[must_use]
    pub const fn checked_color(&self) -> Color {
        self.toggle.get_checked_color()
    }

    /// Checked pulse color of the embedded toggle.
    #[must_use]
    pub const fn pulse_checked_color(&self) -> Color {
        self.toggle.get_pulse_checked_color()
    }

    // ----- Range input delegation -----

    /// The embedded range input.
    #[must_use]
    pub const fn range_input(&self) -> &RangeInput {
        &self.range_input
    }

    /// The embedded range input, mutably.
    pub fn range_input_mut(&mut self) -> &mut RangeInput {
        &mut self.range_input
    }

    /// See [`RangeInput::minimum`].
    #[must_use]
    pub fn minimum(&self) -> i32 {
        self.range_input.minimum()
    }

    /// See [`RangeInput::maximum`].
    #[must_use]
    pub fn maximum(&self) -> i32 {
        self.range_input.maximum()
    }

    /// See [`RangeInput::value`].
    #[must_use]
    pub fn value(&self) -> i32 {
        self.range_input.value()
    }

    /// See [`RangeInput::range`].
    #[must_use]
    pub fn range(&self) -> RangeModel {
        self.range_input.range()
    }

    /// See [`RangeInput::set_minimum`].
    pub fn set_minimum(&mut self, minimum: i32) -> Option<i32> {
        self.range_input.set_minimum(minimum)
    }

    /// See [`RangeInput::set_maximum`].
    pub fn set_maximum(&mut self, maximum: i32) -> Option<i32> {
        self.range_input.set_maximum(maximum)
    }

    /// See [`RangeInput::set_value`].
    pub fn set_value(&mut self, value: i32) -> Option<i32> {
        self.range_input.set_value(value)
    }

    /// See [`RangeInput::on_value_changed`].
    pub fn on_value_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&i32) + Send + Sync + 'static,
    {
        self.range_input.on_value_changed(callback)
    }

    /// Call a range input operation by name.
    ///
    /// Getters return `Some(value)`, setters `None`.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::NoSuchOperation`] for an unknown name and
    /// [`WidgetError::InvalidArgument`] for the wrong number of arguments.
    pub fn invoke(&mut self, name: &str, args: &[i32]) -> Result<Option<i32>, WidgetError> {
        let operation =
            RangeOperation::lookup(name).ok_or_else(|| WidgetError::NoSuchOperation {
                type_name: Self::TYPE_NAME,
                operation: name.to_string(),
            })?;
        match (operation, args) {
            (RangeOperation::Minimum, []) => Ok(Some(self.minimum())),
            (RangeOperation::Maximum, []) => Ok(Some(self.maximum())),
            (RangeOperation::Value, []) => Ok(Some(self.value())),
            (RangeOperation::SetMinimum, [minimum]) => {
                self.set_minimum(*minimum);
                Ok(None)
            }
            (RangeOperation::SetMaximum, [maximum]) => {
                self.set_maximum(*maximum);
                Ok(None)
            }
            (RangeOperation::SetValue, [value]) => {
                self.set_value(*value);
                Ok(None)
            }
            (RangeOperation::SetRange, [minimum, maximum]) => {
                self.range_input.set_range(*minimum, *maximum);
                Ok(None)
            }
            _ => Err(WidgetError::invalid_argument(format!(
                "{name} does not take {} argument(s)",
                args.len()
            ))),
        }
    }

    // ----- Bar configuration -----

    /// Paint every segment in `color`.
    pub fn set_color(&mut self, color: Color) {
        self.bar.set_color(color);
    }

    /// Replace the segment colors; the step count follows.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidArgument`] if `colors` is empty.
    pub fn set_colors(&mut self, colors: Vec<Color>) -> Result<(), WidgetError> {
        self.bar.set_colors(colors)
    }

    /// Set the bar padding in pixels.
    pub fn set_padding(&mut self, padding: u32) {
        self.bar.set_padding(padding);
    }

    /// Set the painted fraction of each segment.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidArgument`] unless `0 < ratio <= 1`.
    pub fn set_fill_ratio(&mut self, ratio: f32) -> Result<(), WidgetError> {
        self.bar.set_fill_ratio(ratio)
    }

    /// Set the bar background color.
    pub fn set_background_color(&mut self, color: Color) {
        self.bar.set_background_color(color);
    }

    // ----- Event routing -----

    fn child_at(&self, position: &Point) -> Option<Child> {
        [Child::Bar, Child::RangeInput, Child::Toggle]
            .into_iter()
            .find(|child| self.child(*child).bounds().contains_point(position))
    }

    fn child(&self, child: Child) -> &dyn Widget {
        match child {
            Child::Bar => &self.bar,
            Child::RangeInput => &self.range_input,
            Child::Toggle => &self.toggle,
        }
    }

    fn child_mut(&mut self, child: Child) -> &mut dyn Widget {
        match child {
            Child::Bar => &mut self.bar,
            Child::RangeInput => &mut self.range_input,
            Child::Toggle => &mut self.toggle,
        }
    }

    fn handle_child_message(
        &mut self,
        message: Box<dyn Any + Send>,
    ) -> Option<Box<dyn Any + Send>> {
        if let Some(clicked) = message.downcast_ref::<ValueClicked>() {
            return self
                .range_input
                .set_value(clicked.value)
                .map(|value| Box::new(RangeChanged { value }) as Box<dyn Any + Send>);
        }
        if let Some(clicked) = message.downcast_ref::<ToggleClicked>() {
            let mode = Mode::from_checked(clicked.checked);
            self.set_mode(mode);
            return Some(Box::new(ModeChanged { mode }));
        }
        Some(message)
    }

    fn labels_mut(&mut self) -> [&mut Label; 2] {
        [&mut self.primary_label, &mut self.secondary_label]
    }
}

impl std::fmt::Debug for PowerBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerBar")
            .field("mode", &self.mode)
            .field("range", &self.range())
            .field("bar", &self.bar)
            .field("toggle", &self.toggle)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl Widget for PowerBar {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn size_hint(&self) -> Size {
        let labels = [&self.primary_label, &self.secondary_label];
        let label_width = labels
            .iter()
            .map(|l| l.size_hint().width)
            .fold(0.0, f32::max);
        let label_height: f32 = labels.iter().map(|l| l.size_hint().height).sum();
        let bar = self.bar.size_hint();
        let slider = self.range_input.size_hint();
        let toggle = self.toggle.size_hint();
        Size::new(
            (bar.width + SPACING + slider.width)
                .max(toggle.width)
                .max(label_width),
            label_height + bar.height.max(slider.height) + toggle.height,
        )
    }

    fn measure(&self, constraints: Constraints) -> Size {
        SizePolicy::MinimumExpanding.resolve(self.size_hint(), constraints)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        let mut y = bounds.y;
        for label in self.labels_mut() {
            let height = label.size_hint().height;
            label.layout(Rect::new(bounds.x, y, bounds.width, height));
            y += height;
        }

        let toggle = self.toggle.size_hint();
        let row_height = (bounds.y + bounds.height - y - toggle.height).max(0.0);
        let slider_width = self.range_input.size_hint().width;
        let bar_width = (bounds.width - slider_width - SPACING).max(0.0);
        self.bar.layout(Rect::new(bounds.x, y, bar_width, row_height));
        self.range_input.layout(Rect::new(
            bounds.x + bar_width + SPACING,
            y,
            slider_width,
            row_height,
        ));
        self.toggle.layout(Rect::new(
            bounds.x,
            y + row_height,
            toggle.width,
            toggle.height,
        ));

        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        self.primary_label.paint(canvas);
        self.secondary_label.paint(canvas);
        self.bar.paint(canvas);
        self.range_input.paint(canvas);
        self.toggle.paint(canvas);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        let target = match event {
            Event::MouseDown { position, .. } => {
                self.grab = self.child_at(position);
                self.grab
            }
            Event::MouseMove { .. } => self.grab,
            Event::MouseUp { .. } => self.grab.take(),
        }?;
        let message = self.child_mut(target).event(event)?;
        self.handle_child_message(message)
    }

    fn tick(&mut self, dt: Duration) -> bool {
        self.toggle.tick(dt)
    }

    fn is_animating(&self) -> bool {
        self.toggle.is_animating()
    }

    fn pending_repaints(&self) -> u64 {
        self.bar.pending_repaints()
            + self.range_input.pending_repaints()
            + self.toggle.pending_repaints()
    }

    fn mark_painted(&self) {
        self.bar.mark_painted();
        self.range_input.mark_painted();
        self.toggle.mark_painted();
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
