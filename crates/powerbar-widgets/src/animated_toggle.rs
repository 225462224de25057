//! Animated toggle switch.
//!
//! A checkbox drawn as a pill-shaped track with a round handle. Flipping the
//! checked state slides the handle over 200 ms (cubic ease in/out), then
//! grows a translucent pulse around it from radius 10 to 20 over 350 ms.

use log::debug;
use powerbar_core::{
    widget::LayoutResult, AnimationSequence, BoxStyle, Canvas, Color, Constraints, Easing, Event,
    Margins, MouseButton, Point, Rect, RepaintHandle, Signal, Size, SizePolicy, StrokeStyle, Tween,
    TypeId, Widget,
};
use std::any::Any;
use std::time::Duration;

/// Duration of the handle slide.
pub const SLIDE_DURATION: Duration = Duration::from_millis(200);
/// Duration of the pulse after the slide.
pub const PULSE_DURATION: Duration = Duration::from_millis(350);
/// Pulse radius at the start of the pulse.
pub const PULSE_START_RADIUS: f64 = 10.0;
/// Pulse radius at the end of the pulse.
pub const PULSE_END_RADIUS: f64 = 20.0;

/// Message emitted when a click flips the toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleClicked {
    /// State after the click
    pub checked: bool,
}

/// Checked state including the slide in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    /// At rest, unchecked
    Unchecked,
    /// Handle sliding toward the checked end
    TransitioningToChecked,
    /// At rest, checked
    Checked,
    /// Handle sliding toward the unchecked end
    TransitioningToUnchecked,
}

/// Whether the pulse circle is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseState {
    /// No pulse
    Idle,
    /// Pulse growing
    Pulsing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Slide,
    Pulse,
}

/// Toggle switch with a slide-then-pulse animation.
pub struct AnimatedToggle {
    checked: bool,
    /// 0 = unchecked rest, 1 = checked rest; written only by `tick`
    handle_position: f64,
    pulse_radius: f64,
    bar_color: Color,
    bar_checked_color: Color,
    handle_color: Color,
    handle_checked_color: Color,
    pulse_unchecked_color: Color,
    pulse_checked_color: Color,
    animation: AnimationSequence<Stage>,
    clicked: Signal<bool>,
    checked_changed: Signal<bool>,
    repaint: RepaintHandle,
    bounds: Rect,
    pressed: bool,
}

impl Default for AnimatedToggle {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatedToggle {
    /// Content margins around the clickable area.
    pub const MARGINS: Margins = Margins::new(8.0, 0.0, 8.0, 0.0);

    /// Create a toggle with the stock gray/cyan palette.
    #[must_use]
    pub fn new() -> Self {
        let checked = Color::from_rgba8(0x00, 0xb0, 0xff, 0xff);
        Self {
            checked: false,
            handle_position: 0.0,
            pulse_radius: 0.0,
            bar_color: Color::GRAY,
            bar_checked_color: checked.lighter(1.5),
            handle_color: Color::WHITE,
            handle_checked_color: checked,
            pulse_unchecked_color: Color::from_rgba8(0x99, 0x99, 0x99, 0x44),
            pulse_checked_color: Color::from_rgba8(0x00, 0xb0, 0xee, 0x44),
            animation: AnimationSequence::new(),
            clicked: Signal::new(),
            checked_changed: Signal::new(),
            repaint: RepaintHandle::new(),
            bounds: Rect::default(),
            pressed: false,
        }
    }

    /// Set the unchecked track color.
    #[must_use]
    pub const fn bar_color(mut self, color: Color) -> Self {
        self.bar_color = color;
        self
    }

    /// Set the checked color. The checked track uses a lighter shade of it.
    #[must_use]
    pub fn checked_color(mut self, color: Color) -> Self {
        self.handle_checked_color = color;
        self.bar_checked_color = color.lighter(1.5);
        self
    }

    /// Set the unchecked handle color.
    #[must_use]
    pub const fn handle_color(mut self, color: Color) -> Self {
        self.handle_color = color;
        self
    }

    /// Set the pulse color used when unchecked.
    #[must_use]
    pub const fn pulse_unchecked_color(mut self, color: Color) -> Self {
        self.pulse_unchecked_color = color;
        self
    }

    /// Set the pulse color used when checked.
    #[must_use]
    pub const fn pulse_checked_color(mut self, color: Color) -> Self {
        self.pulse_checked_color = color;
        self
    }

    /// Start checked, with the handle already at rest.
    #[must_use]
    pub const fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self.handle_position = if checked { 1.0 } else { 0.0 };
        self
    }

    /// Whether the toggle is checked.
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        self.checked
    }

    /// Handle position in `[0, 1]`.
    #[must_use]
    pub const fn handle_position(&self) -> f64 {
        self.handle_position
    }

    /// Last pulse radius. Only meaningful while pulsing.
    #[must_use]
    pub const fn pulse_radius(&self) -> f64 {
        self.pulse_radius
    }

    /// Unchecked track color.
    #[must_use]
    pub const fn get_bar_color(&self) -> Color {
        self.bar_color
    }

    /// Checked track color.
    #[must_use]
    pub const fn get_bar_checked_color(&self) -> Color {
        self.bar_checked_color
    }

    /// Checked handle color.
    #[must_use]
    pub const fn get_checked_color(&self) -> Color {
        self.handle_checked_color
    }

    /// Pulse color used when checked.
    #[must_use]
    pub const fn get_pulse_checked_color(&self) -> Color {
        self.pulse_checked_color
    }

    /// Pulse color used when unchecked.
    #[must_use]
    pub const fn get_pulse_unchecked_color(&self) -> Color {
        self.pulse_unchecked_color
    }

    /// Emitted with the new state after a click flips the toggle.
    #[must_use]
    pub const fn clicked(&self) -> &Signal<bool> {
        &self.clicked
    }

    /// Emitted whenever the checked state changes.
    #[must_use]
    pub const fn checked_changed(&self) -> &Signal<bool> {
        &self.checked_changed
    }

    /// Repaint requests for this widget.
    #[must_use]
    pub const fn repaint_handle(&self) -> &RepaintHandle {
        &self.repaint
    }

    /// Checked state, including the slide.
    #[must_use]
    pub fn state(&self) -> ToggleState {
        let sliding = self.animation.running_stage() == Some(Stage::Slide);
        match (self.checked, sliding) {
            (true, true) => ToggleState::TransitioningToChecked,
            (true, false) => ToggleState::Checked,
            (false, true) => ToggleState::TransitioningToUnchecked,
            (false, false) => ToggleState::Unchecked,
        }
    }

    /// Pulse sub-state.
    #[must_use]
    pub fn pulse_state(&self) -> PulseState {
        if self.animation.running_stage() == Some(Stage::Pulse) {
            PulseState::Pulsing
        } else {
            PulseState::Idle
        }
    }

    /// Set the checked state. A change restarts the animation from wherever
    /// the handle is now.
    pub fn set_checked(&mut self, checked: bool) {
        if checked == self.checked {
            return;
        }
        self.checked = checked;
        self.restart_animation();
        self.checked_changed.emit(&checked);
        self.repaint.request();
    }

    /// Flip the checked state as a click would.
    pub fn toggle(&mut self) -> bool {
        self.set_checked(!self.checked);
        self.clicked.emit(&self.checked);
        self.checked
    }

    fn restart_animation(&mut self) {
        self.animation.stop();
        let target = if self.checked { 1.0 } else { 0.0 };
        debug!(
            "toggle animating handle {:.3} -> {target}",
            self.handle_position
        );
        self.animation = AnimationSequence::new()
            .then(
                Stage::Slide,
                Tween::new(self.handle_position, target, SLIDE_DURATION)
                    .with_easing(Easing::CubicInOut),
            )
            .then(
                Stage::Pulse,
                Tween::new(PULSE_START_RADIUS, PULSE_END_RADIUS, PULSE_DURATION),
            );
        self.animation.start();
    }

    /// Clickable area: the bounds minus the content margins.
    #[must_use]
    pub fn content_rect(&self) -> Rect {
        self.bounds.shrink(Self::MARGINS)
    }

    /// Handle radius for the current layout.
    #[must_use]
    pub fn handle_radius(&self) -> f32 {
        (0.24 * self.content_rect().height).round()
    }

    /// Track rectangle for the current layout.
    #[must_use]
    pub fn track_rect(&self) -> Rect {
        let content = self.content_rect();
        let width = 2.0f32.mul_add(-self.handle_radius(), content.width).max(0.0);
        Rect::new(0.0, 0.0, width, 0.4 * content.height).centered_at(content.center())
    }

    /// Handle center for the current layout and handle position.
    #[must_use]
    pub fn handle_center(&self) -> Point {
        let content = self.content_rect();
        let radius = self.handle_radius();
        let trail = 2.0f32.mul_add(-radius, content.width);
        let x = trail.mul_add(self.handle_position as f32, content.x + radius);
        Point::new(x, self.track_rect().center().y)
    }
}

impl std::fmt::Debug for AnimatedToggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedToggle")
            .field("checked", &self.checked)
            .field("handle_position", &self.handle_position)
            .field("pulse_radius", &self.pulse_radius)
            .field("state", &self.state())
            .field("pulse_state", &self.pulse_state())
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl Widget for AnimatedToggle {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn size_hint(&self) -> Size {
        Size::new(58.0, 45.0)
    }

    fn measure(&self, constraints: Constraints) -> Size {
        SizePolicy::Fixed.resolve(self.size_hint(), constraints)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.set_antialiasing(true);

        let track = self.track_rect();
        let track_color = if self.checked {
            self.bar_checked_color
        } else {
            self.bar_color
        };
        canvas.draw_rounded_rect(track, track.height / 2.0, &BoxStyle::fill(track_color));

        let center = self.handle_center();
        if self.pulse_state() == PulseState::Pulsing {
            let pulse_color = if self.checked {
                self.pulse_checked_color
            } else {
                self.pulse_unchecked_color
            };
            let radius = self.pulse_radius as f32;
            canvas.draw_ellipse(center, radius, radius, &BoxStyle::fill(pulse_color));
        }

        let handle = if self.checked {
            BoxStyle::fill(self.handle_checked_color)
        } else {
            BoxStyle::fill(self.handle_color).with_stroke(StrokeStyle::new(Color::LIGHT_GRAY, 1.0))
        };
        let radius = self.handle_radius();
        canvas.draw_ellipse(center, radius, radius, &handle);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } if self.content_rect().contains_point(position) => {
                self.pressed = true;
                None
            }
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } if self.pressed => {
                self.pressed = false;
                if self.content_rect().contains_point(position) {
                    let checked = self.toggle();
                    Some(Box::new(ToggleClicked { checked }))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn tick(&mut self, dt: Duration) -> bool {
        let updates = self.animation.tick(dt);
        for (stage, value) in &updates {
            match stage {
                Stage::Slide => self.handle_position = value.clamp(0.0, 1.0),
                Stage::Pulse => self.pulse_radius = *value,
            }
        }
        if updates.is_empty() {
            return false;
        }
        self.repaint.request();
        true
    }

    fn is_animating(&self) -> bool {
        self.animation.is_running()
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
    use powerbar_core::{DrawCommand, RecordingCanvas};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const FRAME: Duration = Duration::from_millis(16);

    fn laid_out() -> AnimatedToggle {
        let mut toggle = AnimatedToggle::new();
        toggle.layout(Rect::new(0.0, 0.0, 58.0, 45.0));
        toggle
    }

    fn run_to_rest(toggle: &mut AnimatedToggle) {
        let mut frames = 0;
        while toggle.is_animating() {
            toggle.tick(FRAME);
            frames += 1;
            assert!(frames < 100, "animation never settled");
        }
    }

    fn click(toggle: &mut AnimatedToggle) -> Option<Box<dyn Any + Send>> {
        let p = toggle.content_rect().center();
        toggle.event(&Event::press(p));
        toggle.event(&Event::release(p))
    }

    // ===== Construction Tests =====

    #[test]
    fn test_toggle_defaults() {
        let toggle = AnimatedToggle::new();
        assert!(!toggle.is_checked());
        assert_eq!(toggle.handle_position(), 0.0);
        assert_eq!(toggle.state(), ToggleState::Unchecked);
        assert_eq!(toggle.pulse_state(), PulseState::Idle);
        assert_eq!(toggle.get_bar_color(), Color::GRAY);
        assert_eq!(toggle.get_checked_color().to_hex(), "#00b0ff");
        assert_eq!(toggle.get_pulse_unchecked_color().to_hex_with_alpha(), "#44999999");
        assert_eq!(toggle.get_pulse_checked_color().to_hex_with_alpha(), "#4400b0ee");
        assert_eq!(toggle.size_hint(), Size::new(58.0, 45.0));
    }

    #[test]
    fn test_checked_track_is_lighter() {
        let color = Color::from_hex("#FFB000").unwrap();
        let toggle = AnimatedToggle::new().checked_color(color);
        assert_eq!(toggle.get_checked_color(), color);
        assert_eq!(toggle.get_bar_checked_color(), color.lighter(1.5));
    }

    #[test]
    fn test_with_checked_starts_at_rest() {
        let toggle = AnimatedToggle::new().with_checked(true);
        assert_eq!(toggle.state(), ToggleState::Checked);
        assert_eq!(toggle.handle_position(), 1.0);
        assert!(!toggle.is_animating());
    }

    // ===== Geometry Tests =====

    #[test]
    fn test_geometry_for_size_hint() {
        let toggle = laid_out();
        // content 42 x 45 at x = 8; radius round(10.8) = 11
        assert_eq!(toggle.content_rect(), Rect::new(8.0, 0.0, 42.0, 45.0));
        assert_eq!(toggle.handle_radius(), 11.0);
        let track = toggle.track_rect();
        assert_eq!(track.width, 20.0);
        assert!((track.height - 18.0).abs() < 1e-4);
        let (center, content_center) = (track.center(), toggle.content_rect().center());
        assert!((center.x - content_center.x).abs() < 1e-4);
        assert!((center.y - content_center.y).abs() < 1e-4);
        assert_eq!(toggle.handle_center().x, 19.0);
    }

    #[test]
    fn test_handle_reaches_far_end_when_checked() {
        let mut toggle = laid_out();
        toggle.set_checked(true);
        run_to_rest(&mut toggle);
        // content.x + r + (w - 2r) = 8 + 11 + 20
        assert_eq!(toggle.handle_center().x, 39.0);
    }

    // ===== Animation Tests =====

    #[test]
    fn test_check_runs_slide_then_pulse() {
        let mut toggle = laid_out();
        toggle.set_checked(true);
        assert_eq!(toggle.state(), ToggleState::TransitioningToChecked);

        toggle.tick(Duration::from_millis(100));
        assert!((toggle.handle_position() - 0.5).abs() < 1e-9);

        toggle.tick(Duration::from_millis(150));
        assert_eq!(toggle.handle_position(), 1.0);
        assert_eq!(toggle.state(), ToggleState::Checked);
        assert_eq!(toggle.pulse_state(), PulseState::Pulsing);
        assert!(toggle.pulse_radius() > PULSE_START_RADIUS);

        toggle.tick(Duration::from_millis(350));
        assert_eq!(toggle.pulse_state(), PulseState::Idle);
        assert_eq!(toggle.pulse_radius(), PULSE_END_RADIUS);
        assert!(!toggle.is_animating());
    }

    #[test]
    fn test_check_completes_at_one() {
        let mut toggle = laid_out();
        toggle.set_checked(true);
        run_to_rest(&mut toggle);
        assert_eq!(toggle.handle_position(), 1.0);
    }

    #[test]
    fn test_interrupted_check_reverses_monotonically() {
        let mut toggle = laid_out();
        toggle.set_checked(true);
        toggle.tick(Duration::from_millis(120));
        let interrupted_at = toggle.handle_position();
        assert!(interrupted_at > 0.0 && interrupted_at < 1.0);

        toggle.set_checked(false);
        assert_eq!(toggle.state(), ToggleState::TransitioningToUnchecked);
        assert_eq!(toggle.handle_position(), interrupted_at);

        let mut last = interrupted_at;
        while toggle.is_animating() {
            toggle.tick(FRAME);
            let pos = toggle.handle_position();
            assert!(pos <= last, "handle moved away from target");
            assert!((0.0..=1.0).contains(&pos));
            last = pos;
        }
        assert_eq!(toggle.handle_position(), 0.0);
    }

    #[test]
    fn test_setting_same_state_is_noop() {
        let mut toggle = laid_out();
        toggle.set_checked(false);
        assert!(!toggle.is_animating());
        assert_eq!(toggle.repaint_handle().pending(), 0);
    }

    #[test]
    fn test_tick_requests_repaint() {
        let mut toggle = laid_out();
        assert!(!toggle.tick(FRAME));
        toggle.set_checked(true);
        toggle.mark_painted();
        assert!(toggle.tick(FRAME));
        assert_eq!(toggle.pending_repaints(), 1);
    }

    // ===== Paint Tests =====

    #[test]
    fn test_paint_unchecked_track_then_outlined_handle() {
        let toggle = laid_out();
        let mut canvas = RecordingCanvas::new();
        toggle.paint(&mut canvas);

        assert!(canvas.antialiasing());
        assert_eq!(canvas.command_count(), 2);
        match &canvas.commands()[0] {
            DrawCommand::Rect { radius, style, .. } => {
                assert!((radius.top_left - 9.0).abs() < 1e-4);
                assert_eq!(style.fill, Some(Color::GRAY));
                assert!(style.stroke.is_none());
            }
            _ => panic!("Expected Rect command for track"),
        }
        match &canvas.commands()[1] {
            DrawCommand::Ellipse {
                radius_x, style, ..
            } => {
                assert_eq!(*radius_x, 11.0);
                assert_eq!(style.fill, Some(Color::WHITE));
                assert_eq!(
                    style.stroke.as_ref().map(|s| s.color),
                    Some(Color::LIGHT_GRAY)
                );
            }
            _ => panic!("Expected Ellipse command for handle"),
        }
    }

    #[test]
    fn test_paint_pulse_only_while_pulsing() {
        let mut toggle = laid_out();
        toggle.set_checked(true);

        let mut canvas = RecordingCanvas::new();
        toggle.paint(&mut canvas);
        assert_eq!(canvas.command_count(), 2, "no pulse during slide");

        toggle.tick(Duration::from_millis(300));
        canvas.clear();
        toggle.paint(&mut canvas);
        assert_eq!(canvas.command_count(), 3);
        match &canvas.commands()[1] {
            DrawCommand::Ellipse {
                center,
                radius_x,
                style,
                ..
            } => {
                assert_eq!(*center, toggle.handle_center());
                assert_eq!(*radius_x, toggle.pulse_radius() as f32);
                assert_eq!(style.fill, Some(toggle.get_pulse_checked_color()));
            }
            _ => panic!("Expected Ellipse command for pulse"),
        }

        run_to_rest(&mut toggle);
        canvas.clear();
        toggle.paint(&mut canvas);
        assert_eq!(canvas.command_count(), 2, "stale pulse radius not drawn");
    }

    #[test]
    fn test_paint_checked_uses_checked_colors() {
        let toggle = {
            let mut t = AnimatedToggle::new().with_checked(true);
            t.layout(Rect::new(0.0, 0.0, 58.0, 45.0));
            t
        };
        let mut canvas = RecordingCanvas::new();
        toggle.paint(&mut canvas);
        assert_eq!(
            canvas.commands()[0].fill_color(),
            Some(toggle.get_bar_checked_color())
        );
        assert_eq!(
            canvas.commands()[1].fill_color(),
            Some(toggle.get_checked_color())
        );
    }

    // ===== Event Tests =====

    #[test]
    fn test_click_inside_content_toggles() {
        let mut toggle = laid_out();
        let msg = click(&mut toggle);
        let clicked = msg.and_then(|m| m.downcast::<ToggleClicked>().ok());
        assert_eq!(clicked.map(|c| c.checked), Some(true));
        assert!(toggle.is_checked());
    }

    #[test]
    fn test_click_in_margin_ignored() {
        let mut toggle = laid_out();
        let p = Point::new(3.0, 20.0);
        toggle.event(&Event::press(p));
        assert!(toggle.event(&Event::release(p)).is_none());
        assert!(!toggle.is_checked());
    }

    #[test]
    fn test_release_outside_cancels_click() {
        let mut toggle = laid_out();
        toggle.event(&Event::press(Point::new(20.0, 20.0)));
        assert!(toggle
            .event(&Event::release(Point::new(100.0, 20.0)))
            .is_none());
        assert!(!toggle.is_checked());
    }

    #[test]
    fn test_click_emits_clicked_and_checked_changed() {
        let mut toggle = laid_out();
        let clicks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&clicks);
        toggle.clicked().connect(move |c| sink.lock().unwrap().push(*c));
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);
        toggle.checked_changed().connect(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        click(&mut toggle);
        click(&mut toggle);
        toggle.set_checked(true);

        assert_eq!(*clicks.lock().unwrap(), vec![true, false]);
        assert_eq!(changes.load(Ordering::Relaxed), 3);
    }
}
