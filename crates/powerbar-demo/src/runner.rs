//! Replays scripted actions against the window and captures frames.

use crate::config::Action;
use crate::error::DemoError;
use crate::window::Window;
use log::{debug, info, trace};
use powerbar_core::{DrawCommand, Event, Point, RecordingCanvas, Rect, Widget};
use powerbar_widgets::{Mode, ModeChanged, RangeChanged, ToggleClicked};
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::time::Duration;

/// A painted frame.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub index: usize,
    pub elapsed_ms: u64,
    pub mode: Mode,
    pub minimum: i32,
    pub maximum: i32,
    pub value: i32,
    pub mode_toggle_checked: bool,
    pub toggle_checked: bool,
    pub animating: bool,
    pub commands: Vec<DrawCommand>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {:>3} @ {:>5}ms  {:?} {}..={} value={:<3} mode_toggle={} toggle={}{} ({} commands)",
            self.index,
            self.elapsed_ms,
            self.mode,
            self.minimum,
            self.maximum,
            self.value,
            self.mode_toggle_checked,
            self.toggle_checked,
            if self.animating { " animating" } else { "" },
            self.commands.len()
        )
    }
}

/// Drives a [`Window`] through a script at a fixed frame interval.
pub struct Runner {
    window: Window,
    interval: Duration,
    elapsed: Duration,
    frames: Vec<Frame>,
}

impl Runner {
    /// Lay the window out at `width` x `height`.
    pub fn new(mut window: Window, width: f32, height: f32, interval: Duration) -> Self {
        window.layout(Rect::new(0.0, 0.0, width, height));
        Self {
            window,
            interval,
            elapsed: Duration::ZERO,
            frames: Vec::new(),
        }
    }

    /// The window being driven.
    pub const fn window(&self) -> &Window {
        &self.window
    }

    /// Run every action, then `trailing_frames` more frames. Returns the
    /// initial frame plus one frame per repaint.
    pub fn run(
        &mut self,
        actions: &[Action],
        trailing_frames: u32,
    ) -> Result<Vec<Frame>, DemoError> {
        self.capture();
        for action in actions {
            self.apply(action)?;
            self.capture_if_dirty();
        }
        for _ in 0..trailing_frames {
            self.step();
        }
        info!(
            "ran {} actions over {}ms, {} frames",
            actions.len(),
            self.elapsed.as_millis(),
            self.frames.len()
        );
        Ok(std::mem::take(&mut self.frames))
    }

    /// Apply one action.
    pub fn apply(&mut self, action: &Action) -> Result<(), DemoError> {
        debug!("action {action:?}");
        match action {
            Action::Click { x, y } => self.click(Point::new(*x, *y)),
            Action::Drag { from, to, steps } => {
                let from = Point::new(from[0], from[1]);
                let to = Point::new(to[0], to[1]);
                self.dispatch(&Event::press(from));
                let steps = (*steps).max(1);
                for i in 1..=steps {
                    let t = i as f32 / steps as f32;
                    self.dispatch(&Event::MouseMove {
                        position: Point::new(
                            (to.x - from.x).mul_add(t, from.x),
                            (to.y - from.y).mul_add(t, from.y),
                        ),
                    });
                }
                self.dispatch(&Event::release(to));
            }
            Action::ClickModeToggle => {
                let centre = self.window.power_bar().toggle().content_rect().center();
                self.click(centre);
            }
            Action::ClickToggle => {
                let centre = self.window.toggle().content_rect().center();
                self.click(centre);
            }
            Action::Wait { ms } => {
                let frames = ms.div_ceil(self.interval.as_millis().max(1) as u64);
                for _ in 0..frames {
                    self.step();
                }
            }
            Action::SetMode { mode } => self.window.power_bar_mut().set_mode(*mode),
            Action::Invoke { name, args } => {
                if let Some(result) = self.window.power_bar_mut().invoke(name, args)? {
                    info!("{name}() = {result}");
                }
            }
        }
        Ok(())
    }

    fn click(&mut self, position: Point) {
        self.dispatch(&Event::press(position));
        self.dispatch(&Event::release(position));
    }

    fn dispatch(&mut self, event: &Event) {
        if let Some(message) = self.window.event(event) {
            log_message(message.as_ref());
        }
    }

    fn step(&mut self) {
        self.window.tick(self.interval);
        self.elapsed += self.interval;
        self.capture_if_dirty();
    }

    fn capture_if_dirty(&mut self) {
        if self.window.pending_repaints() > 0 {
            self.capture();
        }
    }

    fn capture(&mut self) {
        let mut canvas = RecordingCanvas::new();
        self.window.paint(&mut canvas);
        self.window.mark_painted();

        let power_bar = self.window.power_bar();
        let range = power_bar.range();
        let frame = Frame {
            index: self.frames.len(),
            elapsed_ms: self.elapsed.as_millis() as u64,
            mode: power_bar.mode(),
            minimum: range.minimum,
            maximum: range.maximum,
            value: range.value,
            mode_toggle_checked: power_bar.toggle().is_checked(),
            toggle_checked: self.window.toggle().is_checked(),
            animating: self.window.is_animating(),
            commands: canvas.take_commands(),
        };
        trace!("captured {frame}");
        self.frames.push(frame);
    }
}

fn log_message(message: &(dyn Any + Send)) {
    if let Some(changed) = message.downcast_ref::<ModeChanged>() {
        info!("power bar mode changed to {:?}", changed.mode);
    } else if let Some(changed) = message.downcast_ref::<RangeChanged>() {
        info!("value changed to {}", changed.value);
    } else if let Some(clicked) = message.downcast_ref::<ToggleClicked>() {
        debug!("toggle clicked, checked={}", clicked.checked);
    }
}
