//! Test harness for interacting with widgets.

use log::trace;
use powerbar_core::{Event, Point, RecordingCanvas, Rect, Widget};
use std::any::Any;
use std::collections::VecDeque;
use std::time::Duration;

/// Simulated frame length used by [`Harness::advance`].
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Owns a root widget and feeds it events, frames and paints.
pub struct Harness<W: Widget> {
    /// Root widget being tested
    root: W,
    /// Event queue for simulation
    event_queue: VecDeque<Event>,
    /// Messages returned by the root
    messages: Vec<Box<dyn Any + Send>>,
    /// Current viewport
    viewport: Rect,
    /// Frames advanced so far
    frames: u64,
}

impl<W: Widget> Harness<W> {
    /// Create a harness and lay the root out in a 1280x720 viewport.
    pub fn new(root: W) -> Self {
        let mut harness = Self {
            root,
            event_queue: VecDeque::new(),
            messages: Vec::new(),
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            frames: 0,
        };
        harness.relayout();
        harness
    }

    /// Set the viewport size and lay the root out again.
    #[must_use]
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.relayout();
        self
    }

    /// The root widget.
    pub const fn root(&self) -> &W {
        &self.root
    }

    /// The root widget, mutably.
    pub fn root_mut(&mut self) -> &mut W {
        &mut self.root
    }

    /// Lay the root out in the current viewport.
    pub fn relayout(&mut self) -> &mut Self {
        self.root.layout(self.viewport);
        self
    }

    // === Event Simulation ===

    /// Press and release the left button at `position`.
    pub fn click_at(&mut self, position: Point) -> &mut Self {
        self.event_queue.push_back(Event::MouseMove { position });
        self.event_queue.push_back(Event::press(position));
        self.event_queue.push_back(Event::release(position));
        self.process_events();
        self
    }

    /// Press at the center of `bounds` and release there.
    pub fn click_rect(&mut self, bounds: Rect) -> &mut Self {
        self.click_at(bounds.center())
    }

    /// Press at `from`, move in `steps` increments to `to`, then release.
    pub fn drag(&mut self, from: Point, to: Point, steps: u32) -> &mut Self {
        self.event_queue.push_back(Event::press(from));
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let position = Point::new(
                (to.x - from.x).mul_add(t, from.x),
                (to.y - from.y).mul_add(t, from.y),
            );
            self.event_queue.push_back(Event::MouseMove { position });
        }
        self.event_queue.push_back(Event::release(to));
        self.process_events();
        self
    }

    /// Dispatch a single event.
    pub fn send(&mut self, event: Event) -> &mut Self {
        self.event_queue.push_back(event);
        self.process_events();
        self
    }

    // === Time ===

    /// Advance simulated time in [`FRAME_INTERVAL`] frames. A trailing partial
    /// frame is delivered as a shorter tick.
    pub fn advance(&mut self, duration: Duration) -> &mut Self {
        let mut remaining = duration;
        while !remaining.is_zero() {
            let frame = remaining.min(FRAME_INTERVAL);
            self.root.tick(frame);
            self.frames += 1;
            remaining -= frame;
        }
        trace!("advanced {duration:?} over {} frames", self.frames);
        self
    }

    /// Tick until the root stops animating, giving up after `max_frames`.
    /// Returns the number of frames ticked.
    pub fn settle(&mut self, max_frames: u32) -> u32 {
        let mut ticked = 0;
        while self.root.is_animating() && ticked < max_frames {
            self.root.tick(FRAME_INTERVAL);
            self.frames += 1;
            ticked += 1;
        }
        ticked
    }

    /// Frames advanced since creation.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    // === Painting ===

    /// Paint the root into a fresh canvas and clear its repaint requests.
    pub fn paint(&mut self) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new();
        self.root.paint(&mut canvas);
        self.root.mark_painted();
        canvas
    }

    /// Repaints the root has requested since the last [`Harness::paint`].
    pub fn pending_repaints(&self) -> u64 {
        self.root.pending_repaints()
    }

    // === Messages ===

    /// Messages the root returned, oldest first.
    pub fn messages(&self) -> &[Box<dyn Any + Send>] {
        &self.messages
    }

    /// Copies of every returned message of type `M`.
    pub fn messages_of<M: Any + Clone>(&self) -> Vec<M> {
        self.messages
            .iter()
            .filter_map(|m| m.downcast_ref::<M>())
            .cloned()
            .collect()
    }

    /// Drop all recorded messages.
    pub fn clear_messages(&mut self) -> &mut Self {
        self.messages.clear();
        self
    }

    // === Internal ===

    fn process_events(&mut self) {
        while let Some(event) = self.event_queue.pop_front() {
            if let Some(message) = self.root.event(&event) {
                self.messages.push(message);
            }
        }
    }
}
