//! Integration tests for powerbar-core.
//!
//! These tests verify the public API works correctly end-to-end.

use powerbar_core::{
    AnimationSequence, BoxStyle, Canvas, Color, Constraints, DrawCommand, Easing, Event, Margins,
    Point, RecordingCanvas, Rect, RepaintHandle, SharedValue, Signal, Size, SizePolicy, Tween,
    WidgetError,
};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Color Integration Tests
// =============================================================================

#[test]
fn test_color_parse_forms() {
    let named: Color = "red".parse().expect("named color");
    let hex: Color = "#ff0000".parse().expect("hex color");
    assert_eq!(named, hex);

    let translucent = Color::parse("#44FFB000").expect("alpha-first hex");
    assert!((translucent.a - 68.0 / 255.0).abs() < 0.001);
    assert_eq!(translucent.to_hex(), "#ffb000");
}

#[test]
fn test_color_display_roundtrip() {
    let original = Color::parse("#4400B0EE").expect("valid");
    let reparsed = Color::parse(&original.to_string()).expect("display output parses");
    assert_eq!(original.to_hex_with_alpha(), reparsed.to_hex_with_alpha());
}

#[test]
fn test_color_error_wraps_into_widget_error() {
    let err = powerbar_core::parse_color("no-such-color").unwrap_err();
    assert!(matches!(err, WidgetError::InvalidColor { .. }));
    assert!(err.to_string().contains("no-such-color"));
}

// =============================================================================
// Layout Integration Tests
// =============================================================================

#[test]
fn test_minimum_expanding_fills_window() {
    let hint = Size::new(40.0, 120.0);
    let window = Constraints::loose(Size::new(200.0, 300.0));
    assert_eq!(
        SizePolicy::MinimumExpanding.resolve(hint, window),
        Size::new(200.0, 300.0)
    );
    assert_eq!(SizePolicy::Fixed.resolve(hint, window), hint);
}

#[test]
fn test_content_rect_from_margins() {
    let bounds = Rect::new(10.0, 0.0, 58.0, 45.0);
    let content = bounds.shrink(Margins::new(8.0, 0.0, 8.0, 0.0));
    assert_eq!(content, Rect::new(18.0, 0.0, 42.0, 45.0));
    assert!(content.contains_point(&Point::new(30.0, 20.0)));
    assert!(!content.contains_point(&Point::new(12.0, 20.0)));
}

// =============================================================================
// Canvas Integration Tests
// =============================================================================

#[test]
fn test_recording_canvas_through_trait_object() {
    let mut canvas = RecordingCanvas::new();
    {
        let surface: &mut dyn Canvas = &mut canvas;
        surface.set_antialiasing(true);
        surface.fill_rect(Rect::new(0.0, 0.0, 40.0, 120.0), Color::BLACK);
        surface.draw_ellipse(Point::new(20.0, 20.0), 5.0, 5.0, &BoxStyle::fill(Color::WHITE));
    }
    assert!(canvas.antialiasing());
    assert_eq!(canvas.command_count(), 2);
    assert_eq!(canvas.commands()[0].fill_color(), Some(Color::BLACK));

    let json = serde_json::to_string(canvas.commands()).expect("serializable");
    let back: Vec<DrawCommand> = serde_json::from_str(&json).expect("deserializable");
    assert_eq!(back, canvas.commands());
}

// =============================================================================
// Notification Integration Tests
// =============================================================================

#[test]
fn test_signal_drives_repaint_of_shared_value_reader() {
    let model = SharedValue::new(0);
    let repaint = RepaintHandle::new();
    let changed = Signal::<i32>::new();

    let handle = repaint.clone();
    changed.connect(move |_| handle.request());

    model.set(42);
    changed.emit(&42);

    assert_eq!(repaint.take(), 1);
    assert_eq!(model.clone().get(), 42);
}

#[test]
fn test_signal_collects_values() {
    let signal = Signal::<i32>::new();
    let total = Arc::new(AtomicI32::new(0));
    let sink = Arc::clone(&total);
    signal.connect(move |v| {
        sink.fetch_add(*v, Ordering::Relaxed);
    });
    for v in [1, 2, 3] {
        signal.emit(&v);
    }
    assert_eq!(total.load(Ordering::Relaxed), 6);
}

// =============================================================================
// Animation Integration Tests
// =============================================================================

#[test]
fn test_two_stage_animation_at_frame_rate() {
    let mut sequence = AnimationSequence::new()
        .then(
            "slide",
            Tween::new(0.0, 1.0, Duration::from_millis(200)).with_easing(Easing::CubicInOut),
        )
        .then("pulse", Tween::new(10.0, 20.0, Duration::from_millis(350)));
    sequence.start();

    let mut last_slide = 0.0;
    let mut frames = 0;
    while sequence.is_running() {
        for (key, value) in sequence.tick(Duration::from_millis(16)) {
            if key == "slide" {
                assert!(value >= last_slide);
                last_slide = value;
            }
        }
        frames += 1;
        assert!(frames < 100, "animation never finished");
    }
    assert_eq!(last_slide, 1.0);
    assert_eq!(sequence.stage("pulse").map(Tween::value), Some(20.0));
}

// =============================================================================
// Event Integration Tests
// =============================================================================

#[test]
fn test_event_json_shape() {
    let json = serde_json::to_value(Event::press(Point::new(1.0, 2.0))).expect("serializable");
    assert_eq!(json["MouseDown"]["button"], "Left");
    assert_eq!(json["MouseDown"]["position"]["x"], 1.0);
}
