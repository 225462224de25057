//! Core types and traits for the powerbar widgets.
//!
//! This crate stands in for the host toolkit:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`], [`Margins`]
//! - Color representation: [`Color`] with name and hex parsing
//! - Layout constraints: [`Constraints`], [`SizePolicy`]
//! - Pointer events: [`Event`]
//! - Drawing: the [`Canvas`] trait and the [`RecordingCanvas`] mock surface
//! - Notification: [`Signal`], [`SharedValue`], [`RepaintHandle`]
//! - Tick-driven animation: [`Tween`], [`AnimationSequence`]

pub mod animation;
pub mod binding;
mod canvas;
mod color;
mod constraints;
pub mod draw;
mod error;
mod event;
mod geometry;
pub mod widget;

pub use animation::{AnimationSequence, Easing, Tween};
pub use binding::{SharedValue, Signal, SubscriptionId};
pub use canvas::RecordingCanvas;
pub use color::{Color, ColorParseError};
pub use constraints::{Constraints, SizePolicy};
pub use draw::{BoxStyle, DrawCommand, StrokeStyle};
pub use error::{parse_color, WidgetError};
pub use event::{Event, MouseButton};
pub use geometry::{CornerRadius, Margins, Point, Rect, Size};
pub use widget::{Canvas, LayoutResult, RepaintHandle, TextStyle, TypeId, Widget};
