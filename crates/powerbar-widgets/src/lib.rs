//! Power bar widgets: a segmented level meter, the vertical range input that
//! drives it, an animated on/off toggle and the composite that ties them
//! together.

pub mod animated_toggle;
pub mod label;
pub mod power_bar;
pub mod range_input;
pub mod segment_bar;

pub use animated_toggle::{AnimatedToggle, PulseState, ToggleClicked, ToggleState};
pub use label::Label;
pub use power_bar::{
    Mode, ModeChanged, PowerBar, RangeOperation, DEFAULT_CHECKED_COLOR,
    DEFAULT_PULSE_CHECKED_COLOR,
};
pub use range_input::{RangeChanged, RangeInput, RangeModel};
pub use segment_bar::{lit_count, SegmentBar, StepSpec, ValueClicked};
