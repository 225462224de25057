//! Testing harness for power bar widgets.
//!
//! Drives a root widget with synthetic pointer input and simulated time, and
//! records what it paints.
//!
//! ```ignore
//! let mut harness = Harness::new(toggle).viewport(80.0, 45.0);
//! harness.click_at(Point::new(40.0, 22.0)).advance(Duration::from_millis(600));
//! assert!(harness.root().is_checked());
//! ```

mod harness;

pub use harness::{Harness, FRAME_INTERVAL};
