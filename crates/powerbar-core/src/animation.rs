//! Tick-driven animation with easing and sequential stages.
//!
//! Nothing here reads a clock. Owners call `tick(dt)` with the elapsed frame
//! time and apply the returned values to their own fields.

use std::time::Duration;

// =============================================================================
// Easing Functions
// =============================================================================

/// Easing curves used by the widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Cubic ease in and out
    CubicInOut,
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => Self::ease_in_out_cubic(t),
        }
    }

    fn ease_in_out_cubic(t: f64) -> f64 {
        if t < 0.5 {
            4.0 * t * t * t
        } else {
            1.0 - (-2.0f64).mul_add(t, 2.0).powi(3) / 2.0
        }
    }
}

// =============================================================================
// Tween
// =============================================================================

/// Interpolation of one scalar over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    /// Start value
    pub start: f64,
    /// End value
    pub end: f64,
    /// Total duration
    pub duration: Duration,
    /// Time advanced so far
    pub elapsed: Duration,
    /// Easing function
    pub easing: Easing,
}

impl Tween {
    /// Create a linear tween.
    #[must_use]
    pub const fn new(start: f64, end: f64, duration: Duration) -> Self {
        Self {
            start,
            end,
            duration,
            elapsed: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    /// Set easing function.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Progress from 0.0 to 1.0.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        }
    }

    /// Get current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        let eased = self.easing.apply(self.progress());
        (self.end - self.start).mul_add(eased, self.start)
    }

    /// Whether the tween has reached its end.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Rewind to the start.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Advance by `dt`, returning the time left over past the end.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        let total = self.elapsed + dt;
        if total >= self.duration {
            self.elapsed = self.duration;
            total - self.duration
        } else {
            self.elapsed = total;
            Duration::ZERO
        }
    }
}

// =============================================================================
// AnimationSequence
// =============================================================================

/// Stages run one after another, each driving the property named by its key.
#[derive(Debug, Clone)]
pub struct AnimationSequence<K> {
    stages: Vec<(K, Tween)>,
    current: Option<usize>,
}

impl<K> Default for AnimationSequence<K> {
    fn default() -> Self {
        Self {
            stages: Vec::new(),
            current: None,
        }
    }
}

impl<K: Copy + PartialEq> AnimationSequence<K> {
    /// Create an empty, stopped sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    #[must_use]
    pub fn then(mut self, key: K, tween: Tween) -> Self {
        self.stages.push((key, tween));
        self
    }

    /// Run from the first stage.
    pub fn start(&mut self) {
        for (_, tween) in &mut self.stages {
            tween.reset();
        }
        self.current = if self.stages.is_empty() { None } else { Some(0) };
    }

    /// Stop wherever it is. Values already applied stay applied.
    pub fn stop(&mut self) {
        self.current = None;
    }

    /// Whether any stage is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Key of the running stage.
    #[must_use]
    pub fn running_stage(&self) -> Option<K> {
        self.current.map(|i| self.stages[i].0)
    }

    /// Tween of the stage with `key`.
    #[must_use]
    pub fn stage(&self, key: K) -> Option<&Tween> {
        self.stages.iter().find(|(k, _)| *k == key).map(|(_, t)| t)
    }

    /// Advance by `dt`, returning the new value of every stage touched.
    ///
    /// Time left over when a stage finishes carries into the next one, so a
    /// single long tick can finish one stage and start the next.
    pub fn tick(&mut self, dt: Duration) -> Vec<(K, f64)> {
        let mut updates = Vec::new();
        let mut remaining = dt;
        while let Some(index) = self.current {
            let (key, tween) = &mut self.stages[index];
            remaining = tween.advance(remaining);
            updates.push((*key, tween.value()));
            if !tween.is_complete() {
                break;
            }
            let next = index + 1;
            self.current = (next < self.stages.len()).then_some(next);
        }
        updates
    }
}
