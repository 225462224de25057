//! Demo window: a power bar above a standalone toggle.

use crate::config::DemoConfig;
use crate::error::DemoError;
use log::info;
use powerbar_core::{
    parse_color, widget::LayoutResult, Canvas, Constraints, Event, Rect, Size, SizePolicy,
    TypeId, Widget,
};
use powerbar_widgets::{AnimatedToggle, PowerBar};
use std::any::Any;
use std::time::Duration;

const SPACING: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    PowerBar,
    Toggle,
}

/// Top-level widget of the demo.
pub struct Window {
    power_bar: PowerBar,
    toggle: AnimatedToggle,
    grab: Option<Pane>,
    bounds: Rect,
}

impl Window {
    /// Assemble the window from config.
    pub fn from_config(config: &DemoConfig) -> Result<Self, DemoError> {
        let bar_config = &config.power_bar;
        let mut power_bar = PowerBar::new(
            bar_config.step_spec()?,
            bar_config.secondary,
            &bar_config.checked_color,
            &bar_config.pulse_checked_color,
        )?
        .labels(&bar_config.primary_label, &bar_config.secondary_label);
        if let Some(padding) = bar_config.padding {
            power_bar.set_padding(padding);
        }
        if let Some(ratio) = bar_config.fill_ratio {
            power_bar.set_fill_ratio(ratio)?;
        }
        if let Some(background) = bar_config.background_color()? {
            power_bar.set_background_color(background);
        }

        let toggle = AnimatedToggle::new()
            .checked_color(parse_color(&config.toggle.checked_color)?)
            .pulse_checked_color(parse_color(&config.toggle.pulse_checked_color)?);
        toggle
            .clicked()
            .connect(|checked| info!("secondary toggle clicked, checked={checked}"));

        Ok(Self {
            power_bar,
            toggle,
            grab: None,
            bounds: Rect::default(),
        })
    }

    /// The power bar.
    pub const fn power_bar(&self) -> &PowerBar {
        &self.power_bar
    }

    /// The power bar, mutably.
    pub fn power_bar_mut(&mut self) -> &mut PowerBar {
        &mut self.power_bar
    }

    /// The standalone toggle.
    pub const fn toggle(&self) -> &AnimatedToggle {
        &self.toggle
    }

    fn pane_mut(&mut self, pane: Pane) -> &mut dyn Widget {
        match pane {
            Pane::PowerBar => &mut self.power_bar,
            Pane::Toggle => &mut self.toggle,
        }
    }
}

impl Widget for Window {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn size_hint(&self) -> Size {
        let bar = self.power_bar.size_hint();
        let toggle = self.toggle.size_hint();
        Size::new(
            bar.width.max(toggle.width),
            bar.height + SPACING + toggle.height,
        )
    }

    fn measure(&self, constraints: Constraints) -> Size {
        SizePolicy::MinimumExpanding.resolve(self.size_hint(), constraints)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        let toggle = self.toggle.size_hint();
        let bar_height = (bounds.height - SPACING - toggle.height).max(0.0);
        self.power_bar
            .layout(Rect::new(bounds.x, bounds.y, bounds.width, bar_height));
        self.toggle.layout(Rect::new(
            bounds.x,
            bounds.y + bar_height + SPACING,
            toggle.width,
            toggle.height,
        ));
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        self.power_bar.paint(canvas);
        self.toggle.paint(canvas);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        let pane = match event {
            Event::MouseDown { position, .. } => {
                self.grab = if self.power_bar.bounds().contains_point(position) {
                    Some(Pane::PowerBar)
                } else if self.toggle.bounds().contains_point(position) {
                    Some(Pane::Toggle)
                } else {
                    None
                };
                self.grab
            }
            Event::MouseMove { .. } => self.grab,
            Event::MouseUp { .. } => self.grab.take(),
        }?;
        self.pane_mut(pane).event(event)
    }

    fn tick(&mut self, dt: Duration) -> bool {
        let bar = self.power_bar.tick(dt);
        let toggle = self.toggle.tick(dt);
        bar || toggle
    }

    fn is_animating(&self) -> bool {
        self.power_bar.is_animating() || self.toggle.is_animating()
    }

    fn pending_repaints(&self) -> u64 {
        self.power_bar.pending_repaints() + self.toggle.pending_repaints()
    }

    fn mark_painted(&self) {
        self.power_bar.mark_painted();
        self.toggle.mark_painted();
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
