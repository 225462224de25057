//! TOML configuration for the demo window and its scripted run.
//!
//! ```toml
//! [power_bar]
//! steps = ["#5e4fa2", "#3288bd", "#66c2a5"]   # or an integer count
//! secondary = false
//!
//! [toggle]
//! checked_color = "#FFB000"
//!
//! [run]
//! format = "text"
//! [[run.actions]]
//! action = "click"
//! x = 20.0
//! y = 60.0
//! ```

use crate::error::DemoError;
use clap::ValueEnum;
use log::debug;
use powerbar_core::{parse_color, Color, WidgetError};
use powerbar_widgets::{Mode, StepSpec, DEFAULT_CHECKED_COLOR, DEFAULT_PULSE_CHECKED_COLOR};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Whole demo configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub power_bar: PowerBarConfig,
    pub toggle: ToggleConfig,
    pub run: RunConfig,
}

impl DemoConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, DemoError> {
        let text = std::fs::read_to_string(path).map_err(|source| DemoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Self::from_toml(&text)
    }

    /// Parse config text.
    pub fn from_toml(text: &str) -> Result<Self, DemoError> {
        Ok(toml::from_str(text)?)
    }
}

/// `[power_bar]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerBarConfig {
    /// Segment count or list of segment colors.
    pub steps: toml::Value,
    /// Start in secondary mode.
    pub secondary: bool,
    pub checked_color: String,
    pub pulse_checked_color: String,
    pub padding: Option<u32>,
    pub fill_ratio: Option<f32>,
    pub background: Option<String>,
    pub primary_label: String,
    pub secondary_label: String,
}

impl Default for PowerBarConfig {
    fn default() -> Self {
        let palette = ["#5e4fa2", "#3288bd", "#66c2a5", "#fee08b", "#fdae61"];
        Self {
            steps: toml::Value::Array(
                palette
                    .iter()
                    .map(|c| toml::Value::String((*c).to_string()))
                    .collect(),
            ),
            secondary: false,
            checked_color: DEFAULT_CHECKED_COLOR.to_string(),
            pulse_checked_color: DEFAULT_PULSE_CHECKED_COLOR.to_string(),
            padding: None,
            fill_ratio: None,
            background: None,
            primary_label: "Primary range".to_string(),
            secondary_label: "Secondary range".to_string(),
        }
    }
}

impl PowerBarConfig {
    /// Interpret `steps` as a count or a color list.
    pub fn step_spec(&self) -> Result<StepSpec, WidgetError> {
        match &self.steps {
            toml::Value::Integer(count) => usize::try_from(*count)
                .map(StepSpec::Count)
                .map_err(|_| WidgetError::invalid_argument(format!("negative step count {count}"))),
            toml::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    toml::Value::String(color) => parse_color(color),
                    other => Err(WidgetError::invalid_argument(format!(
                        "step color must be a string, got {other}"
                    ))),
                })
                .collect::<Result<Vec<Color>, _>>()
                .map(StepSpec::Colors),
            other => Err(WidgetError::invalid_argument(format!(
                "steps must be an integer or a list of colors, got {}",
                other.type_str()
            ))),
        }
    }

    /// Parsed background color, if configured.
    pub fn background_color(&self) -> Result<Option<Color>, WidgetError> {
        self.background.as_deref().map(parse_color).transpose()
    }
}

/// `[toggle]` section: the standalone toggle beside the power bar.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToggleConfig {
    pub checked_color: String,
    pub pulse_checked_color: String,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            checked_color: "#FFB000".to_string(),
            pulse_checked_color: "#44FFB000".to_string(),
        }
    }
}

/// How frames are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One JSON object per frame, draw commands included
    Json,
    /// One summary line per frame
    #[default]
    Text,
}

/// `[run]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub width: f32,
    pub height: f32,
    pub frame_interval_ms: u64,
    /// Frames ticked after the scripted actions.
    pub trailing_frames: u32,
    pub format: OutputFormat,
    pub actions: Vec<Action>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 160.0,
            height: 320.0,
            frame_interval_ms: 16,
            trailing_frames: 40,
            format: OutputFormat::default(),
            actions: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Frame interval, never zero.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

const fn default_drag_steps() -> u32 {
    8
}

/// One scripted input step. Coordinates are window coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Press and release at a point.
    Click { x: f32, y: f32 },
    /// Press, move, release.
    Drag {
        from: [f32; 2],
        to: [f32; 2],
        #[serde(default = "default_drag_steps")]
        steps: u32,
    },
    /// Click the power bar's mode toggle.
    ClickModeToggle,
    /// Click the standalone toggle.
    ClickToggle,
    /// Let time pass, ticking frames.
    Wait { ms: u64 },
    /// Switch the power bar mode directly.
    SetMode { mode: Mode },
    /// Call a range operation on the power bar by name.
    Invoke {
        name: String,
        #[serde(default)]
        args: Vec<i32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DemoConfig::from_toml("").unwrap();
        assert!(!config.power_bar.secondary);
        assert_eq!(config.power_bar.step_spec().unwrap().into_colors().unwrap().len(), 5);
        assert_eq!(config.toggle.checked_color, "#FFB000");
        assert_eq!(config.run.format, OutputFormat::Text);
        assert_eq!(config.run.frame_interval(), Duration::from_millis(16));
        assert!(config.run.actions.is_empty());
    }

    #[test]
    fn test_integer_steps() {
        let config = DemoConfig::from_toml("[power_bar]\nsteps = 10\n").unwrap();
        assert_eq!(config.power_bar.step_spec().unwrap(), StepSpec::Count(10));
    }

    #[test]
    fn test_bad_steps_rejected() {
        let config = DemoConfig::from_toml("[power_bar]\nsteps = 1.5\n").unwrap();
        assert!(matches!(
            config.power_bar.step_spec(),
            Err(WidgetError::InvalidArgument(_))
        ));

        let config = DemoConfig::from_toml("[power_bar]\nsteps = -2\n").unwrap();
        assert!(config.power_bar.step_spec().is_err());

        let config = DemoConfig::from_toml("[power_bar]\nsteps = [\"#zzzzzz\"]\n").unwrap();
        assert!(matches!(
            config.power_bar.step_spec(),
            Err(WidgetError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_actions_parse() {
        let text = r#"
            [run]
            format = "json"

            [[run.actions]]
            action = "click"
            x = 10.0
            y = 20.0

            [[run.actions]]
            action = "drag"
            from = [0.0, 0.0]
            to = [0.0, 50.0]

            [[run.actions]]
            action = "wait"
            ms = 250

            [[run.actions]]
            action = "set_mode"
            mode = "secondary"

            [[run.actions]]
            action = "invoke"
            name = "setValue"
            args = [1]

            [[run.actions]]
            action = "click_mode_toggle"
        "#;
        let config = DemoConfig::from_toml(text).unwrap();
        assert_eq!(config.run.format, OutputFormat::Json);
        assert_eq!(
            config.run.actions,
            vec![
                Action::Click { x: 10.0, y: 20.0 },
                Action::Drag {
                    from: [0.0, 0.0],
                    to: [0.0, 50.0],
                    steps: 8
                },
                Action::Wait { ms: 250 },
                Action::SetMode {
                    mode: Mode::Secondary
                },
                Action::Invoke {
                    name: "setValue".to_string(),
                    args: vec![1]
                },
                Action::ClickModeToggle,
            ]
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            DemoConfig::from_toml("[power_bar]\ncolour = \"red\"\n"),
            Err(DemoError::Toml(_))
        ));
    }

    #[test]
    fn test_background_color() {
        let config = DemoConfig::from_toml("[power_bar]\nbackground = \"white\"\n").unwrap();
        assert_eq!(config.power_bar.background_color().unwrap(), Some(Color::WHITE));
        assert_eq!(PowerBarConfig::default().background_color().unwrap(), None);
    }

    #[test]
    fn test_shipped_demo_config_parses() {
        let config = DemoConfig::from_toml(include_str!("../demo.toml")).unwrap();
        assert_eq!(config.power_bar.step_spec().unwrap().into_colors().unwrap().len(), 5);
        assert_eq!(config.run.actions.len(), 7);
        assert_eq!(config.run.actions[2], Action::ClickModeToggle);
    }

    #[test]
    fn test_missing_file() {
        let err = DemoConfig::load(Path::new("/nonexistent/powerbar.toml")).unwrap_err();
        assert!(matches!(err, DemoError::Io { .. }));
        assert!(err.to_string().contains("powerbar.toml"));
    }
}
