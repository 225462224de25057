//! Headless power bar demo.
//!
//! Builds the demo window (a power bar plus a standalone toggle), replays the
//! scripted actions from the config, ticks animations at a fixed frame
//! interval and writes every painted frame to stdout.

mod config;
mod error;
mod runner;
mod window;

use clap::Parser;
use config::{DemoConfig, OutputFormat};
use error::DemoError;
use log::{error, info};
use runner::{Frame, Runner};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use window::Window;

#[derive(Parser)]
#[command(name = "powerbar-demo")]
#[command(about = "Drive the power bar widgets and dump the painted frames")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (overrides the config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Frames to tick after the scripted actions (overrides the config)
    #[arg(long)]
    frames: Option<u32>,

    /// Start the power bar in secondary mode
    #[arg(long)]
    secondary: bool,

    /// Only write the last frame
    #[arg(long)]
    last: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), DemoError> {
    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if let Some(format) = cli.format {
        config.run.format = format;
    }
    if let Some(frames) = cli.frames {
        config.run.trailing_frames = frames;
    }
    if cli.secondary {
        config.power_bar.secondary = true;
    }

    let window = Window::from_config(&config)?;
    info!(
        "window {}x{}, {} segments, {:?} mode",
        config.run.width,
        config.run.height,
        window.power_bar().bar().step_count(),
        window.power_bar().mode()
    );
    let mut runner = Runner::new(
        window,
        config.run.width,
        config.run.height,
        config.run.frame_interval(),
    );
    let frames = runner.run(&config.run.actions, config.run.trailing_frames)?;
    let power_bar = runner.window().power_bar();
    info!(
        "final value {} in {}..={}",
        power_bar.value(),
        power_bar.minimum(),
        power_bar.maximum()
    );

    let selected = if cli.last {
        frames.last().map_or(&[][..], std::slice::from_ref)
    } else {
        &frames[..]
    };
    write_frames(&mut io::stdout().lock(), selected, config.run.format)
}

fn write_frames(
    out: &mut impl Write,
    frames: &[Frame],
    format: OutputFormat,
) -> Result<(), DemoError> {
    for frame in frames {
        match format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, frame)?;
                writeln!(out)?;
            }
            OutputFormat::Text => writeln!(out, "{frame}")?,
        }
    }
    out.flush()?;
    Ok(())
}
