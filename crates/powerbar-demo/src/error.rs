//! Error types for the demo driver.

use powerbar_core::WidgetError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a demo run.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Config file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected layout.
    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A widget rejected a configured value.
    #[error(transparent)]
    Widget(#[from] WidgetError),

    /// Frame serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing frames to the output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}
