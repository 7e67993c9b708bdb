//! Error type for the file-level API and the CLI.

use crate::render::RenderError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("source directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("{} holds no renderable content", .0.display())]
    NoContent(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
