use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Rendering backend unavailable: {0}")]
    DependencyUnavailable(String),
    #[error("Rendering failed: {0}")]
    RenderFailed(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
