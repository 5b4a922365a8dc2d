//! Error taxonomy shared by every stage.
//!
//! Nothing here is retried. Filesystem and template failures are not expected
//! to be transient within one process run, so every error is surfaced to the
//! caller (the HTTP boundary or the CLI) as soon as it happens.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    /// No source entry answers the route. The HTTP boundary maps this to 404.
    #[error("No source file answers route: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The template capability rejected a page.
    #[error("Render error in {path}: {message}")]
    Render { path: PathBuf, message: String },
    #[error("Site root does not exist or is not a directory: {0}")]
    InvalidRoot(PathBuf),
    /// The build target would swallow the content root when cleaned.
    #[error("Refusing to use {0} as output directory: it contains the site root")]
    InvalidOutput(PathBuf),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl SiteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SiteError::NotFound(_))
    }
}

impl From<walkdir::Error> for SiteError {
    fn from(err: walkdir::Error) -> Self {
        SiteError::Io(err.into())
    }
}
