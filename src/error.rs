//! Error types for the build pipeline
//!
//! Every failure aborts the whole build; nothing here is recovered per document.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, enriching, rendering or writing a site
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Glob resolution failed: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Front-matter error in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Document {slug:?} reached rendering without `{field}`")]
    Incomplete { slug: String, field: &'static str },

    #[error("Template not found: {name} (required by {slug:?})")]
    TemplateNotFound { name: String, slug: String },

    #[error("Duplicate template name {name}: {first:?} and {second:?}")]
    DuplicateTemplate {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("needPosts names an unknown template: {name}")]
    UnknownNeedsPosts { name: String },

    #[error("Failed to render template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
