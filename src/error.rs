//! Error type shared by every stage of the pipeline.

use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while resolving styles, deriving documents or
/// producing assets.
///
/// The variants fall into two groups. [`MissingDependency`](Self::MissingDependency)
/// and [`InvalidArgument`](Self::InvalidArgument) are preconditions and are
/// raised before any output is written. The rest are per-target failures that
/// the [`Generator`](crate::Generator) records and moves past.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external program could not be found on `PATH`.
    #[error("required tool `{tool}` was not found ({hint})")]
    MissingDependency { tool: String, hint: String },

    /// A flag, color, direction or size could not be understood.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The master document has no closing marker to insert styles before.
    #[error("template has no `{marker}` closing marker")]
    TemplateInjection { marker: &'static str },

    /// An external program ran but reported failure.
    #[error("`{tool}` failed with status {status:?}: {stderr}")]
    ExternalTool {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    /// The in-process renderer could not handle a document or color.
    #[error("render failed: {0}")]
    Render(String),

    /// The configuration file could not be parsed.
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for errors that must stop a run before it starts.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingDependency { .. } | Self::InvalidArgument(_))
    }
}
