use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the extraction and write pipelines.
///
/// Everything here is fatal and fail-fast: there is no retry logic anywhere,
/// and the first error from any batch aborts the whole operation. Non-fatal
/// conditions (unmapped tag names, duplicate result keys) are logged as
/// warnings instead of surfacing through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// The exiftool binary could not be found on PATH (or at the configured
    /// override path).
    #[error("exiftool binary \"{0}\" not found")]
    ToolNotFound(String),

    /// A caller-supplied media path does not point to an existing file.
    #[error("file \"{}\" does not exist", .0.display())]
    InvalidInput(PathBuf),

    /// exiftool failed to launch or exited non-zero.
    #[error("exiftool execution failed: {0}")]
    ToolExecution(String),

    /// exiftool produced output that could not be parsed as XML.
    #[error("malformed exiftool XML output: {0}")]
    MalformedXml(String),

    /// An RDF Description record is missing a field required to key the
    /// result (Directory or FileName).
    #[error("metadata record is missing required field \"{0}\"")]
    MissingField(&'static str),

    /// A tag name passed to write/remove contains a character exiftool
    /// command syntax cannot accept.
    #[error("illegal character '{ch}' in tag name \"{tag}\"")]
    IllegalTagName { tag: String, ch: char },

    /// A JSON artifact (config file, column map) could not be parsed.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedXml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
