use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors surfaced by the conversion entry points.
///
/// Malformed markup is deliberately absent: the translator degrades any
/// unrecognized construct to plain inline text instead of failing.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Exactly one of {source path, inline content} must be supplied.
    #[error("invalid arguments: {0}")]
    InvalidArguments(&'static str),

    /// The supplied source path does not exist or is not a regular file.
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Reading the source file failed.
    #[error("cannot read {}: {source}", .path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the output document failed.
    #[error("cannot write {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The parsed document has an empty or missing root container.
    #[error("input document has no content")]
    EmptyInput,

    /// Assembling the .docx package failed.
    #[error("docx packaging error: {0}")]
    Package(#[from] zip::result::ZipError),

    /// I/O failure while serializing the in-memory package.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
