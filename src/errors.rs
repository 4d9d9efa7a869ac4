//! Error types for syndiff.
//!
//! Two variants are data conditions a caller never sees as a failure: a definition
//! whose end cannot be located and a source file that is not UTF-8 text. Both are
//! turned into the "could not obtain diff" message by [`crate::SyntaxDiff`]. Every
//! other variant reports a broken environment or invalid input and is propagated.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::boundary::DefinitionKind;

#[derive(Error, Debug)]
/// Unified error enumeration for syndiff.
pub enum SyndiffError {
    /// The boundary detector could not find the last line of the definition.
    #[error("Cannot find the end of the {kind} starting at line {line} in {}", .path.display())]
    BoundaryNotFound {
        path: PathBuf,
        line: usize,
        kind: DefinitionKind,
    },

    /// The source file is not valid UTF-8 text.
    #[error("The file {} could not be decoded as UTF-8 text", .0.display())]
    Decode(PathBuf),

    /// The external diff utility could not be started.
    #[error("Failed to execute `{program}`: {source}")]
    DiffSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The external diff utility exited with a status other than 0 or 1.
    #[error("`{program}` failed with {status}: {stderr}")]
    DiffFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Invalid function argument (start line, kind name).
    #[error("Argument parse failed: {0}")]
    InvalidArgument(String),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while reading sources or writing scratch files.
    #[error("IO Error: {0}")]
    IOError(#[from] io::Error),
}

impl SyndiffError {
    /// Whether the error is a data condition that is reported as the
    /// "could not obtain diff" message instead of being propagated.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SyndiffError::BoundaryNotFound { .. } | SyndiffError::Decode(_)
        )
    }
}
