use std::{io, path::PathBuf, string::FromUtf8Error};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The served file does not exist, either when indexing or when reading a line
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// On request for a line past the end of the file
    #[error("line index {line} is out of range, file has {total} lines")]
    LineIndexOutOfRange { line: usize, total: usize },

    #[error("line is not valid utf-8")]
    Utf8(#[from] FromUtf8Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Classifies an io error raised while opening `path`. Only a missing file gets its own
    /// kind, everything else is passed through untouched.
    pub(crate) fn from_open<P: Into<PathBuf>>(err: io::Error, path: P) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound { path: path.into() },
            _ => Self::Io(err),
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }

    #[inline]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::LineIndexOutOfRange { .. })
    }
}
