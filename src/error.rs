//! Error type for the startup path (asset loading, directories).
//!
//! The simulation itself never fails once running; everything here is
//! surfaced before the terminal is put into raw mode.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum SkyflapError {
    /// A sprite sheet file could not be found or opened.
    AssetMissing { path: PathBuf },
    /// A sprite sheet was found but its contents are unusable.
    AssetMalformed {
        name: String,
        line: usize,
        reason: String,
    },
    Io(io::Error),
}

impl fmt::Display for SkyflapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetMissing { path } => write!(f, "asset not found: {}", path.display()),
            Self::AssetMalformed { name, line, reason } => {
                write!(f, "malformed sheet '{name}' at line {line}: {reason}")
            }
            Self::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for SkyflapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SkyflapError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SkyflapError> for io::Error {
    fn from(err: SkyflapError) -> Self {
        match err {
            SkyflapError::Io(inner) => inner,
            SkyflapError::AssetMissing { .. } => io::Error::new(io::ErrorKind::NotFound, err),
            SkyflapError::AssetMalformed { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}
