//! Crate-wide error type for vault normalization.
//!
//! # Responsibility
//! - Name the failure categories that abort a run or a single file.
//! - Keep the originating path attached to every filesystem failure.
//!
//! # Invariants
//! - Fatal categories (`PathNotFound`, `TargetExists`, move `Io`) are returned
//!   to the caller; per-file recoveries are logged at the call site instead.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type NormalizeResult<T> = Result<T, NormalizeError>;

#[derive(Debug)]
pub enum NormalizeError {
    /// Filesystem operation failed for `path`.
    Io { path: PathBuf, source: io::Error },
    /// File content is not valid UTF-8.
    InvalidEncoding(PathBuf),
    /// Root, target, or rename source does not exist.
    PathNotFound(PathBuf),
    /// Rename destination is already occupied.
    TargetExists(PathBuf),
    /// Configuration value rejected during load or validation.
    InvalidConfig(String),
}

impl NormalizeError {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl Display for NormalizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at `{}`: {source}", path.display()),
            Self::InvalidEncoding(path) => {
                write!(f, "file is not valid UTF-8: `{}`", path.display())
            }
            Self::PathNotFound(path) => write!(f, "path does not exist: `{}`", path.display()),
            Self::TargetExists(path) => {
                write!(f, "rename target already exists: `{}`", path.display())
            }
            Self::InvalidConfig(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl Error for NormalizeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidEncoding(_)
            | Self::PathNotFound(_)
            | Self::TargetExists(_)
            | Self::InvalidConfig(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NormalizeError;
    use std::error::Error;
    use std::io;

    #[test]
    fn io_error_keeps_path_and_source() {
        let err = NormalizeError::io("/vault/a.md", io::Error::other("denied"));
        assert!(err.to_string().contains("/vault/a.md"));
        assert!(err.source().is_some());
    }
}
