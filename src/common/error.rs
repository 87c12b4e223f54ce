//! Error types for stratadb.

use std::fmt;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write
/// `Result<T>`, following the `std::io::Result` pattern.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in stratadb.
///
/// Only the storage layer produces typed errors: the buffer pool
/// signals its user-visible failures through return values
/// (`Option` for saturation, `bool` for misuse), and trie operations
/// never fail.
#[derive(Debug)]
pub enum Error {
    /// I/O error from disk operations.
    Io(std::io::Error),

    /// An operation was handed the reserved `PageId::INVALID` sentinel.
    InvalidPageId(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InvalidPageId(pid) => write!(f, "invalid page id: {}", pid),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
