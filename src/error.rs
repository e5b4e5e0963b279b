//! Error types.

/// Detailed cause of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input does not satisfy the component's grammar or contains an
    /// invalid percent-encoded octet.
    ///
    /// The error index points to the first offending byte.
    InvalidPart,
    /// The total length or a requested allocation would overflow `usize`.
    ///
    /// The error index equals `0`.
    TooLarge,
    /// The storage backend could not satisfy an allocation request.
    ///
    /// The error index equals `0`.
    AllocFailure,
}

/// An error occurred when mutating or parsing a URI.
///
/// The container that produced the error is left unchanged.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Error {
    pub(crate) index: usize,
    pub(crate) kind: ErrorKind,
}

impl Error {
    pub(crate) const fn invalid_part(index: usize) -> Error {
        Error {
            index,
            kind: ErrorKind::InvalidPart,
        }
    }

    pub(crate) const fn too_large() -> Error {
        Error {
            index: 0,
            kind: ErrorKind::TooLarge,
        }
    }

    pub(crate) const fn alloc_failure() -> Error {
        Error {
            index: 0,
            kind: ErrorKind::AllocFailure,
        }
    }

    /// Returns the index where the error occurred in the input.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub(crate) type Result<T, E = Error> = core::result::Result<T, E>;
