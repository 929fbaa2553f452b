// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for BimIO operations.
pub type BimIOResult<T = ()> = core::result::Result<T, BimIOError>;

/// Error type for BimIO operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BimIOError {
    /// The sink accepted fewer bytes than requested.
    ShortWrite,
    /// The source ended before the requested bytes were read.
    ShortRead,
    OutOfBounds,
    Overflow,
    Unsupported,
    Other(&'static str),
}

impl BimIOError {
    pub fn msg(&self) -> &'static str {
        match self {
            BimIOError::ShortWrite => "Short write",
            BimIOError::ShortRead => "Short read",
            BimIOError::OutOfBounds => "Out of bounds",
            BimIOError::Overflow => "Offset overflow",
            BimIOError::Unsupported => "Unsupported operation",
            BimIOError::Other(msg) => msg,
        }
    }
}

impl From<&'static str> for BimIOError {
    #[inline]
    fn from(msg: &'static str) -> Self {
        BimIOError::Other(msg)
    }
}

impl fmt::Display for BimIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BimIOError {}
