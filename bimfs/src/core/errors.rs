// SPDX-License-Identifier: MIT

use core::fmt;

pub use bimio::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsFormatterError {
    IO(BimIOError),
    Invalid(&'static str),
    Other(&'static str),
}

impl FsFormatterError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsFormatterError::IO(e) => e.msg(),
            FsFormatterError::Invalid(msg) => msg,
            FsFormatterError::Other(msg) => msg,
        }
    }
}

impl From<BimIOError> for FsFormatterError {
    fn from(e: BimIOError) -> Self {
        FsFormatterError::IO(e)
    }
}

impl From<&'static str> for FsFormatterError {
    fn from(s: &'static str) -> Self {
        FsFormatterError::Other(s)
    }
}

impl fmt::Display for FsFormatterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsFormatterError::IO(_) => write!(f, "IO error: {}", self.msg()),
            _ => write!(f, "{}", self.msg()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FsFormatterError {}

pub type FsFormatterResult<T = ()> = Result<T, FsFormatterError>;
