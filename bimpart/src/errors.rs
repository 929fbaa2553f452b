// SPDX-License-Identifier: MIT

use core::fmt;

use bimio::errors::*;

/// Unified error type for the partitioning writers (MBR, GPT).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartError {
    IO(BimIOError),
    Invalid(&'static str),
}

impl PartError {
    pub fn msg(&self) -> &'static str {
        match self {
            PartError::IO(e) => e.msg(),
            PartError::Invalid(msg) => msg,
        }
    }
}

impl From<BimIOError> for PartError {
    fn from(e: BimIOError) -> Self {
        PartError::IO(e)
    }
}

impl fmt::Display for PartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())
    }
}

impl std::error::Error for PartError {}

pub type PartResult<T = ()> = Result<T, PartError>;
