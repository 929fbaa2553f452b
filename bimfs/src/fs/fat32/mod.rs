// SPDX-License-Identifier: MIT

pub mod attr;
pub mod constant;
pub mod formatter;
pub mod meta;
pub mod types;
pub mod utils;

// === Public Interface ===
pub mod traits {
    pub use super::formatter::Fat32Formatter;
    pub use super::meta::Fat32Meta;
}

pub mod prelude {
    pub use super::traits::*;
    pub use super::types::{Fat32Entry, FatTimestamp};
    pub use crate::core::errors::*;
    pub use crate::core::traits::*;
    pub use bimio::prelude::*;
}
