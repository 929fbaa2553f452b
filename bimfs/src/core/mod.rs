// SPDX-License-Identifier: MIT

// === Sub-modules ===
pub mod errors;
pub mod formatter;
pub mod meta;
pub mod utils;

// === Core Traits ===
pub mod traits {
    pub use super::formatter::FsFormatter;
    pub use super::meta::FsMeta;
}

// === Error types ===
pub use errors::*;

// === Utilities ===
pub use utils::time_utils::*;
