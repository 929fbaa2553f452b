// SPDX-License-Identifier: MIT

mod log;
mod string;

pub use colored::Colorize;
pub use log::*;
pub use string::*;
