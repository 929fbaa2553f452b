// SPDX-License-Identifier: MIT

pub mod img;
