// SPDX-License-Identifier: MIT

pub mod debugging;
pub mod runtime;
