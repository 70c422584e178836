// SPDX-License-Identifier: MIT

//! Program-id conditions for debug actions
//!
//! This module provides parsing and evaluation of positional pid rules.
//! Conditions are comma separated, one position per grid axis:
//! - `=0` - first program along axis 0
//! - `,>1` - axis 1 past its second program
//! - `>1,=0` - both at once; axis 2 unconstrained

mod ast;
mod evaluator;
mod parser;

pub use ast::{Clause, CompareOp, Predicate};
pub use evaluator::{evaluate, test_pid_conds};
pub use parser::parse;

use std::str::FromStr;

use crate::runtime::error::ValidationError;
use crate::runtime::grid::Coordinate;

impl FromStr for Predicate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl Predicate {
    /// Whether this predicate holds for `pid`
    pub fn matches(&self, pid: &Coordinate) -> bool {
        evaluate(self, pid)
    }
}
