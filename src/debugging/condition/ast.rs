// SPDX-License-Identifier: MIT

//! Parsed form of program-id conditions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::runtime::grid::Axis;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// <
    Lt,
    /// >
    Gt,
    /// <=
    Lte,
    /// >=
    Gte,
    /// =
    Eq,
    /// !=
    NotEq,
}

impl CompareOp {
    /// Every operator, longest token first so prefix matching is unambiguous
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Lte,
        CompareOp::Gte,
        CompareOp::NotEq,
        CompareOp::Lt,
        CompareOp::Gt,
        CompareOp::Eq,
    ];

    /// Token used in condition strings
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Lte => "<=",
            CompareOp::Gte => ">=",
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
        }
    }

    fn comparator(self) -> fn(&i64, &i64) -> bool {
        match self {
            CompareOp::Lt => i64::lt,
            CompareOp::Gt => i64::gt,
            CompareOp::Lte => i64::le,
            CompareOp::Gte => i64::ge,
            CompareOp::Eq => i64::eq,
            CompareOp::NotEq => i64::ne,
        }
    }

    /// `lhs <op> rhs`
    pub fn apply(self, lhs: i64, rhs: i64) -> bool {
        (self.comparator())(&lhs, &rhs)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One constraint on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Clause {
    pub axis: Axis,
    pub op: CompareOp,
    pub threshold: i64,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.threshold)
    }
}

/// A conjunction of at most one clause per axis, ordered by axis.
///
/// Only built by the parser (or the two canned constructors), which
/// guarantees the ordering and uniqueness invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub(crate) fn from_clauses(clauses: Vec<Clause>) -> Self {
        debug_assert!(clauses.windows(2).all(|w| w[0].axis < w[1].axis));
        Self { clauses }
    }

    /// The empty predicate, true for every coordinate
    pub fn always() -> Self {
        Self::default()
    }

    /// `=0,=0,=0`: only the very first invocation of the grid
    pub fn first_invocation() -> Self {
        Self::from_clauses(
            Axis::ALL
                .iter()
                .map(|axis| Clause {
                    axis: *axis,
                    op: CompareOp::Eq,
                    threshold: 0,
                })
                .collect(),
        )
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The clause constraining `axis`, if any
    pub fn clause(&self, axis: Axis) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.axis == axis)
    }
}

impl fmt::Display for Predicate {
    /// Canonical condition string: positional, trailing empty positions dropped
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = match self.clauses.last() {
            Some(clause) => clause.axis.index(),
            None => return Ok(()),
        };
        for index in 0..=last {
            if index > 0 {
                f.write_str(",")?;
            }
            if let Some(clause) = Axis::from_index(index).and_then(|a| self.clause(a)) {
                write!(f, "{}", clause)?;
            }
        }
        Ok(())
    }
}
