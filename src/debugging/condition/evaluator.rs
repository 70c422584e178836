//! Predicate evaluator

use super::ast::Predicate;
use super::parser::parse;
use crate::runtime::error::ValidationError;
use crate::runtime::grid::{Coordinate, ProgramId};

/// Evaluate a predicate against one invocation's program ids
pub fn evaluate(predicate: &Predicate, pid: &Coordinate) -> bool {
    predicate
        .clauses()
        .iter()
        .all(|clause| clause.op.apply(i64::from(pid.get(clause.axis)), clause.threshold))
}

/// Parse `conds` and test it against whatever program ids `ctx` reports
pub fn test_pid_conds<P: ProgramId + ?Sized>(conds: &str, ctx: &P) -> Result<bool, ValidationError> {
    let predicate = parse(conds)?;
    Ok(evaluate(&predicate, &ctx.coordinate()))
}
