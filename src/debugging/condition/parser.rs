// SPDX-License-Identifier: MIT

//! Condition string parser
//!
//! Parses positional program-id rules like:
//! - `=0` - pid 0 equals 0
//! - `,>1` - pid 1 greater than 1
//! - `>1,=0` - pid 0 greater than 1 and pid 1 equals 0

use super::ast::{Clause, CompareOp, Predicate};
use crate::runtime::error::ValidationError;
use crate::runtime::grid::Axis;

/// Parse a condition string into a predicate
pub fn parse(input: &str) -> Result<Predicate, ValidationError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let fragments: Vec<&str> = compact.split(',').collect();

    if fragments.len() > Axis::ALL.len() {
        return Err(ValidationError::TooManyPositions {
            count: fragments.len(),
            condition: input.to_string(),
        });
    }

    let mut clauses = Vec::with_capacity(fragments.len());
    for (axis, fragment) in Axis::ALL.iter().zip(&fragments) {
        if fragment.is_empty() {
            continue;
        }
        clauses.push(parse_clause(*axis, fragment, input)?);
    }

    Ok(Predicate::from_clauses(clauses))
}

fn parse_clause(axis: Axis, fragment: &str, condition: &str) -> Result<Clause, ValidationError> {
    let op = CompareOp::ALL
        .into_iter()
        .find(|op| fragment.starts_with(op.symbol()))
        .ok_or_else(|| ValidationError::UnknownOperator {
            fragment: fragment.to_string(),
            condition: condition.to_string(),
        })?;

    let threshold = parse_threshold(&fragment[op.symbol().len()..]).ok_or_else(|| {
        ValidationError::InvalidThreshold {
            fragment: fragment.to_string(),
            condition: condition.to_string(),
        }
    })?;

    Ok(Clause {
        axis,
        op,
        threshold,
    })
}

/// `['-'] digit+`, nothing else. Magnitudes past i64 saturate; program ids
/// are u32, so every comparison keeps its exact result.
fn parse_threshold(input: &str) -> Option<i64> {
    let (negative, digits) = match input.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, input),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(input.parse().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(axis: Axis, op: CompareOp, threshold: i64) -> Clause {
        Clause {
            axis,
            op,
            threshold,
        }
    }

    #[test]
    fn test_parse_all_axes_zero() {
        let p = parse("=0,=0,=0").unwrap();
        assert_eq!(
            p.clauses(),
            &[
                clause(Axis::X, CompareOp::Eq, 0),
                clause(Axis::Y, CompareOp::Eq, 0),
                clause(Axis::Z, CompareOp::Eq, 0),
            ]
        );
        assert_eq!(p, Predicate::first_invocation());
    }

    #[test]
    fn test_parse_two_char_operators() {
        assert_eq!(
            parse("<=3").unwrap().clauses(),
            &[clause(Axis::X, CompareOp::Lte, 3)]
        );
        assert_eq!(
            parse(">=3").unwrap().clauses(),
            &[clause(Axis::X, CompareOp::Gte, 3)]
        );
        assert_eq!(
            parse("!=3").unwrap().clauses(),
            &[clause(Axis::X, CompareOp::NotEq, 3)]
        );
    }

    #[test]
    fn test_parse_one_char_operators() {
        assert_eq!(
            parse("<3").unwrap().clauses(),
            &[clause(Axis::X, CompareOp::Lt, 3)]
        );
        assert_eq!(
            parse(">3").unwrap().clauses(),
            &[clause(Axis::X, CompareOp::Gt, 3)]
        );
        assert_eq!(
            parse("=3").unwrap().clauses(),
            &[clause(Axis::X, CompareOp::Eq, 3)]
        );
    }

    #[test]
    fn test_parse_skips_empty_positions() {
        let p = parse(",>1").unwrap();
        assert_eq!(p.clauses(), &[clause(Axis::Y, CompareOp::Gt, 1)]);

        let p = parse(",,<4").unwrap();
        assert_eq!(p.clauses(), &[clause(Axis::Z, CompareOp::Lt, 4)]);

        let p = parse(">1,=0").unwrap();
        assert_eq!(
            p.clauses(),
            &[
                clause(Axis::X, CompareOp::Gt, 1),
                clause(Axis::Y, CompareOp::Eq, 0)
            ]
        );
    }

    #[test]
    fn test_parse_empty_is_always() {
        assert_eq!(parse("").unwrap(), Predicate::always());
        assert_eq!(parse("   ").unwrap(), Predicate::always());
        assert_eq!(parse(",,").unwrap(), Predicate::always());
    }

    #[test]
    fn test_parse_ignores_whitespace() {
        assert_eq!(parse(" > 1 , = 0 ").unwrap(), parse(">1,=0").unwrap());
        assert_eq!(parse("\t<=\n2").unwrap(), parse("<=2").unwrap());
    }

    #[test]
    fn test_parse_negative_threshold() {
        assert_eq!(
            parse(">-1").unwrap().clauses(),
            &[clause(Axis::X, CompareOp::Gt, -1)]
        );
    }

    #[test]
    fn test_parse_unknown_operator() {
        let err = parse("$5").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownOperator {
                fragment: "$5".to_string(),
                condition: "$5".to_string(),
            }
        );

        let err = parse("=0, ==1").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidThreshold { ref fragment, .. } if fragment == "==1"));

        let err = parse("=0,5").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownOperator { ref fragment, ref condition }
            if fragment == "5" && condition == "=0,5"));
    }

    #[test]
    fn test_parse_invalid_threshold() {
        for bad in ["=", "=x", "<1.5", "=+5", "=1_0", "=--1", "=-"] {
            let err = parse(bad).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidThreshold { .. }),
                "{} should be an invalid threshold, got {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_parse_huge_threshold_saturates() {
        let p = parse("<99999999999999999999").unwrap();
        assert_eq!(p.clauses(), &[clause(Axis::X, CompareOp::Lt, i64::MAX)]);

        let p = parse(",>=-99999999999999999999").unwrap();
        assert_eq!(p.clauses(), &[clause(Axis::Y, CompareOp::Gte, i64::MIN)]);
    }

    #[test]
    fn test_parse_rejects_fourth_position() {
        let err = parse("=0,=0,=0,=0").unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooManyPositions {
                count: 4,
                condition: "=0,=0,=0,=0".to_string(),
            }
        );
        assert!(parse("=0,=0,=0,").is_err());
        assert!(parse(",,,").is_err());
    }

    #[test]
    fn test_parse_is_deterministic() {
        for cond in ["", "=0", ",>1", ">1,=0", "!=3,,<=-2", " >= 7 , != 2 , < 9 "] {
            assert_eq!(parse(cond).unwrap(), parse(cond).unwrap());
        }
    }

    #[test]
    fn test_display_reparses_to_same_predicate() {
        for cond in ["", "=0", ",>1", ">1,=0", "!=3,,<=-2", ">=7,!=2,<9", "=0,,"] {
            let p = parse(cond).unwrap();
            assert_eq!(parse(&p.to_string()).unwrap(), p, "condition {:?}", cond);
        }
    }
}
