//! Compiles the legacy list-encoded condition into a [`ConditionExpr`].
//!
//! The wire form is a JSON array alternating between predicate objects and
//! `"and"`/`"or"` strings.  A predicate position may itself hold a nested
//! array, which is a parenthesized sub-expression of the same shape.
//! Operators apply strictly in sequence order with no precedence grouping:
//! `a and b or c` compiles to `Or(And(a, b), c)`.

use serde_json::Value;
use thiserror::Error;

use super::expr::{parse_logical_operator, ConditionExpr, Predicate};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConditionParseError {
    #[error("condition must be a JSON array, got {0}")]
    NotAnArray(String),
    #[error("invalid predicate at position {position}: {reason}")]
    InvalidPredicate { position: usize, reason: String },
    #[error("expected \"and\" or \"or\" at position {0}")]
    ExpectedOperator(usize),
    #[error("trailing logical operator at position {0}")]
    TrailingOperator(usize),
}

/// Parse the legacy alternating predicate/operator list.
///
/// The empty array compiles to [`ConditionExpr::True`] (default-allow): an
/// association without a condition is always taken.
pub fn parse_condition(raw: &Value) -> Result<ConditionExpr, ConditionParseError> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Null => return Ok(ConditionExpr::True),
        other => return Err(ConditionParseError::NotAnArray(type_name(other).into())),
    };

    if items.is_empty() {
        return Ok(ConditionExpr::True);
    }

    let mut expr = parse_operand(&items[0], 0)?;
    let mut position = 1;
    while position < items.len() {
        let op = parse_logical_operator(&items[position])
            .ok_or(ConditionParseError::ExpectedOperator(position))?;
        position += 1;
        if position >= items.len() {
            return Err(ConditionParseError::TrailingOperator(position - 1));
        }
        let rhs = parse_operand(&items[position], position)?;
        expr = expr.combine(op, rhs);
        position += 1;
    }

    Ok(expr)
}

/// Parse one predicate position: either a predicate object or a nested
/// sub-expression array.
fn parse_operand(value: &Value, position: usize) -> Result<ConditionExpr, ConditionParseError> {
    match value {
        Value::Array(_) => parse_condition(value),
        Value::Object(_) => {
            let predicate: Predicate = serde_json::from_value(value.clone()).map_err(|e| {
                ConditionParseError::InvalidPredicate {
                    position,
                    reason: e.to_string(),
                }
            })?;
            Ok(ConditionExpr::leaf(predicate))
        }
        other => Err(ConditionParseError::InvalidPredicate {
            position,
            reason: format!("expected object or array, got {}", type_name(other)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::expr::{NumberOp, TextOp};
    use serde_json::json;

    #[test]
    fn test_empty_condition_is_true() {
        assert_eq!(parse_condition(&json!([])).unwrap(), ConditionExpr::True);
        assert_eq!(parse_condition(&json!(null)).unwrap(), ConditionExpr::True);
    }

    #[test]
    fn test_single_predicate() {
        let expr = parse_condition(&json!([
            {"type": "number", "property": "amount", "operator": ">", "value": 1000}
        ]))
        .unwrap();
        match expr {
            ConditionExpr::Leaf(Predicate::Number {
                property, operator, ..
            }) => {
                assert_eq!(property, "amount");
                assert_eq!(operator, NumberOp::Gt);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_left_to_right_no_precedence() {
        // a and b or c  =>  Or(And(a, b), c)
        let expr = parse_condition(&json!([
            {"type": "boolean", "property": "a", "operator": "is", "value": true},
            "and",
            {"type": "boolean", "property": "b", "operator": "is", "value": true},
            "or",
            {"type": "boolean", "property": "c", "operator": "is", "value": true}
        ]))
        .unwrap();
        match expr {
            ConditionExpr::Or(left, _) => assert!(matches!(*left, ConditionExpr::And(_, _))),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_nested_subexpression() {
        // a and (b or c)
        let expr = parse_condition(&json!([
            {"type": "boolean", "property": "a", "operator": "is", "value": true},
            "and",
            [
                {"type": "boolean", "property": "b", "operator": "is", "value": true},
                "or",
                {"type": "boolean", "property": "c", "operator": "is", "value": true}
            ]
        ]))
        .unwrap();
        match expr {
            ConditionExpr::And(_, right) => assert!(matches!(*right, ConditionExpr::Or(_, _))),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_text_predicate() {
        let expr = parse_condition(&json!([
            {"type": "text", "property": "status", "operator": "contains", "value": "draft"}
        ]))
        .unwrap();
        match expr {
            ConditionExpr::Leaf(Predicate::Text { operator, .. }) => {
                assert_eq!(operator, TextOp::Contains)
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_operator_between_predicates() {
        let err = parse_condition(&json!([
            {"type": "boolean", "property": "a", "operator": "is", "value": true},
            {"type": "boolean", "property": "b", "operator": "is", "value": true}
        ]))
        .unwrap_err();
        assert_eq!(err, ConditionParseError::ExpectedOperator(1));
    }

    #[test]
    fn test_trailing_operator() {
        let err = parse_condition(&json!([
            {"type": "boolean", "property": "a", "operator": "is", "value": true},
            "and"
        ]))
        .unwrap_err();
        assert_eq!(err, ConditionParseError::TrailingOperator(1));
    }

    #[test]
    fn test_unknown_predicate_type() {
        let err = parse_condition(&json!([
            {"type": "python", "property": "a", "operator": "is", "value": "exec"}
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConditionParseError::InvalidPredicate { position: 0, .. }
        ));
    }

    #[test]
    fn test_not_an_array() {
        let err = parse_condition(&json!("amount > 1000")).unwrap_err();
        assert_eq!(err, ConditionParseError::NotAnArray("string".into()));
    }
}
