//! Condition evaluation against a document field snapshot.
//!
//! Evaluation is pure and deterministic: same expression, same snapshot,
//! same result.  Missing or type-mismatched properties fail the predicate
//! closed (false) rather than raising, so a malformed rule can never block
//! document progression with an error; the emptiness operators are the one
//! place absence itself is the thing being tested.

use crate::document::{FieldSnapshot, FieldValue};

use super::expr::{BoolOp, ConditionExpr, NumberOp, Predicate, TextOp};

impl ConditionExpr {
    /// Evaluate the expression against one field snapshot.
    pub fn evaluate(&self, snapshot: &FieldSnapshot) -> bool {
        match self {
            ConditionExpr::True => true,
            ConditionExpr::Never => false,
            ConditionExpr::Leaf(predicate) => predicate.matches(snapshot),
            ConditionExpr::And(left, right) => {
                left.evaluate(snapshot) && right.evaluate(snapshot)
            }
            ConditionExpr::Or(left, right) => {
                left.evaluate(snapshot) || right.evaluate(snapshot)
            }
        }
    }
}

impl Predicate {
    pub fn matches(&self, snapshot: &FieldSnapshot) -> bool {
        match self {
            Predicate::Number {
                property,
                operator,
                value,
            } => match_number(snapshot.get(property), *operator, *value),
            Predicate::Text {
                property,
                operator,
                value,
            } => match_text(snapshot.get(property), *operator, value),
            Predicate::Boolean {
                property,
                operator,
                value,
            } => match_boolean(snapshot.get(property), *operator, *value),
        }
    }
}

fn match_number(actual: Option<&FieldValue>, op: NumberOp, expected: Option<f64>) -> bool {
    let actual_num = actual.and_then(|v| v.as_f64());
    match op {
        NumberOp::IsEmpty => match actual {
            None => true,
            Some(v) => v.is_empty(),
        },
        NumberOp::IsNotEmpty => matches!(actual, Some(v) if !v.is_empty()),
        _ => {
            let (a, b) = match (actual_num, expected) {
                (Some(a), Some(b)) => (a, b),
                _ => return false,
            };
            match op {
                NumberOp::Eq => nearly_equal(a, b),
                NumberOp::Ne => !nearly_equal(a, b),
                NumberOp::Gt => a > b,
                NumberOp::Lt => a < b,
                NumberOp::Ge => a >= b,
                NumberOp::Le => a <= b,
                NumberOp::IsEmpty | NumberOp::IsNotEmpty => unreachable!(),
            }
        }
    }
}

/// Equality with an epsilon scaled to the operand magnitude, so comparisons
/// stay meaningful for large values (monetary amounts in minor units) where
/// an absolute epsilon is below the representable spacing.
fn nearly_equal(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= f64::EPSILON * scale
}

fn match_text(actual: Option<&FieldValue>, op: TextOp, expected: &str) -> bool {
    let actual_str = match actual.and_then(|v| v.as_text()) {
        Some(s) => s,
        None => return false,
    };
    match op {
        TextOp::Is => actual_str == expected,
        TextOp::IsNot => actual_str != expected,
        TextOp::Contains => actual_str.contains(expected),
        TextOp::NotContains => !actual_str.contains(expected),
    }
}

fn match_boolean(actual: Option<&FieldValue>, op: BoolOp, expected: bool) -> bool {
    let actual_bool = match actual.and_then(|v| v.as_bool()) {
        Some(b) => b,
        None => return false,
    };
    match op {
        BoolOp::Is => actual_bool == expected,
        BoolOp::IsNot => actual_bool != expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::parse_condition;
    use serde_json::json;

    fn snapshot(fields: serde_json::Value) -> FieldSnapshot {
        FieldSnapshot::from_json(&fields)
    }

    #[test]
    fn test_number_comparisons() {
        let snap = snapshot(json!({"amount": 1500}));
        let cases = vec![
            (">", json!(1000), true),
            (">", json!(2000), false),
            ("<", json!(2000), true),
            (">=", json!(1500), true),
            ("<=", json!(1500), true),
            ("=", json!(1500), true),
            ("!=", json!(1500), false),
            ("!=", json!(7), true),
        ];
        for (op, value, expected) in cases {
            let expr = parse_condition(&json!([
                {"type": "number", "property": "amount", "operator": op, "value": value}
            ]))
            .unwrap();
            assert_eq!(expr.evaluate(&snap), expected, "operator {op}");
        }
    }

    #[test]
    fn test_number_missing_property_fails_closed() {
        let snap = snapshot(json!({}));
        let expr = parse_condition(&json!([
            {"type": "number", "property": "amount", "operator": ">", "value": 0}
        ]))
        .unwrap();
        assert!(!expr.evaluate(&snap));
    }

    #[test]
    fn test_number_emptiness() {
        let empty = snapshot(json!({}));
        let filled = snapshot(json!({"amount": 10}));
        let is_empty = parse_condition(&json!([
            {"type": "number", "property": "amount", "operator": "is_empty"}
        ]))
        .unwrap();
        let not_empty = parse_condition(&json!([
            {"type": "number", "property": "amount", "operator": "is_not_empty"}
        ]))
        .unwrap();
        assert!(is_empty.evaluate(&empty));
        assert!(!is_empty.evaluate(&filled));
        assert!(not_empty.evaluate(&filled));
        assert!(!not_empty.evaluate(&empty));
    }

    #[test]
    fn test_text_operators() {
        let snap = snapshot(json!({"status": "pending review"}));
        let cases = vec![
            ("is", "pending review", true),
            ("is", "approved", false),
            ("is_not", "approved", true),
            ("contains", "review", true),
            ("not_contains", "rejected", true),
            ("not_contains", "pending", false),
        ];
        for (op, value, expected) in cases {
            let expr = parse_condition(&json!([
                {"type": "text", "property": "status", "operator": op, "value": value}
            ]))
            .unwrap();
            assert_eq!(expr.evaluate(&snap), expected, "operator {op}");
        }
    }

    #[test]
    fn test_boolean_is_and_is_not() {
        // Both operator directions must be wired for booleans.
        let snap = snapshot(json!({"urgent": true}));
        let is_true = parse_condition(&json!([
            {"type": "boolean", "property": "urgent", "operator": "is", "value": true}
        ]))
        .unwrap();
        let is_not_false = parse_condition(&json!([
            {"type": "boolean", "property": "urgent", "operator": "is_not", "value": false}
        ]))
        .unwrap();
        let is_not_true = parse_condition(&json!([
            {"type": "boolean", "property": "urgent", "operator": "is_not", "value": true}
        ]))
        .unwrap();
        assert!(is_true.evaluate(&snap));
        assert!(is_not_false.evaluate(&snap));
        assert!(!is_not_true.evaluate(&snap));
    }

    #[test]
    fn test_type_mismatch_fails_closed() {
        let snap = snapshot(json!({"amount": "not a number", "urgent": "yes"}));
        let num = parse_condition(&json!([
            {"type": "number", "property": "amount", "operator": "=", "value": 0}
        ]))
        .unwrap();
        let boolean = parse_condition(&json!([
            {"type": "boolean", "property": "urgent", "operator": "is", "value": true}
        ]))
        .unwrap();
        assert!(!num.evaluate(&snap));
        assert!(!boolean.evaluate(&snap));
    }

    #[test]
    fn test_large_magnitude_equality() {
        // At 1e16 the float spacing is 2.0; a magnitude-scaled epsilon must
        // treat adjacent representable values as equal instead of letting
        // "!=" fire on sub-precision noise.
        let snap = snapshot(json!({"amount": 1.0e16}));
        let eq_adjacent = parse_condition(&json!([
            {"type": "number", "property": "amount", "operator": "=",
             "value": 10000000000000002.0}
        ]))
        .unwrap();
        let ne_adjacent = parse_condition(&json!([
            {"type": "number", "property": "amount", "operator": "!=",
             "value": 10000000000000002.0}
        ]))
        .unwrap();
        assert!(eq_adjacent.evaluate(&snap));
        assert!(!ne_adjacent.evaluate(&snap));

        // Genuinely different values still compare unequal.
        let small = snapshot(json!({"amount": 1500}));
        let ne = parse_condition(&json!([
            {"type": "number", "property": "amount", "operator": "!=", "value": 1501}
        ]))
        .unwrap();
        assert!(ne.evaluate(&small));
    }

    #[test]
    fn test_string_number_coercion() {
        let snap = snapshot(json!({"amount": "42"}));
        let expr = parse_condition(&json!([
            {"type": "number", "property": "amount", "operator": ">", "value": 10}
        ]))
        .unwrap();
        assert!(expr.evaluate(&snap));
    }

    #[test]
    fn test_left_fold_evaluation_order() {
        // false and true or true => (false and true) or true => true.
        // With AND-precedence grouping, false and (true or true) => false.
        let snap = snapshot(json!({"a": false, "b": true, "c": true}));
        let expr = parse_condition(&json!([
            {"type": "boolean", "property": "a", "operator": "is", "value": true},
            "and",
            {"type": "boolean", "property": "b", "operator": "is", "value": true},
            "or",
            {"type": "boolean", "property": "c", "operator": "is", "value": true}
        ]))
        .unwrap();
        assert!(expr.evaluate(&snap));
    }

    #[test]
    fn test_nested_grouping_changes_result() {
        // a and (b or c) with a=false is false regardless of b/c.
        let snap = snapshot(json!({"a": false, "b": true, "c": true}));
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
        assert!(!expr.evaluate(&snap));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let snap = snapshot(json!({"amount": 500, "urgent": false}));
        let expr = parse_condition(&json!([
            {"type": "number", "property": "amount", "operator": "<", "value": 1000},
            "and",
            {"type": "boolean", "property": "urgent", "operator": "is", "value": false}
        ]))
        .unwrap();
        let first = expr.evaluate(&snap);
        for _ in 0..10 {
            assert_eq!(expr.evaluate(&snap), first);
        }
        assert!(first);
    }

    #[test]
    fn test_never_is_always_false() {
        let snap = snapshot(json!({"anything": 1}));
        assert!(!ConditionExpr::Never.evaluate(&snap));
        assert!(ConditionExpr::True.evaluate(&snap));
    }
}
