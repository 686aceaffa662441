//! Typed condition predicates and the boolean expression tree.
//!
//! Conditions were historically encoded as a flat list alternating between
//! predicates and `"and"`/`"or"` tokens.  The engine compiles that encoding
//! once, at configuration time, into an explicit [`ConditionExpr`] tree so
//! the left-to-right fold semantics are visible in the structure instead of
//! implicit in list position.  There is deliberately no string-to-code
//! execution anywhere in this module: predicates form a closed set.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operators for `number` predicates.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NumberOp {
    #[serde(alias = "=")]
    Eq,
    #[serde(alias = "!=", alias = "≠")]
    Ne,
    #[serde(alias = ">")]
    Gt,
    #[serde(alias = "<")]
    Lt,
    #[serde(alias = ">=", alias = "≥")]
    Ge,
    #[serde(alias = "<=", alias = "≤")]
    Le,
    #[serde(alias = "is empty")]
    IsEmpty,
    #[serde(alias = "is not empty")]
    IsNotEmpty,
}

/// Comparison operators for `text` predicates.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TextOp {
    Is,
    #[serde(alias = "is not")]
    IsNot,
    Contains,
    #[serde(alias = "does not contain", alias = "does_not_contain")]
    NotContains,
}

/// Comparison operators for `boolean` predicates.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoolOp {
    Is,
    #[serde(alias = "is not")]
    IsNot,
}

/// A single typed comparison against one document property.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    Number {
        property: String,
        operator: NumberOp,
        #[serde(default)]
        value: Option<f64>,
    },
    Text {
        property: String,
        operator: TextOp,
        #[serde(default)]
        value: String,
    },
    Boolean {
        property: String,
        operator: BoolOp,
        value: bool,
    },
}

/// Logical connective between two predicate positions.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperator {
    And,
    Or,
}

/// Boolean expression over document fields.
///
/// `True` is the empty condition (default-allow); `Never` is the compiled
/// form of an unparseable condition (fail-closed, see the parser).
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionExpr {
    True,
    Never,
    Leaf(Predicate),
    And(Box<ConditionExpr>, Box<ConditionExpr>),
    Or(Box<ConditionExpr>, Box<ConditionExpr>),
}

impl ConditionExpr {
    /// Combine with another expression using the given operator, preserving
    /// the strict left-to-right fold: the accumulated expression is always
    /// the left operand.
    pub fn combine(self, op: LogicalOperator, rhs: ConditionExpr) -> ConditionExpr {
        match op {
            LogicalOperator::And => ConditionExpr::And(Box::new(self), Box::new(rhs)),
            LogicalOperator::Or => ConditionExpr::Or(Box::new(self), Box::new(rhs)),
        }
    }

    pub fn leaf(predicate: Predicate) -> ConditionExpr {
        ConditionExpr::Leaf(predicate)
    }
}

/// Parse a raw JSON value as a logical-operator token.
pub(crate) fn parse_logical_operator(value: &Value) -> Option<LogicalOperator> {
    match value.as_str()? {
        "and" => Some(LogicalOperator::And),
        "or" => Some(LogicalOperator::Or),
        _ => None,
    }
}
