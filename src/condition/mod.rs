//! Condition compilation and evaluation.
//!
//! The configuration surface encodes an association's condition as a list
//! alternating between typed predicates and `"and"`/`"or"` tokens; nested
//! lists are parenthesized sub-expressions.  [`parse_condition`] compiles
//! that encoding into a [`ConditionExpr`] tree once at workflow build time;
//! [`ConditionExpr::evaluate`] then runs it against a field snapshot with no
//! side effects.

mod eval;
mod expr;
mod parser;

pub use expr::{BoolOp, ConditionExpr, LogicalOperator, NumberOp, Predicate, TextOp};
pub use parser::{parse_condition, ConditionParseError};
