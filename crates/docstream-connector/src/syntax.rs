//! Concrete filter syntax of the target document store
//!
//! The store accepts a SQL-flavored boolean filter: `symbol = 'IBM'`,
//! `(price > 50 AND volume <= 100)`, `NOT (symbol = 'IBM')`,
//! `volume IS NULL`. Deferred values appear as `@name` parameter tokens
//! until they are folded or resolved.

use docstream_core::{CompareOp, Value};

/// Filter that matches every document in a collection.
pub(crate) const MATCH_ALL: &str = "true";

/// Slot in a query template that receives the resolved condition.
pub(crate) const CONDITION_SLOT: &str = "{{CONDITION}}";

pub(crate) const WHERE: &str = "WHERE";
pub(crate) const AND: &str = "AND";
pub(crate) const OR: &str = "OR";
pub(crate) const NOT: &str = "NOT";
pub(crate) const IS_NULL: &str = "IS NULL";

pub(crate) fn compare_op_token(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "=",
        CompareOp::NotEq => "!=",
        CompareOp::Lt => "<",
        CompareOp::Le => "<=",
        CompareOp::Gt => ">",
        CompareOp::Ge => ">=",
    }
}

/// Render a placeholder name as its `@name` parameter token.
pub(crate) fn placeholder_token(name: &str) -> String {
    format!("@{}", name)
}

/// Render a runtime value as a filter literal. Strings are single-quoted
/// with embedded quotes doubled; everything else uses its plain textual
/// form.
pub(crate) fn render_literal(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
    }
}
