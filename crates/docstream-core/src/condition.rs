//! Logical condition tree for store pushdown
//!
//! The query engine builds one [`ConditionExpr`] per table lookup and hands
//! it to the connector, which compiles it into a store-native filter. The
//! tree covers everything the engine's condition language can express; the
//! connector decides what survives pushdown.

use crate::types::AttrType;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a [`ConditionExpr::Compare`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Le => write!(f, "<="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Ge => write!(f, ">="),
        }
    }
}

/// Arithmetic operator of a [`ConditionExpr::Math`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// A node in the engine's logical condition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConditionExpr {
    /// Logical conjunction of two subconditions.
    And {
        left: Box<ConditionExpr>,
        right: Box<ConditionExpr>,
    },
    /// Logical disjunction of two subconditions.
    Or {
        left: Box<ConditionExpr>,
        right: Box<ConditionExpr>,
    },
    /// Logical negation of a subcondition.
    Not(Box<ConditionExpr>),
    /// Comparison between two operands.
    Compare {
        op: CompareOp,
        left: Box<ConditionExpr>,
        right: Box<ConditionExpr>,
    },
    /// Null check on an operand.
    IsNull(Box<ConditionExpr>),
    /// Membership test against another table. Never pushed down.
    In {
        store_id: String,
        expr: Box<ConditionExpr>,
    },
    /// Arithmetic expression. Never pushed down.
    Math {
        op: MathOp,
        left: Box<ConditionExpr>,
        right: Box<ConditionExpr>,
    },
    /// Function application. Never pushed down.
    AttributeFunction {
        namespace: Option<String>,
        name: String,
        args: Vec<ConditionExpr>,
    },
    /// Attribute of the incoming streaming record, known only at runtime.
    StreamVariable {
        stream_id: Option<String>,
        attribute: String,
        ty: AttrType,
    },
    /// Literal constant, known at compile time.
    Constant { value: Value, ty: AttrType },
    /// Attribute of the store table itself.
    StoreVariable {
        store_id: Option<String>,
        attribute: String,
        ty: AttrType,
    },
}

impl ConditionExpr {
    pub fn and(left: ConditionExpr, right: ConditionExpr) -> Self {
        ConditionExpr::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: ConditionExpr, right: ConditionExpr) -> Self {
        ConditionExpr::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(inner: ConditionExpr) -> Self {
        ConditionExpr::Not(Box::new(inner))
    }

    pub fn compare(op: CompareOp, left: ConditionExpr, right: ConditionExpr) -> Self {
        ConditionExpr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_null(inner: ConditionExpr) -> Self {
        ConditionExpr::IsNull(Box::new(inner))
    }

    pub fn stream_var(attribute: &str, ty: AttrType) -> Self {
        ConditionExpr::StreamVariable {
            stream_id: None,
            attribute: attribute.to_string(),
            ty,
        }
    }

    pub fn constant(value: impl Into<Value>, ty: AttrType) -> Self {
        ConditionExpr::Constant {
            value: value.into(),
            ty,
        }
    }

    pub fn store_var(attribute: &str, ty: AttrType) -> Self {
        ConditionExpr::StoreVariable {
            store_id: None,
            attribute: attribute.to_string(),
            ty,
        }
    }
}
