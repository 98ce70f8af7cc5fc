//! Attribute type tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a table or stream attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttrType {
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// UTF-8 string
    Str,
}

impl AttrType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, AttrType::Int | AttrType::Float)
    }

    /// Textual attributes are quoted when rendered into a filter literal.
    pub fn is_textual(&self) -> bool {
        matches!(self, AttrType::Str)
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrType::Int => write!(f, "int"),
            AttrType::Float => write!(f, "float"),
            AttrType::Bool => write!(f, "bool"),
            AttrType::Str => write!(f, "str"),
        }
    }
}
