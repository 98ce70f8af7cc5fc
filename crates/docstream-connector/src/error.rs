//! Error types for condition compilation and store access

/// Errors raised while compiling a condition tree into a store filter.
///
/// Every variant is a defect in the query definition: the document store's
/// filter grammar cannot express the condition, so compilation fails fast
/// and is never retried. The carried strings are the offending operands
/// rendered in filter syntax, suitable for user-facing diagnostics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// The tree contains a construct with no mapping in the filter grammar
    /// (IN, arithmetic, function calls). Detected before the node's
    /// children are visited.
    #[error("{construct} conditions cannot be expressed in the document store filter grammar")]
    Unsupported { construct: &'static str },

    /// AND/OR was applied to something other than two boolean
    /// subexpressions.
    #[error("{connective} expects two boolean subexpressions, found '{left}' and '{right}'")]
    MalformedConnective {
        connective: &'static str,
        left: String,
        right: String,
    },

    /// NOT was applied to something other than a single compare or
    /// null-check fragment.
    #[error("NOT is only supported on a single compare or null check, found '{operand}'")]
    MalformedNot { operand: String },

    /// A comparison did not pair exactly one table attribute with one
    /// stream variable or constant.
    #[error(
        "comparison must pair a table attribute with a stream variable or constant, \
         found '{left}' and '{right}'"
    )]
    MalformedCompare { left: String, right: String },

    /// IS NULL was applied to something other than a bare table attribute.
    #[error("IS NULL is only supported on a table attribute, found '{operand}'")]
    MalformedIsNull { operand: String },

    /// The operand stack did not reduce to exactly one element. A malformed
    /// traversal, not an expected runtime condition.
    #[error("condition tree reduced to {remaining} operands instead of one")]
    StructuralDefect { remaining: usize },
}

/// Errors from the table facade and the document-store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to reach the document store.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// An insert, update, or delete was rejected by the store.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// A find against the store failed.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// Invalid or incomplete table configuration.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Operation attempted before `connect()`.
    #[error("not connected")]
    NotConnected,
}
