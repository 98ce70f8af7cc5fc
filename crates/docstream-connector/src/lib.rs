//! Docstream connector - persist and query streaming records in an
//! external document store
//!
//! The heart of the crate is the condition pushdown path:
//!
//! ```text
//! ConditionExpr ──> ConditionCompiler ──> CompiledCondition ──┐ per record
//!                     (once per query)                        ├──> resolve_condition ──> literal filter
//!                                          runtime values ────┘
//! ```
//!
//! [`ConditionCompiler`] turns the engine's logical condition tree into a
//! store-native filter template with deferred placeholder bindings;
//! [`resolve_condition`] substitutes the current record's values to produce
//! the final filter handed to the [`DocumentStore`] client. The
//! [`DocumentTable`] facade wires both into the CRUD surface a streaming
//! engine expects from a table.

pub mod compiler;
pub mod condition;
pub mod config;
pub mod error;
pub mod store;
pub mod table;

mod syntax;

pub use compiler::ConditionCompiler;
pub use condition::{
    format_query_with_condition, resolve_condition, CompiledCondition, Placeholder,
};
pub use config::{parse_key_value_pairs, TableConfig};
pub use error::{CompileError, StoreError};
pub use store::{Document, DocumentStore, FxIndexMap};
pub use table::{map_values_to_attributes, DocumentTable};
