//! # Docstream Core
//!
//! Foundational types for the docstream document-store connector.
//!
//! This crate provides the data structures shared between the query engine
//! and the connector runtime:
//!
//! - [`condition`]: the logical condition tree the engine hands to the
//!   connector for pushdown compilation
//! - [`types`]: scalar attribute type tags
//! - [`value`]: runtime value representation for record attributes
//!
//! The condition tree is deliberately wider than what a document store can
//! express; the connector's compiler enforces the restricted grammar and
//! rejects the rest.

pub mod condition;
pub mod types;
pub mod value;

pub use condition::{CompareOp, ConditionExpr, MathOp};
pub use types::AttrType;
pub use value::Value;
