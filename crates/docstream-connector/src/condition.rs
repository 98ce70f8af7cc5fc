//! Compiled-condition artifact and runtime resolution
//!
//! [`ConditionCompiler`](crate::compiler::ConditionCompiler) produces one
//! [`CompiledCondition`] per query definition. The artifact is immutable;
//! [`resolve_condition`] is called once per incoming record and only ever
//! produces a new string, so a single compiled condition can be shared
//! across execution threads without locking.

use crate::syntax;
use docstream_core::{AttrType, Value};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::debug;

/// Deferred binding behind a `@name` token in a filter template.
#[derive(Debug, Clone, PartialEq)]
pub enum Placeholder {
    /// Value known at compile time. Folded into the template during
    /// finalization and removed from the table.
    Constant { value: Value, ty: AttrType },
    /// Attribute of the streaming record, resolved per execution.
    StreamRef { attribute: String, ty: AttrType },
}

/// A store filter template plus the deferred bindings for its parameter
/// tokens. Produced once per query, reused for every incoming record.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCondition {
    filter: String,
    placeholders: IndexMap<String, Placeholder>,
}

impl CompiledCondition {
    pub(crate) fn new(filter: String, placeholders: IndexMap<String, Placeholder>) -> Self {
        Self {
            filter,
            placeholders,
        }
    }

    /// The filter template, with `@name` tokens for unresolved bindings.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn placeholders(&self) -> &IndexMap<String, Placeholder> {
        &self.placeholders
    }

    /// True if the filter still carries bindings that need a runtime record.
    pub fn is_parametrized(&self) -> bool {
        !self.placeholders.is_empty()
    }
}

impl fmt::Display for CompiledCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filter)
    }
}

/// Substitute runtime attribute values into a compiled condition, producing
/// the final literal filter string.
///
/// Substitution is keyed by placeholder identity: every `@name` token is
/// replaced in a single pass, so one value's textual form can never corrupt
/// another placeholder's position. A stream reference with no entry in
/// `values` keeps its token. An empty template resolves to the store's
/// match-everything filter.
pub fn resolve_condition(
    condition: &CompiledCondition,
    values: &FxHashMap<String, Value>,
) -> String {
    debug!(filter = condition.filter(), "resolving compiled condition");

    let mut bindings: FxHashMap<&str, String> = FxHashMap::default();
    for (name, placeholder) in condition.placeholders() {
        if let Placeholder::StreamRef { attribute, .. } = placeholder {
            if let Some(value) = values.get(attribute) {
                bindings.insert(name.as_str(), syntax::render_literal(value));
            }
        }
    }

    let mut resolved = substitute_tokens(condition.filter(), &bindings);
    if resolved.is_empty() {
        resolved = syntax::MATCH_ALL.to_string();
    }

    debug!(filter = %resolved, "resolved condition");
    resolved
}

/// Splice a resolved condition into a query template's condition slot as a
/// WHERE clause.
pub fn format_query_with_condition(query: &str, condition: &str) -> String {
    query.replace(
        syntax::CONDITION_SLOT,
        &format!("{} {}", syntax::WHERE, condition),
    )
}

/// Replace every `@name` parameter token that has a binding, in one pass.
///
/// A token ends at the first character that is not `[A-Za-z0-9_]`, so
/// `@strVar1` never matches inside `@strVar10`. Tokens inside single-quoted
/// string literals are left untouched.
pub(crate) fn substitute_tokens(template: &str, bindings: &FxHashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    let mut in_literal = false;

    while let Some((i, c)) = chars.next() {
        if c == '\'' {
            in_literal = !in_literal;
            out.push(c);
        } else if c == '@' && !in_literal {
            let start = i + c.len_utf8();
            let mut end = start;
            while let Some(&(j, next)) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    end = j + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let name = &template[start..end];
            match bindings.get(name) {
                Some(replacement) => out.push_str(replacement),
                None => {
                    out.push('@');
                    out.push_str(name);
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
