//! Condition pushdown compiler
//!
//! Walks the engine's [`ConditionExpr`] tree in post-order with an operand
//! stack and emits a store-native filter template plus a placeholder table.
//! The store only understands a restricted grammar: AND/OR between two
//! boolean fragments, NOT over a single compare or null check, comparisons
//! that pair a table attribute with a deferred value, and IS NULL on a
//! table attribute. Everything else is rejected at compile time.
//!
//! Operands are carried as a tagged enum rather than classified by string
//! shape, and the filter is kept as a small structured tree until
//! finalization, so no naming convention or replacement pass can be tricked
//! by value collisions.

use crate::condition::{CompiledCondition, Placeholder};
use crate::error::CompileError;
use crate::syntax;
use docstream_core::{AttrType, CompareOp, ConditionExpr, Value};
use indexmap::IndexMap;
use std::fmt;

/// One entry on the operand stack.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    /// Bare table attribute, known at compile time.
    Attribute(String),
    /// Symbolic name of a deferred value (stream variable or constant).
    Placeholder(String),
    /// Fully formed boolean filter fragment.
    Filter(FilterNode),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Attribute(name) => write!(f, "{}", name),
            Operand::Placeholder(name) => write!(f, "{}", syntax::placeholder_token(name)),
            Operand::Filter(node) => write!(f, "{}", node.render(&IndexMap::new())),
        }
    }
}

/// Structured filter fragment. Rendered to the store's concrete syntax only
/// at finalization.
#[derive(Debug, Clone, PartialEq)]
enum FilterNode {
    Compare {
        attribute: String,
        op: CompareOp,
        rhs: String,
    },
    IsNull {
        attribute: String,
    },
    Not(Box<FilterNode>),
    And(Box<FilterNode>, Box<FilterNode>),
    Or(Box<FilterNode>, Box<FilterNode>),
}

impl FilterNode {
    /// Simple fragments are the only legal operands of NOT.
    fn is_simple(&self) -> bool {
        matches!(self, FilterNode::Compare { .. } | FilterNode::IsNull { .. })
    }

    /// Render to concrete filter syntax. Placeholders bound to a constant
    /// fold to their literal value; stream references keep their `@name`
    /// token for runtime resolution.
    fn render(&self, placeholders: &IndexMap<String, Placeholder>) -> String {
        match self {
            FilterNode::Compare { attribute, op, rhs } => format!(
                "{} {} {}",
                attribute,
                syntax::compare_op_token(*op),
                render_value_slot(rhs, placeholders)
            ),
            FilterNode::IsNull { attribute } => {
                format!("{} {}", attribute, syntax::IS_NULL)
            }
            FilterNode::Not(inner) => {
                format!("{} ({})", syntax::NOT, inner.render(placeholders))
            }
            FilterNode::And(left, right) => format!(
                "({} {} {})",
                left.render(placeholders),
                syntax::AND,
                right.render(placeholders)
            ),
            FilterNode::Or(left, right) => format!(
                "({} {} {})",
                left.render(placeholders),
                syntax::OR,
                right.render(placeholders)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Connective {
    And,
    Or,
}

impl Connective {
    fn token(self) -> &'static str {
        match self {
            Connective::And => syntax::AND,
            Connective::Or => syntax::OR,
        }
    }
}

fn render_value_slot(name: &str, placeholders: &IndexMap<String, Placeholder>) -> String {
    match placeholders.get(name) {
        Some(Placeholder::Constant { value, .. }) => syntax::render_literal(value),
        _ => syntax::placeholder_token(name),
    }
}

/// Compiles one condition tree into one [`CompiledCondition`].
///
/// The operand stack and placeholder counters are per-compilation state;
/// a compiler instance serves exactly one tree, which is why the only
/// public entry point is the consuming [`ConditionCompiler::compile`].
#[derive(Debug, Default)]
pub struct ConditionCompiler {
    operands: Vec<Operand>,
    placeholders: IndexMap<String, Placeholder>,
    stream_var_count: usize,
    constant_count: usize,
}

impl ConditionCompiler {
    /// Compile a condition tree into a filter template and placeholder
    /// table.
    pub fn compile(expr: &ConditionExpr) -> Result<CompiledCondition, CompileError> {
        let mut compiler = ConditionCompiler::default();
        compiler.walk(expr)?;
        compiler.finish()
    }

    /// Post-order traversal: children first, then the node's own grammar
    /// rule. Unsupported constructs are rejected before their children are
    /// visited.
    fn walk(&mut self, expr: &ConditionExpr) -> Result<(), CompileError> {
        match expr {
            ConditionExpr::And { left, right } => {
                self.walk(left)?;
                self.walk(right)?;
                self.end_connective(Connective::And)
            }
            ConditionExpr::Or { left, right } => {
                self.walk(left)?;
                self.walk(right)?;
                self.end_connective(Connective::Or)
            }
            ConditionExpr::Not(inner) => {
                self.walk(inner)?;
                self.end_not()
            }
            ConditionExpr::Compare { op, left, right } => {
                self.walk(left)?;
                self.walk(right)?;
                self.end_compare(*op)
            }
            ConditionExpr::IsNull(inner) => {
                self.walk(inner)?;
                self.end_is_null()
            }
            ConditionExpr::In { .. } => Err(CompileError::Unsupported { construct: "IN" }),
            ConditionExpr::Math { .. } => Err(CompileError::Unsupported {
                construct: "arithmetic",
            }),
            ConditionExpr::AttributeFunction { .. } => Err(CompileError::Unsupported {
                construct: "attribute function",
            }),
            ConditionExpr::StreamVariable { attribute, ty, .. } => {
                self.visit_stream_variable(attribute, *ty);
                Ok(())
            }
            ConditionExpr::Constant { value, ty } => {
                self.visit_constant(value.clone(), *ty);
                Ok(())
            }
            ConditionExpr::StoreVariable { attribute, .. } => {
                self.operands.push(Operand::Attribute(attribute.clone()));
                Ok(())
            }
        }
    }

    /// AND/OR: both operands must already be boolean fragments.
    fn end_connective(&mut self, connective: Connective) -> Result<(), CompileError> {
        let right = self.pop_operand()?;
        let left = self.pop_operand()?;
        match (left, right) {
            (Operand::Filter(left), Operand::Filter(right)) => {
                let node = match connective {
                    Connective::And => FilterNode::And(Box::new(left), Box::new(right)),
                    Connective::Or => FilterNode::Or(Box::new(left), Box::new(right)),
                };
                self.operands.push(Operand::Filter(node));
                Ok(())
            }
            (left, right) => Err(CompileError::MalformedConnective {
                connective: connective.token(),
                left: left.to_string(),
                right: right.to_string(),
            }),
        }
    }

    /// NOT: the operand must be a single compare or null-check fragment.
    fn end_not(&mut self) -> Result<(), CompileError> {
        let operand = self.pop_operand()?;
        match operand {
            Operand::Filter(node) if node.is_simple() => {
                self.operands
                    .push(Operand::Filter(FilterNode::Not(Box::new(node))));
                Ok(())
            }
            operand => Err(CompileError::MalformedNot {
                operand: operand.to_string(),
            }),
        }
    }

    /// COMPARE: exactly one bare attribute paired with one deferred value.
    /// The attribute is normalized into the left slot of the store syntax
    /// regardless of which side the source expression wrote it on.
    fn end_compare(&mut self, op: CompareOp) -> Result<(), CompileError> {
        let right = self.pop_operand()?;
        let left = self.pop_operand()?;
        match (left, right) {
            (Operand::Attribute(attribute), Operand::Placeholder(rhs))
            | (Operand::Placeholder(rhs), Operand::Attribute(attribute)) => {
                self.operands
                    .push(Operand::Filter(FilterNode::Compare { attribute, op, rhs }));
                Ok(())
            }
            (left, right) => Err(CompileError::MalformedCompare {
                left: left.to_string(),
                right: right.to_string(),
            }),
        }
    }

    /// IS NULL: only applies directly to a table attribute.
    fn end_is_null(&mut self) -> Result<(), CompileError> {
        let operand = self.pop_operand()?;
        match operand {
            Operand::Attribute(attribute) => {
                self.operands
                    .push(Operand::Filter(FilterNode::IsNull { attribute }));
                Ok(())
            }
            operand => Err(CompileError::MalformedIsNull {
                operand: operand.to_string(),
            }),
        }
    }

    fn visit_stream_variable(&mut self, attribute: &str, ty: AttrType) {
        let name = format!("strVar{}", self.stream_var_count);
        self.stream_var_count += 1;
        self.placeholders.insert(
            name.clone(),
            Placeholder::StreamRef {
                attribute: attribute.to_string(),
                ty,
            },
        );
        self.operands.push(Operand::Placeholder(name));
    }

    fn visit_constant(&mut self, value: Value, ty: AttrType) {
        let name = format!("const{}", self.constant_count);
        self.constant_count += 1;
        self.placeholders
            .insert(name.clone(), Placeholder::Constant { value, ty });
        self.operands.push(Operand::Placeholder(name));
    }

    fn pop_operand(&mut self) -> Result<Operand, CompileError> {
        self.operands
            .pop()
            .ok_or(CompileError::StructuralDefect { remaining: 0 })
    }

    /// Pop the single remaining operand, render it, fold constant-bound
    /// placeholders into the template, and drop them from the table. Only
    /// stream references survive into the compiled artifact.
    fn finish(mut self) -> Result<CompiledCondition, CompileError> {
        let operand = self.pop_operand()?;
        if !self.operands.is_empty() {
            return Err(CompileError::StructuralDefect {
                remaining: self.operands.len() + 1,
            });
        }

        let filter = match operand {
            Operand::Filter(node) => node.render(&self.placeholders),
            Operand::Attribute(name) => name,
            Operand::Placeholder(name) => render_value_slot(&name, &self.placeholders),
        };

        self.placeholders
            .retain(|_, placeholder| matches!(placeholder, Placeholder::StreamRef { .. }));

        Ok(CompiledCondition::new(filter, self.placeholders))
    }
}
