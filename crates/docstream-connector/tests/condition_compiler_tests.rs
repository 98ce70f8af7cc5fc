//! End-to-end tests for condition compilation and resolution.

use docstream_connector::{resolve_condition, CompileError, ConditionCompiler, Placeholder};
use docstream_core::{AttrType, CompareOp, ConditionExpr, Value};
use rustc_hash::FxHashMap;

fn store_str(name: &str) -> ConditionExpr {
    ConditionExpr::store_var(name, AttrType::Str)
}

fn store_int(name: &str) -> ConditionExpr {
    ConditionExpr::store_var(name, AttrType::Int)
}

fn values(entries: &[(&str, Value)]) -> FxHashMap<String, Value> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

// =============================================================================
// Constant Folding
// =============================================================================

#[test]
fn compare_against_constant_folds_at_compile_time() {
    let expr = ConditionExpr::compare(
        CompareOp::Eq,
        store_str("symbol"),
        ConditionExpr::constant("WSO2", AttrType::Str),
    );
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    assert_eq!(compiled.filter(), "symbol = 'WSO2'");
    assert!(!compiled.is_parametrized());
}

#[test]
fn and_of_two_constant_compares_leaves_no_placeholders() {
    let expr = ConditionExpr::and(
        ConditionExpr::compare(
            CompareOp::Eq,
            store_int("volume"),
            ConditionExpr::constant(5i64, AttrType::Int),
        ),
        ConditionExpr::compare(
            CompareOp::Eq,
            store_str("symbol"),
            ConditionExpr::constant("x", AttrType::Str),
        ),
    );
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    assert_eq!(compiled.filter(), "(volume = 5 AND symbol = 'x')");
    assert_eq!(compiled.placeholders().len(), 0);
}

#[test]
fn folded_string_constants_escape_quotes() {
    let expr = ConditionExpr::compare(
        CompareOp::Eq,
        store_str("name"),
        ConditionExpr::constant("O'Brien", AttrType::Str),
    );
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    assert_eq!(compiled.filter(), "name = 'O''Brien'");
}

// =============================================================================
// Stream Variables and Resolution
// =============================================================================

#[test]
fn stream_variable_becomes_a_single_placeholder() {
    let expr = ConditionExpr::compare(
        CompareOp::Eq,
        store_str("symbol"),
        ConditionExpr::stream_var("symbol", AttrType::Str),
    );
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    assert_eq!(compiled.filter(), "symbol = @strVar0");
    assert_eq!(compiled.placeholders().len(), 1);
    assert_eq!(
        compiled.placeholders().get("strVar0"),
        Some(&Placeholder::StreamRef {
            attribute: "symbol".to_string(),
            ty: AttrType::Str,
        })
    );

    let resolved = resolve_condition(&compiled, &values(&[("symbol", Value::from("WSO2"))]));
    assert_eq!(resolved, "symbol = 'WSO2'");
    assert!(!resolved.contains('@'));
}

#[test]
fn resolution_is_idempotent() {
    let expr = ConditionExpr::compare(
        CompareOp::Gt,
        ConditionExpr::store_var("price", AttrType::Float),
        ConditionExpr::stream_var("price", AttrType::Float),
    );
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    let row = values(&[("price", Value::Float(55.5))]);

    let first = resolve_condition(&compiled, &row);
    let second = resolve_condition(&compiled, &row);
    assert_eq!(first, second);
    assert_eq!(first, "price > 55.5");
}

#[test]
fn unresolved_stream_reference_keeps_its_token() {
    let expr = ConditionExpr::compare(
        CompareOp::Eq,
        store_str("symbol"),
        ConditionExpr::stream_var("symbol", AttrType::Str),
    );
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    let resolved = resolve_condition(&compiled, &FxHashMap::default());
    assert_eq!(resolved, "symbol = @strVar0");
}

// =============================================================================
// Connectives
// =============================================================================

#[test]
fn and_of_two_compares_renders_one_connective() {
    let expr = ConditionExpr::and(
        ConditionExpr::compare(
            CompareOp::Eq,
            store_str("symbol"),
            ConditionExpr::stream_var("symbol", AttrType::Str),
        ),
        ConditionExpr::compare(
            CompareOp::Lt,
            store_int("volume"),
            ConditionExpr::constant(100i64, AttrType::Int),
        ),
    );
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    assert_eq!(compiled.filter().matches(" AND ").count(), 1);
    assert_eq!(compiled.filter(), "(symbol = @strVar0 AND volume < 100)");

    let resolved = resolve_condition(&compiled, &values(&[("symbol", Value::from("IBM"))]));
    assert_eq!(resolved, "(symbol = 'IBM' AND volume < 100)");
    assert!(!resolved.contains('@'));
}

#[test]
fn or_of_two_compares_renders_one_connective() {
    let expr = ConditionExpr::or(
        ConditionExpr::compare(
            CompareOp::Ge,
            store_int("volume"),
            ConditionExpr::constant(10i64, AttrType::Int),
        ),
        ConditionExpr::compare(
            CompareOp::NotEq,
            store_str("symbol"),
            ConditionExpr::constant("IBM", AttrType::Str),
        ),
    );
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    assert_eq!(compiled.filter().matches(" OR ").count(), 1);
    assert_eq!(compiled.filter(), "(volume >= 10 OR symbol != 'IBM')");
}

#[test]
fn nested_connectives_keep_placeholder_names_unique() {
    let expr = ConditionExpr::and(
        ConditionExpr::or(
            ConditionExpr::compare(
                CompareOp::Eq,
                store_str("symbol"),
                ConditionExpr::stream_var("symbol", AttrType::Str),
            ),
            ConditionExpr::compare(
                CompareOp::Eq,
                store_str("owner"),
                ConditionExpr::stream_var("owner", AttrType::Str),
            ),
        ),
        ConditionExpr::compare(
            CompareOp::Gt,
            store_int("volume"),
            ConditionExpr::stream_var("volume", AttrType::Int),
        ),
    );
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    let names: Vec<&str> = compiled.placeholders().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["strVar0", "strVar1", "strVar2"]);
}

#[test]
fn connective_over_bare_operand_is_rejected() {
    let expr = ConditionExpr::and(
        ConditionExpr::compare(
            CompareOp::Eq,
            store_str("symbol"),
            ConditionExpr::constant("IBM", AttrType::Str),
        ),
        store_str("symbol"),
    );
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert!(matches!(
        err,
        CompileError::MalformedConnective { connective: "AND", .. }
    ));
}

// =============================================================================
// NOT
// =============================================================================

#[test]
fn not_wraps_a_simple_compare() {
    let inner = ConditionExpr::compare(
        CompareOp::Eq,
        store_int("volume"),
        ConditionExpr::constant(5i64, AttrType::Int),
    );
    let plain = ConditionCompiler::compile(&inner).unwrap();
    let negated = ConditionCompiler::compile(&ConditionExpr::not(inner)).unwrap();

    assert_eq!(plain.filter(), "volume = 5");
    assert_eq!(negated.filter(), "NOT (volume = 5)");
    assert_ne!(plain.filter(), negated.filter());
}

#[test]
fn not_wraps_a_null_check() {
    let expr = ConditionExpr::not(ConditionExpr::is_null(store_int("volume")));
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    assert_eq!(compiled.filter(), "NOT (volume IS NULL)");
}

#[test]
fn not_over_a_connective_is_rejected() {
    let expr = ConditionExpr::not(ConditionExpr::and(
        ConditionExpr::compare(
            CompareOp::Eq,
            store_int("a"),
            ConditionExpr::constant(1i64, AttrType::Int),
        ),
        ConditionExpr::compare(
            CompareOp::Eq,
            store_int("b"),
            ConditionExpr::constant(2i64, AttrType::Int),
        ),
    ));
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert!(matches!(err, CompileError::MalformedNot { .. }));
}

#[test]
fn not_over_a_bare_attribute_is_rejected() {
    let err = ConditionCompiler::compile(&ConditionExpr::not(store_str("symbol"))).unwrap_err();
    assert!(matches!(err, CompileError::MalformedNot { operand } if operand == "symbol"));
}

// =============================================================================
// Compare Grammar
// =============================================================================

#[test]
fn comparing_two_store_attributes_is_rejected() {
    let expr = ConditionExpr::compare(CompareOp::Eq, store_str("a"), store_str("b"));
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert_eq!(
        err,
        CompileError::MalformedCompare {
            left: "a".to_string(),
            right: "b".to_string(),
        }
    );
}

#[test]
fn comparing_two_deferred_values_is_rejected() {
    let expr = ConditionExpr::compare(
        CompareOp::Eq,
        ConditionExpr::stream_var("a", AttrType::Int),
        ConditionExpr::constant(5i64, AttrType::Int),
    );
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert!(matches!(err, CompileError::MalformedCompare { .. }));
}

#[test]
fn comparing_compound_expressions_is_rejected() {
    let compound = ConditionExpr::compare(
        CompareOp::Eq,
        store_int("a"),
        ConditionExpr::constant(1i64, AttrType::Int),
    );
    let expr = ConditionExpr::compare(
        CompareOp::Eq,
        compound,
        ConditionExpr::constant(2i64, AttrType::Int),
    );
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert!(matches!(err, CompileError::MalformedCompare { .. }));
}

#[test]
fn attribute_is_normalized_into_the_left_slot() {
    // 5 < price arrives with the constant on the left; the store syntax
    // still puts the attribute first.
    let expr = ConditionExpr::compare(
        CompareOp::Lt,
        ConditionExpr::constant(5i64, AttrType::Int),
        ConditionExpr::store_var("price", AttrType::Int),
    );
    let compiled = ConditionCompiler::compile(&expr).unwrap();
    assert_eq!(compiled.filter(), "price < 5");
}

// =============================================================================
// IS NULL
// =============================================================================

#[test]
fn is_null_on_a_table_attribute_compiles() {
    let compiled = ConditionCompiler::compile(&ConditionExpr::is_null(store_int("volume"))).unwrap();
    assert_eq!(compiled.filter(), "volume IS NULL");
}

#[test]
fn is_null_on_a_stream_variable_is_rejected() {
    let expr = ConditionExpr::is_null(ConditionExpr::stream_var("volume", AttrType::Int));
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert!(matches!(err, CompileError::MalformedIsNull { .. }));
}

#[test]
fn is_null_on_a_compound_expression_is_rejected() {
    let expr = ConditionExpr::is_null(ConditionExpr::compare(
        CompareOp::Eq,
        store_int("a"),
        ConditionExpr::constant(1i64, AttrType::Int),
    ));
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert!(matches!(err, CompileError::MalformedIsNull { .. }));
}

// =============================================================================
// Unsupported Constructs
// =============================================================================

#[test]
fn in_conditions_are_rejected_eagerly() {
    let expr = ConditionExpr::In {
        store_id: "OtherTable".to_string(),
        expr: Box::new(store_str("symbol")),
    };
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert_eq!(err, CompileError::Unsupported { construct: "IN" });
}

#[test]
fn in_nested_under_a_connective_still_fails_with_unsupported() {
    // The IN node is rejected before its own subtree or the sibling is
    // examined, so the error is Unsupported rather than a connective error.
    let expr = ConditionExpr::and(
        ConditionExpr::In {
            store_id: "OtherTable".to_string(),
            expr: Box::new(store_str("symbol")),
        },
        store_str("symbol"),
    );
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert_eq!(err, CompileError::Unsupported { construct: "IN" });
}

#[test]
fn arithmetic_is_rejected() {
    let expr = ConditionExpr::compare(
        CompareOp::Eq,
        store_int("total"),
        ConditionExpr::Math {
            op: docstream_core::MathOp::Add,
            left: Box::new(ConditionExpr::constant(1i64, AttrType::Int)),
            right: Box::new(ConditionExpr::constant(2i64, AttrType::Int)),
        },
    );
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert_eq!(
        err,
        CompileError::Unsupported {
            construct: "arithmetic"
        }
    );
}

#[test]
fn attribute_functions_are_rejected() {
    let expr = ConditionExpr::AttributeFunction {
        namespace: None,
        name: "str:upper".to_string(),
        args: vec![store_str("symbol")],
    };
    let err = ConditionCompiler::compile(&expr).unwrap_err();
    assert_eq!(
        err,
        CompileError::Unsupported {
            construct: "attribute function"
        }
    );
}

// =============================================================================
// Placeholder Uniqueness Across Compilations
// =============================================================================

#[test]
fn independent_compilations_have_internally_unique_names() {
    let expr = ConditionExpr::and(
        ConditionExpr::compare(
            CompareOp::Eq,
            store_str("symbol"),
            ConditionExpr::stream_var("symbol", AttrType::Str),
        ),
        ConditionExpr::compare(
            CompareOp::Eq,
            store_int("volume"),
            ConditionExpr::stream_var("volume", AttrType::Int),
        ),
    );
    let first = ConditionCompiler::compile(&expr).unwrap();
    let second = ConditionCompiler::compile(&expr).unwrap();

    for compiled in [&first, &second] {
        let mut names: Vec<&String> = compiled.placeholders().keys().collect();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
    }
    // Each artifact carries its own table, so identical names across
    // artifacts are immaterial.
    assert_eq!(first.filter(), second.filter());
}
