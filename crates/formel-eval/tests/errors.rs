//! Evaluation failures: every stage fails fast with a typed error, and
//! the integer/floating division-by-zero split is deliberate.

use formel_eval::{Environment, EvalError, Formula, FormulaError, Value};

fn eval_err(src: &str) -> FormulaError {
    let mut env = Environment::new();
    Formula::new(src)
        .result(&mut env)
        .expect_err("expected an error")
}

fn eval(src: &str) -> Value {
    let mut env = Environment::new();
    Formula::new(src).result(&mut env).expect("evaluation failed")
}

#[test]
fn integer_division_by_zero_errors() {
    assert_eq!(
        eval_err("1 / 0"),
        FormulaError::Eval(EvalError::DivisionByZero)
    );
    assert_eq!(
        eval_err("5 % 0"),
        FormulaError::Eval(EvalError::DivisionByZero)
    );
}

#[test]
fn floating_division_by_zero_follows_ieee() {
    // no error here: infinity and NaN are ordinary Real results
    assert!(matches!(eval("1,0 / 0"), Value::Real(x) if x.is_infinite()));
    assert!(matches!(eval("0,0 / 0"), Value::Real(x) if x.is_nan()));
}

#[test]
fn unbound_identifier_is_unresolved() {
    assert!(matches!(
        eval_err("nosuch + 1"),
        FormulaError::Eval(EvalError::UnresolvedName { name }) if name == "nosuch"
    ));
}

#[test]
fn unknown_function_is_unresolved() {
    assert!(matches!(
        eval_err("frobnicate(1)"),
        FormulaError::Eval(EvalError::UnresolvedName { name }) if name == "frobnicate"
    ));
}

#[test]
fn bitwise_on_real_is_a_type_error() {
    assert!(matches!(
        eval_err("1 & 2,5"),
        FormulaError::Eval(EvalError::Type { found: "Real", .. })
    ));
    assert!(matches!(
        eval_err("~1,5"),
        FormulaError::Eval(EvalError::Type { .. })
    ));
    assert!(matches!(
        eval_err("1,5 << 1"),
        FormulaError::Eval(EvalError::Type { .. })
    ));
}

#[test]
fn factorial_domain_and_type() {
    assert!(matches!(
        eval_err("(0-1)//"),
        FormulaError::Eval(EvalError::Domain { .. })
    ));
    assert!(matches!(
        eval_err("2,5//"),
        FormulaError::Eval(EvalError::Type { .. })
    ));
}

#[test]
fn root_domain_violations() {
    assert!(matches!(
        eval_err(r"1 \ 0"),
        FormulaError::Eval(EvalError::Domain { .. })
    ));
    assert!(matches!(
        eval_err(r"-4 \ 2"),
        FormulaError::Eval(EvalError::Domain { .. })
    ));
}

#[test]
fn shift_amounts_are_checked() {
    assert!(matches!(
        eval_err("1 << 64"),
        FormulaError::Eval(EvalError::Domain { .. })
    ));
    assert!(matches!(
        eval_err("1 << -1"),
        FormulaError::Eval(EvalError::Domain { .. })
    ));
}

#[test]
fn builtin_arity_is_checked() {
    assert!(matches!(
        eval_err("abs()"),
        FormulaError::Eval(EvalError::Arity { got: 0, .. })
    ));
}

#[test]
fn text_values_do_not_take_part_in_arithmetic() {
    let mut env = Environment::new();
    let src = format!("{} + 1", "1".repeat(71));
    let err = Formula::keep_big_literals(src)
        .result(&mut env)
        .expect_err("expected a type error");
    assert!(matches!(
        err,
        FormulaError::Eval(EvalError::Type { found: "Text", .. })
    ));
}

#[test]
fn parse_failures_surface_through_the_facade() {
    assert!(matches!(eval_err("1 +"), FormulaError::Parse(_)));
}
