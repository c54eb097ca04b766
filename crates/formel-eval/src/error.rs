use formel_parse::ParseError;
use thiserror::Error;

/// Evaluation failures. Every stage fails fast on the first error; there
/// is no partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unresolved name `{name}`")]
    UnresolvedName { name: String },

    #[error("type error: {op} is not applicable to {found}")]
    Type {
        op: &'static str,
        found: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("domain error: {what}")]
    Domain { what: &'static str },

    #[error("`{name}` takes exactly one argument, got {got}")]
    Arity { name: String, got: usize },

    #[error("evaluation nesting too deep")]
    TooDeep,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("eval error: {0}")]
    Eval(#[from] EvalError),
}
