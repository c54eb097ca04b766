#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod builtins;
mod env;
mod error;
mod eval;
mod formula;

pub use builtins::Builtin;
pub use env::Environment;
pub use error::{EvalError, FormulaError};
pub use eval::evaluate;
pub use formula::Formula;

// Re-export the types a facade caller needs.
pub use formel_ast::value::Value;
pub use formel_parse::ParseError;
