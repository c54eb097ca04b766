#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod parser;
mod scanner;
mod token;

pub use parser::parse_str;
pub use scanner::Scanner;
pub use token::{Token, TokenKind};

use thiserror::Error;

/// Scanning and parsing failures. Offsets are byte positions into the
/// source string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unrecognized character {ch:?} at offset {at}")]
    Lexical { ch: char, at: u32 },

    #[error("syntax error at offset {at}: expected {expected}, found {found:?}")]
    Syntax {
        found: TokenKind,
        at: u32,
        expected: &'static str,
    },

    #[error("formula nesting too deep at offset {at}")]
    TooDeep { at: u32 },
}
