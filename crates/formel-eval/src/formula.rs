use std::io;

use formel_ast::ast::Program;
use formel_ast::value::Value;
use formel_parse::{parse_str, Scanner};

use crate::env::Environment;
use crate::error::FormulaError;
use crate::eval::evaluate;

/// Facade over one formula string: owns the source and the lazily parsed
/// tree. The Environment is passed into each evaluation call, so a single
/// store can back many formulas.
pub struct Formula {
    source: String,
    keep_big: bool,
    ast: Option<Program>,
}

impl Formula {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            keep_big: false,
            ast: None,
        }
    }

    /// Preserve-literal mode: a digit run too large for `i64` stays an
    /// exact `Text` value instead of a lossy `Real`.
    pub fn keep_big_literals(source: impl Into<String>) -> Self {
        Self {
            keep_big: true,
            ..Self::new(source)
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// A fresh lazy token stream over the source. Restartable: every call
    /// starts over from the beginning.
    pub fn tokens(&self) -> Scanner<'_> {
        if self.keep_big {
            Scanner::keep_big_literals(&self.source)
        } else {
            Scanner::new(&self.source)
        }
    }

    /// Parses on first call and reuses the tree afterwards. Each call
    /// re-reads the current Environment, so results may differ once
    /// assignments or external callers have changed it.
    pub fn result(&mut self, env: &mut Environment) -> Result<Value, FormulaError> {
        let program = self.parsed()?;
        Ok(evaluate(program, env)?)
    }

    fn parsed(&mut self) -> Result<&Program, FormulaError> {
        if self.ast.is_none() {
            self.ast = Some(parse_str(&self.source, self.keep_big)?);
        }
        match &self.ast {
            Some(program) => Ok(program),
            None => unreachable!("parsed above"),
        }
    }

    /// Writes a token listing and the parsed tree as pretty JSON to `out`.
    /// Purely diagnostic: a formula that does not scan or parse dumps the
    /// error text instead, and nothing here changes evaluation results.
    pub fn dump(&mut self, out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(out, "tokens for {:?}:", self.source)?;
        for tok in self.tokens() {
            match tok {
                Ok(t) => match &t.value {
                    Some(v) => writeln!(
                        out,
                        "  {:?} @ {}..{} = {}",
                        t.kind, t.span.start, t.span.end, v
                    )?,
                    None => writeln!(out, "  {:?} @ {}..{}", t.kind, t.span.start, t.span.end)?,
                },
                Err(e) => writeln!(out, "  {e}")?,
            }
        }
        match self.parsed() {
            Ok(program) => {
                let json = serde_json::to_string_pretty(program).map_err(io::Error::other)?;
                writeln!(out, "{json}")
            }
            Err(e) => writeln!(out, "parse failed: {e}"),
        }
    }
}
