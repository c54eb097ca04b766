use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};
use crate::ParseError;
use formel_ast::ast::{BinOp, Expr, Ident, Program, UnOp};
use formel_ast::span::Span;
use formel_ast::value::Value;

/// Defensive cap on expression nesting; deeper formulas are rejected
/// instead of risking unbounded recursion.
const MAX_DEPTH: u32 = 256;

// Binding powers outside the infix table.
const ASSIGN_LBP: u8 = 2;
const ASSIGN_RBP: u8 = 1;
const PREFIX_RBP: u8 = 15;
const POSTFIX_LBP: u8 = 17;

/// Parses a whole formula: one or more `;`-separated statements.
pub fn parse_str(src: &str, keep_big_literals: bool) -> Result<Program, ParseError> {
    let mut p = Parser::new(src, keep_big_literals)?;
    p.parse_program()
}

struct Parser<'a> {
    scan: Scanner<'a>,
    cur: Token,
    nxt: Token,
    depth: u32,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, keep_big_literals: bool) -> Result<Self, ParseError> {
        let mut scan = if keep_big_literals {
            Scanner::keep_big_literals(src)
        } else {
            Scanner::new(src)
        };
        let cur = scan.next_token()?;
        let nxt = scan.next_token()?;
        Ok(Self {
            scan,
            cur,
            nxt,
            depth: 0,
        })
    }

    fn bump(&mut self) -> Result<(), ParseError> {
        self.cur = std::mem::replace(&mut self.nxt, self.scan.next_token()?);
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        if self.cur.kind == kind {
            let t = self.cur.clone();
            self.bump()?;
            Ok(t)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::Syntax {
            found: self.cur.kind,
            at: self.cur.span.start,
            expected,
        }
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let start = self.cur.span.start;
        let mut stmts = vec![self.parse_expr_bp(0)?];
        while self.cur.kind == TokenKind::Semi {
            self.bump()?;
            // trailing separator
            if self.cur.kind == TokenKind::EndOfInput {
                break;
            }
            stmts.push(self.parse_expr_bp(0)?);
        }
        let end = self.cur.span.end;
        self.expect(TokenKind::EndOfInput, "';' or end of input")?;
        Ok(Program {
            stmts,
            span: Span { start, end },
        })
    }

    // Precedence (low -> high):
    //   2:  =            (right-assoc, identifier target only)
    //   3:  | ^
    //   5:  &
    //   7:  << >>
    //   9:  + -
    //   11: * / %
    //   13: ** \         (** right-assoc)
    //   15: prefix - ~ !
    //   17: postfix //

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                at: self.cur.span.start,
            });
        }

        let mut lhs = self.parse_prefix()?;

        loop {
            // postfix factorial, tightest of the operator ladder
            if self.cur.kind == TokenKind::Root {
                if POSTFIX_LBP < min_bp {
                    break;
                }
                let end = self.cur.span.end;
                self.bump()?;
                let span = Span {
                    start: lhs.span().start,
                    end,
                };
                lhs = Expr::Unary {
                    op: UnOp::Faculty,
                    expr: Box::new(lhs),
                    span,
                };
                continue;
            }

            if self.cur.kind == TokenKind::Equal {
                if ASSIGN_LBP < min_bp {
                    break;
                }
                let name = match lhs {
                    Expr::Var(id) => id,
                    _ => {
                        return Err(self.unexpected("an identifier on the left of '='"));
                    }
                };
                self.bump()?;
                let value = self.parse_expr_bp(ASSIGN_RBP)?;
                let span = Span {
                    start: name.span.start,
                    end: value.span().end,
                };
                lhs = Expr::Assign {
                    name,
                    value: Box::new(value),
                    span,
                };
                continue;
            }

            let (op, lbp, rbp) = match self.cur.kind {
                TokenKind::BitOr => (BinOp::BitOr, 3, 4),
                TokenKind::BitXOr => (BinOp::BitXor, 3, 4),
                TokenKind::BitAnd => (BinOp::BitAnd, 5, 6),
                TokenKind::ShiftLeft => (BinOp::Shl, 7, 8),
                TokenKind::ShiftRight => (BinOp::Shr, 7, 8),
                TokenKind::Plus => (BinOp::Add, 9, 10),
                TokenKind::Minus => (BinOp::Sub, 9, 10),
                TokenKind::Star => (BinOp::Mul, 11, 12),
                TokenKind::Slash => (BinOp::Div, 11, 12),
                TokenKind::Percent => (BinOp::Rem, 11, 12),
                TokenKind::Backslash => (BinOp::Root, 13, 14),
                TokenKind::Power => (BinOp::Pow, 13, 12),
                _ => break,
            };

            if lbp < min_bp {
                break;
            }
            self.bump()?;
            let rhs = self.parse_expr_bp(rbp)?;
            let span = Span {
                start: lhs.span().start,
                end: rhs.span().end,
            };
            lhs = Expr::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
                span,
            };
        }

        self.depth -= 1;
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let tok = self.cur.clone();
        match tok.kind {
            TokenKind::Minus => self.parse_unary(UnOp::Neg, tok.span),
            TokenKind::BitNot => self.parse_unary(UnOp::BitNot, tok.span),
            TokenKind::Faculty => self.parse_unary(UnOp::Faculty, tok.span),

            TokenKind::Number | TokenKind::Text => {
                let value = match tok.value {
                    Some(v) => v,
                    None => return Err(self.unexpected("a literal value")),
                };
                self.bump()?;
                Ok(Expr::Literal(value, tok.span))
            }

            TokenKind::Identifier => {
                let id = self.parse_ident()?;
                if self.cur.kind == TokenKind::BracketOpen {
                    self.parse_call(id)
                } else {
                    Ok(Expr::Var(id))
                }
            }

            TokenKind::BracketOpen => {
                self.bump()?;
                let inner = self.parse_expr_bp(0)?;
                self.expect(TokenKind::BracketClose, "')'")?;
                Ok(inner)
            }

            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_unary(&mut self, op: UnOp, start: Span) -> Result<Expr, ParseError> {
        self.bump()?;
        let inner = self.parse_expr_bp(PREFIX_RBP)?;
        let span = Span {
            start: start.start,
            end: inner.span().end,
        };
        Ok(Expr::Unary {
            op,
            expr: Box::new(inner),
            span,
        })
    }

    fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        match &self.cur.value {
            Some(Value::Text(s)) if self.cur.kind == TokenKind::Identifier => {
                let id = Ident {
                    text: s.clone(),
                    span: self.cur.span,
                };
                self.bump()?;
                Ok(id)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// `identifier '(' expr? ')'` — at most one argument, since the comma
    /// is taken by the decimal separator.
    fn parse_call(&mut self, name: Ident) -> Result<Expr, ParseError> {
        self.expect(TokenKind::BracketOpen, "'('")?;
        let mut args = Vec::new();
        if self.cur.kind != TokenKind::BracketClose {
            args.push(self.parse_expr_bp(0)?);
        }
        let close = self.expect(TokenKind::BracketClose, "')'")?;
        Ok(Expr::Call {
            span: Span {
                start: name.span.start,
                end: close.span.end,
            },
            name,
            args,
        })
    }
}
