use crate::token::{Token, TokenKind};
use crate::ParseError;
use formel_ast::span::Span;
use formel_ast::value::Value;

/// Lazy tokenizer over a formula string. Scanning is restartable: a new
/// `Scanner` over the same source yields the same token sequence.
///
/// The iterator yields every token up to and including `EndOfInput`, then
/// stops. A lexical error ends the stream.
pub struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
    keep_big: bool,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            keep_big: false,
            done: false,
        }
    }

    /// Like [`Scanner::new`], but a plain digit run too large for `i64` is
    /// kept verbatim as a `Text` token instead of an approximate `Real`.
    pub fn keep_big_literals(src: &'a str) -> Self {
        Self {
            keep_big: true,
            ..Self::new(src)
        }
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.src.get(self.pos).copied();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.src.get(self.pos + 1).copied()
    }

    fn span(&self, start: usize) -> Span {
        Span {
            start: start as u32,
            end: self.pos as u32,
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if (b as char).is_whitespace()) {
            self.bump();
        }
    }

    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_ws();
        let start = self.pos;
        let Some(b) = self.bump() else {
            return Ok(Token::bare(TokenKind::EndOfInput, self.span(start)));
        };
        let c = b as char;

        // 2-char operators before their 1-char prefixes
        if c == '*' && self.peek() == Some(b'*') {
            self.bump();
            return Ok(Token::bare(TokenKind::Power, self.span(start)));
        }
        if c == '/' && self.peek() == Some(b'/') {
            self.bump();
            return Ok(Token::bare(TokenKind::Root, self.span(start)));
        }
        if c == '<' && self.peek() == Some(b'<') {
            self.bump();
            return Ok(Token::bare(TokenKind::ShiftLeft, self.span(start)));
        }
        if c == '>' && self.peek() == Some(b'>') {
            self.bump();
            return Ok(Token::bare(TokenKind::ShiftRight, self.span(start)));
        }

        // 1-char operators and separators
        let single = match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '\\' => Some(TokenKind::Backslash),
            '%' => Some(TokenKind::Percent),
            '&' => Some(TokenKind::BitAnd),
            '|' => Some(TokenKind::BitOr),
            '^' => Some(TokenKind::BitXOr),
            '~' => Some(TokenKind::BitNot),
            '!' => Some(TokenKind::Faculty),
            '(' => Some(TokenKind::BracketOpen),
            ')' => Some(TokenKind::BracketClose),
            '=' => Some(TokenKind::Equal),
            ';' => Some(TokenKind::Semi),
            '#' => Some(TokenKind::Raute),
            ':' => Some(TokenKind::Colon),
            _ => None,
        };
        if let Some(kind) = single {
            return Ok(Token::bare(kind, self.span(start)));
        }

        if c.is_ascii_digit() {
            return Ok(self.scan_number(start));
        }

        // identifiers: alphabetic-leading alphanumeric runs
        if c.is_ascii_alphabetic() {
            while matches!(self.peek(), Some(p) if (p as char).is_ascii_alphanumeric()) {
                self.bump();
            }
            let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
            return Ok(Token {
                kind: TokenKind::Identifier,
                value: Some(Value::Text(text)),
                span: self.span(start),
            });
        }

        Err(ParseError::Lexical {
            ch: c,
            at: start as u32,
        })
    }

    /// Scans a numeric literal. The decimal separator is a comma, consumed
    /// only when a digit follows; `e`/`E` starts an exponent only when a
    /// well-formed signed digit run follows (otherwise it begins the next
    /// identifier).
    fn scan_number(&mut self, start: usize) -> Token {
        let mut is_real = false;

        while matches!(self.peek(), Some(p) if p.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some(b',') && matches!(self.peek2(), Some(p) if p.is_ascii_digit()) {
            is_real = true;
            self.bump();
            while matches!(self.peek(), Some(p) if p.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) && self.exponent_follows() {
            is_real = true;
            self.bump();
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.bump();
            }
            while matches!(self.peek(), Some(p) if p.is_ascii_digit()) {
                self.bump();
            }
        }

        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        let span = self.span(start);

        if is_real {
            let value = text.replace(',', ".").parse().unwrap_or(f64::NAN);
            return Token {
                kind: TokenKind::Number,
                value: Some(Value::Real(value)),
                span,
            };
        }
        match text.parse::<i64>() {
            Ok(v) => Token {
                kind: TokenKind::Number,
                value: Some(Value::Integer(v)),
                span,
            },
            // does not fit i64: keep the exact digits, or approximate
            Err(_) if self.keep_big => Token {
                kind: TokenKind::Text,
                value: Some(Value::Text(text)),
                span,
            },
            Err(_) => Token {
                kind: TokenKind::Number,
                value: Some(Value::Real(text.parse().unwrap_or(f64::INFINITY))),
                span,
            },
        }
    }

    fn exponent_follows(&self) -> bool {
        match self.peek2() {
            Some(p) if p.is_ascii_digit() => true,
            Some(b'+') | Some(b'-') => {
                matches!(self.src.get(self.pos + 2), Some(p) if p.is_ascii_digit())
            }
            _ => false,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let tok = self.next_token();
        if matches!(
            &tok,
            Err(_)
                | Ok(Token {
                    kind: TokenKind::EndOfInput,
                    ..
                })
        ) {
            self.done = true;
        }
        Some(tok)
    }
}
