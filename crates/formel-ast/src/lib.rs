pub mod span {
    use serde::Serialize;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub struct Span {
        pub start: u32,
        pub end: u32,
    }
}

pub mod value {
    use serde::Serialize;

    /// A runtime value. Arithmetic keeps `Integer` results as long as both
    /// operands are `Integer` and the result is exact; otherwise it widens to
    /// `Real`. `Text` holds identifiers' names at the token level and, in
    /// keep-big-literals mode, oversized numeric literals verbatim.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Value {
        Integer(i64),
        Real(f64),
        Text(String),
    }

    impl Value {
        /// Short kind name for diagnostics.
        pub fn kind_name(&self) -> &'static str {
            match self {
                Value::Integer(_) => "Integer",
                Value::Real(_) => "Real",
                Value::Text(_) => "Text",
            }
        }
    }

    impl From<i64> for Value {
        fn from(v: i64) -> Self {
            Value::Integer(v)
        }
    }

    impl From<f64> for Value {
        fn from(v: f64) -> Self {
            Value::Real(v)
        }
    }

    impl std::fmt::Display for Value {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Value::Integer(v) => write!(f, "{v}"),
                Value::Real(v) => write!(f, "{v}"),
                Value::Text(s) => write!(f, "\"{s}\""),
            }
        }
    }
}

pub mod ast {
    use super::span::Span;
    use super::value::Value;
    use serde::Serialize;

    /// A parsed formula: one or more `;`-separated statements. The program's
    /// value is the value of its last statement.
    #[derive(Debug, Clone, Serialize)]
    pub struct Program {
        pub stmts: Vec<Expr>,
        pub span: Span,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Ident {
        pub text: String,
        pub span: Span,
    }

    #[derive(Debug, Clone, Serialize)]
    pub enum Expr {
        Literal(Value, Span),
        Var(Ident),
        Assign {
            name: Ident,
            value: Box<Expr>,
            span: Span,
        },
        Unary {
            op: UnOp,
            expr: Box<Expr>,
            span: Span,
        },
        Binary {
            lhs: Box<Expr>,
            op: BinOp,
            rhs: Box<Expr>,
            span: Span,
        },
        Call {
            name: Ident,
            args: Vec<Expr>,
            span: Span,
        },
    }

    impl Expr {
        pub fn span(&self) -> Span {
            match self {
                Expr::Literal(_, sp) => *sp,
                Expr::Var(id) => id.span,
                Expr::Assign { span, .. }
                | Expr::Unary { span, .. }
                | Expr::Binary { span, .. }
                | Expr::Call { span, .. } => *span,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum UnOp {
        Neg,
        BitNot,
        Faculty,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum BinOp {
        // additive
        Add,
        Sub,
        // multiplicative
        Mul,
        Div,
        Rem,
        // power / root
        Pow,
        Root,
        // bitwise
        BitAnd,
        BitOr,
        BitXor,
        Shl,
        Shr,
    }
}
