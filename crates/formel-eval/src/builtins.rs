use formel_ast::value::Value;

use crate::error::EvalError;

/// The fixed table of callable functions. All are unary and keep the
/// operand's numeric kind where the result allows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Abs,
    Sqrt,
    Trunc,
    Sign,
}

impl Builtin {
    pub fn resolve(name: &str) -> Option<Builtin> {
        match name {
            "abs" => Some(Builtin::Abs),
            "sqrt" => Some(Builtin::Sqrt),
            "trunc" => Some(Builtin::Trunc),
            "sign" => Some(Builtin::Sign),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Abs => "abs",
            Builtin::Sqrt => "sqrt",
            Builtin::Trunc => "trunc",
            Builtin::Sign => "sign",
        }
    }

    pub fn call(self, arg: Value) -> Result<Value, EvalError> {
        match (self, arg) {
            (Builtin::Abs, Value::Integer(n)) => Ok(match n.checked_abs() {
                Some(a) => Value::Integer(a),
                // |i64::MIN| does not fit
                None => Value::Real((n as f64).abs()),
            }),
            (Builtin::Abs, Value::Real(x)) => Ok(Value::Real(x.abs())),

            (Builtin::Sqrt, Value::Integer(n)) => {
                if n < 0 {
                    return Err(EvalError::Domain {
                        what: "square root of a negative number",
                    });
                }
                let root = (n as f64).sqrt();
                let candidate = root.round() as i64;
                if candidate.checked_mul(candidate) == Some(n) {
                    Ok(Value::Integer(candidate))
                } else {
                    Ok(Value::Real(root))
                }
            }
            (Builtin::Sqrt, Value::Real(x)) => {
                if x < 0.0 {
                    return Err(EvalError::Domain {
                        what: "square root of a negative number",
                    });
                }
                Ok(Value::Real(x.sqrt()))
            }

            (Builtin::Trunc, Value::Integer(n)) => Ok(Value::Integer(n)),
            (Builtin::Trunc, Value::Real(x)) => Ok(Value::Real(x.trunc())),

            (Builtin::Sign, Value::Integer(n)) => Ok(Value::Integer(n.signum())),
            (Builtin::Sign, Value::Real(x)) => Ok(Value::Real(if x == 0.0 {
                0.0
            } else {
                x.signum()
            })),

            (b, v) => Err(EvalError::Type {
                op: b.name(),
                found: v.kind_name(),
            }),
        }
    }
}
