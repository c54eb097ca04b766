//! Tree-walking evaluator.
//!
//! Arithmetic on two `Integer` operands stays `Integer` as long as the
//! result is exact; it widens to `Real` on overflow or a fractional
//! quotient. Any `Real` operand forces floating semantics. `Text` never
//! takes part in arithmetic.

use formel_ast::ast::{BinOp, Expr, Program, UnOp};
use formel_ast::value::Value;

use crate::env::Environment;
use crate::error::EvalError;

/// Cap on evaluation recursion. The parser caps nesting on its own, so
/// this only triggers for trees built by hand.
const MAX_EVAL_DEPTH: u32 = 512;

/// Evaluates a parsed program against `env`. Pure in `(program, env)`
/// except for assignments writing through to `env`; the value of the last
/// statement is the result.
pub fn evaluate(program: &Program, env: &mut Environment) -> Result<Value, EvalError> {
    // the parser never yields an empty statement list
    let mut result = Value::Integer(0);
    for stmt in &program.stmts {
        result = eval_expr(stmt, env, 0)?;
    }
    Ok(result)
}

fn eval_expr(expr: &Expr, env: &mut Environment, depth: u32) -> Result<Value, EvalError> {
    if depth > MAX_EVAL_DEPTH {
        return Err(EvalError::TooDeep);
    }
    match expr {
        Expr::Literal(v, _) => Ok(v.clone()),

        Expr::Var(id) => match env.get(&id.text) {
            Some(v) => Ok(v.clone()),
            None => Err(EvalError::UnresolvedName {
                name: id.text.clone(),
            }),
        },

        Expr::Assign { name, value, .. } => {
            let v = eval_expr(value, env, depth + 1)?;
            env.set(&name.text, v.clone());
            Ok(v)
        }

        Expr::Unary { op, expr, .. } => {
            let v = eval_expr(expr, env, depth + 1)?;
            eval_unary(*op, v)
        }

        Expr::Binary { lhs, op, rhs, .. } => {
            let l = eval_expr(lhs, env, depth + 1)?;
            let r = eval_expr(rhs, env, depth + 1)?;
            eval_binary(*op, l, r)
        }

        Expr::Call { name, args, .. } => {
            let Some(builtin) = env.resolve_function(&name.text) else {
                return Err(EvalError::UnresolvedName {
                    name: name.text.clone(),
                });
            };
            if args.len() != 1 {
                return Err(EvalError::Arity {
                    name: name.text.clone(),
                    got: args.len(),
                });
            }
            let arg = eval_expr(&args[0], env, depth + 1)?;
            builtin.call(arg)
        }
    }
}

fn eval_unary(op: UnOp, v: Value) -> Result<Value, EvalError> {
    match (op, v) {
        (UnOp::Neg, Value::Integer(n)) => Ok(match n.checked_neg() {
            Some(m) => Value::Integer(m),
            // -i64::MIN does not fit
            None => Value::Real(-(n as f64)),
        }),
        (UnOp::Neg, Value::Real(x)) => Ok(Value::Real(-x)),
        (UnOp::BitNot, Value::Integer(n)) => Ok(Value::Integer(!n)),
        (UnOp::Faculty, Value::Integer(n)) => faculty(n),

        (UnOp::Neg, v) => Err(EvalError::Type {
            op: "unary `-`",
            found: v.kind_name(),
        }),
        (UnOp::BitNot, v) => Err(EvalError::Type {
            op: "`~`",
            found: v.kind_name(),
        }),
        (UnOp::Faculty, v) => Err(EvalError::Type {
            op: "factorial",
            found: v.kind_name(),
        }),
    }
}

fn eval_binary(op: BinOp, l: Value, r: Value) -> Result<Value, EvalError> {
    use BinOp::*;
    match op {
        Add | Sub | Mul | Div | Rem | Pow => eval_arith(op, l, r),
        Root => eval_root(l, r),
        BitAnd | BitOr | BitXor => eval_bitwise(op, l, r),
        Shl | Shr => eval_shift(op, l, r),
    }
}

fn eval_arith(op: BinOp, l: Value, r: Value) -> Result<Value, EvalError> {
    use BinOp::*;
    match (l, r) {
        (Value::Integer(a), Value::Integer(b)) => match op {
            Add => Ok(int_or_real(a.checked_add(b), || a as f64 + b as f64)),
            Sub => Ok(int_or_real(a.checked_sub(b), || a as f64 - b as f64)),
            Mul => Ok(int_or_real(a.checked_mul(b), || a as f64 * b as f64)),
            Div => {
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                // exact quotients stay Integer, everything else divides
                // in floating point
                match a.checked_rem(b) {
                    Some(0) => Ok(int_or_real(a.checked_div(b), || a as f64 / b as f64)),
                    _ => Ok(Value::Real(a as f64 / b as f64)),
                }
            }
            Rem => {
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(int_or_real(a.checked_rem(b), || (a as f64) % (b as f64)))
            }
            Pow => Ok(int_pow(a, b)),
            _ => unreachable!("dispatched in eval_binary"),
        },

        (Value::Integer(a), Value::Real(b)) => Ok(real_arith(op, a as f64, b)),
        (Value::Real(a), Value::Integer(b)) => Ok(real_arith(op, a, b as f64)),
        (Value::Real(a), Value::Real(b)) => Ok(real_arith(op, a, b)),

        (Value::Text(_), _) | (_, Value::Text(_)) => Err(EvalError::Type {
            op: op_name(op),
            found: "Text",
        }),
    }
}

/// Floating arithmetic follows IEEE semantics throughout: division by
/// zero yields infinity or NaN instead of an error.
fn real_arith(op: BinOp, a: f64, b: f64) -> Value {
    use BinOp::*;
    Value::Real(match op {
        Add => a + b,
        Sub => a - b,
        Mul => a * b,
        Div => a / b,
        Rem => a % b,
        Pow => a.powf(b),
        _ => unreachable!("dispatched in eval_binary"),
    })
}

fn int_or_real(exact: Option<i64>, approx: impl FnOnce() -> f64) -> Value {
    match exact {
        Some(v) => Value::Integer(v),
        None => Value::Real(approx()),
    }
}

/// `Integer ** Integer`: exact while the result fits `i64`, floating
/// otherwise; a negative exponent is inherently fractional.
fn int_pow(a: i64, b: i64) -> Value {
    if b < 0 {
        return Value::Real((a as f64).powf(b as f64));
    }
    match u32::try_from(b).ok().and_then(|e| a.checked_pow(e)) {
        Some(v) => Value::Integer(v),
        None => Value::Real((a as f64).powf(b as f64)),
    }
}

/// `base \ degree`: the n-th root. `Real` unless both operands are
/// `Integer` and the root lands exactly on an integer.
fn eval_root(l: Value, r: Value) -> Result<Value, EvalError> {
    let base = numeric(&l, "`\\`")?;
    let degree = numeric(&r, "`\\`")?;
    if degree == 0.0 {
        return Err(EvalError::Domain { what: "zeroth root" });
    }

    let value = if base < 0.0 {
        // negative bases only have a real root for odd integer degrees
        if degree.fract() == 0.0 && (degree as i64) % 2 != 0 {
            -(-base).powf(1.0 / degree)
        } else {
            return Err(EvalError::Domain {
                what: "even root of a negative number",
            });
        }
    } else {
        base.powf(1.0 / degree)
    };

    if let (Value::Integer(b), Value::Integer(d)) = (&l, &r) {
        if *d > 0 {
            let candidate = value.round();
            if candidate.abs() < i64::MAX as f64 {
                let c = candidate as i64;
                if u32::try_from(*d).ok().and_then(|e| c.checked_pow(e)) == Some(*b) {
                    return Ok(Value::Integer(c));
                }
            }
        }
    }
    Ok(Value::Real(value))
}

/// Bitwise operators take `Integer` operands only; a `Real` is never
/// truncated implicitly.
fn eval_bitwise(op: BinOp, l: Value, r: Value) -> Result<Value, EvalError> {
    use BinOp::*;
    match (l, r) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(match op {
            BitAnd => a & b,
            BitOr => a | b,
            BitXor => a ^ b,
            _ => unreachable!("dispatched in eval_binary"),
        })),
        (l, r) => Err(non_integer(op, &l, &r)),
    }
}

fn eval_shift(op: BinOp, l: Value, r: Value) -> Result<Value, EvalError> {
    match (l, r) {
        (Value::Integer(a), Value::Integer(b)) => {
            let amount = match u32::try_from(b) {
                Ok(s) if s < 64 => s,
                _ => {
                    return Err(EvalError::Domain {
                        what: "shift amount outside 0..64",
                    })
                }
            };
            Ok(Value::Integer(match op {
                BinOp::Shl => a << amount,
                BinOp::Shr => a >> amount,
                _ => unreachable!("dispatched in eval_binary"),
            }))
        }
        (l, r) => Err(non_integer(op, &l, &r)),
    }
}

fn non_integer(op: BinOp, l: &Value, r: &Value) -> EvalError {
    let found = if matches!(l, Value::Integer(_)) {
        r.kind_name()
    } else {
        l.kind_name()
    };
    EvalError::Type {
        op: op_name(op),
        found,
    }
}

fn numeric(v: &Value, op: &'static str) -> Result<f64, EvalError> {
    match v {
        Value::Integer(n) => Ok(*n as f64),
        Value::Real(x) => Ok(*x),
        Value::Text(_) => Err(EvalError::Type { op, found: "Text" }),
    }
}

/// Integer factorial; continues in floating point past `i64` range.
fn faculty(n: i64) -> Result<Value, EvalError> {
    if n < 0 {
        return Err(EvalError::Domain {
            what: "factorial of a negative number",
        });
    }
    let mut acc: i64 = 1;
    for i in 2..=n {
        match acc.checked_mul(i) {
            Some(next) => acc = next,
            None => {
                let mut wide = acc as f64;
                for j in i..=n {
                    wide *= j as f64;
                }
                return Ok(Value::Real(wide));
            }
        }
    }
    Ok(Value::Integer(acc))
}

fn op_name(op: BinOp) -> &'static str {
    use BinOp::*;
    match op {
        Add => "`+`",
        Sub => "`-`",
        Mul => "`*`",
        Div => "`/`",
        Rem => "`%`",
        Pow => "`**`",
        Root => "`\\`",
        BitAnd => "`&`",
        BitOr => "`|`",
        BitXor => "`^`",
        Shl => "`<<`",
        Shr => "`>>`",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faculty_small_and_wide() {
        assert_eq!(faculty(0).unwrap(), Value::Integer(1));
        assert_eq!(faculty(5).unwrap(), Value::Integer(120));
        assert_eq!(faculty(20).unwrap(), Value::Integer(2_432_902_008_176_640_000));
        // 21! overflows i64 and continues as Real
        assert!(matches!(faculty(21).unwrap(), Value::Real(x) if x > 5.1e19));
        assert_eq!(
            faculty(-1),
            Err(EvalError::Domain {
                what: "factorial of a negative number"
            })
        );
    }

    #[test]
    fn int_pow_exact_and_promoted() {
        assert_eq!(int_pow(2, 10), Value::Integer(1024));
        assert_eq!(int_pow(7, 0), Value::Integer(1));
        assert!(matches!(int_pow(2, 70), Value::Real(_)));
        assert!(matches!(int_pow(2, -1), Value::Real(x) if x == 0.5));
    }

    #[test]
    fn root_exactness() {
        assert_eq!(
            eval_root(Value::Integer(27), Value::Integer(3)).unwrap(),
            Value::Integer(3)
        );
        assert_eq!(
            eval_root(Value::Integer(-27), Value::Integer(3)).unwrap(),
            Value::Integer(-3)
        );
        assert!(matches!(
            eval_root(Value::Integer(2), Value::Integer(2)).unwrap(),
            Value::Real(x) if (x - std::f64::consts::SQRT_2).abs() < 1e-12
        ));
        assert!(eval_root(Value::Integer(-4), Value::Integer(2)).is_err());
        assert!(eval_root(Value::Integer(4), Value::Integer(0)).is_err());
    }

    #[test]
    fn hand_built_deep_trees_hit_the_cap() {
        use formel_ast::ast::{Expr, Program, UnOp};
        use formel_ast::span::Span;

        let sp = Span { start: 0, end: 1 };
        let mut expr = Expr::Literal(Value::Integer(1), sp);
        for _ in 0..(MAX_EVAL_DEPTH + 10) {
            expr = Expr::Unary {
                op: UnOp::Neg,
                expr: Box::new(expr),
                span: sp,
            };
        }
        let program = Program {
            stmts: vec![expr],
            span: sp,
        };
        let mut env = Environment::new();
        assert_eq!(evaluate(&program, &mut env), Err(EvalError::TooDeep));
    }

    #[test]
    fn division_promotion() {
        assert_eq!(
            eval_arith(BinOp::Div, Value::Integer(10), Value::Integer(2)).unwrap(),
            Value::Integer(5)
        );
        assert_eq!(
            eval_arith(BinOp::Div, Value::Integer(1), Value::Integer(2)).unwrap(),
            Value::Real(0.5)
        );
    }
}
