//! Arithmetic on `Int` (§4.8): `+ - * /`.
//!
//! Grounded on the teacher's `src/builtins/arithmetic.rs` variadic `+`/`-`/`*`/`/`
//! shape, rewritten from `f64` to `i64`. Overflow wraps rather than panicking or
//! erroring (§9 Open Question, resolved in DESIGN.md): there is no numeric tower
//! beyond `i64` to promote into, so wrapping is the least surprising behavior that
//! keeps every operation total.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

use super::util::as_int;

fn builtin_add(args: &[Value]) -> Result<Value, EvalError> {
    let mut sum: i64 = 0;
    for a in args {
        sum = sum.wrapping_add(as_int("+", a)?);
    }
    Ok(Value::Int(sum))
}

fn builtin_sub(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("-", "at least 1", 0));
    }
    let first = as_int("-", &args[0])?;
    if args.len() == 1 {
        return Ok(Value::Int(first.wrapping_neg()));
    }
    let mut result = first;
    for a in &args[1..] {
        result = result.wrapping_sub(as_int("-", a)?);
    }
    Ok(Value::Int(result))
}

fn builtin_mul(args: &[Value]) -> Result<Value, EvalError> {
    let mut product: i64 = 1;
    for a in args {
        product = product.wrapping_mul(as_int("*", a)?);
    }
    Ok(Value::Int(product))
}

fn builtin_div(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("/", "at least 1", 0));
    }
    let first = as_int("/", &args[0])?;
    if args.len() == 1 {
        if first == 0 {
            return Err(EvalError::runtime_error("/", "division by zero"));
        }
        return Ok(Value::Int(1i64.wrapping_div(first)));
    }
    let mut result = first;
    for a in &args[1..] {
        let n = as_int("/", a)?;
        if n == 0 {
            return Err(EvalError::runtime_error("/", "division by zero"));
        }
        result = result.wrapping_div(n);
    }
    Ok(Value::Int(result))
}

pub fn register(env: &Rc<Environment>) {
    env.set(Rc::from("+"), Value::native("+", builtin_add));
    env.set(Rc::from("-"), Value::native("-", builtin_sub));
    env.set(Rc::from("*"), Value::native("*", builtin_mul));
    env.set(Rc::from("/"), Value::native("/", builtin_div));
}
