//! Comparison and structural equality (§4.8, §4.1): `< <= > >= =`.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{mal_cmp, mal_eq, Value};

use super::util::require_min_arity;

fn compare_chain(
    function: &str,
    args: &[Value],
    ok: fn(Ordering) -> bool,
) -> Result<Value, EvalError> {
    require_min_arity(function, args, 2)?;
    for pair in args.windows(2) {
        match mal_cmp(&pair[0], &pair[1]) {
            Some(ord) if ok(ord) => {}
            Some(_) => return Ok(Value::Bool(false)),
            None => {
                return Err(EvalError::type_error(
                    function,
                    "int",
                    if matches!(pair[0], Value::Int(_)) {
                        &pair[1]
                    } else {
                        &pair[0]
                    },
                ))
            }
        }
    }
    Ok(Value::Bool(true))
}

fn builtin_lt(args: &[Value]) -> Result<Value, EvalError> {
    compare_chain("<", args, |o| o == Ordering::Less)
}

fn builtin_le(args: &[Value]) -> Result<Value, EvalError> {
    compare_chain("<=", args, |o| o != Ordering::Greater)
}

fn builtin_gt(args: &[Value]) -> Result<Value, EvalError> {
    compare_chain(">", args, |o| o == Ordering::Greater)
}

fn builtin_ge(args: &[Value]) -> Result<Value, EvalError> {
    compare_chain(">=", args, |o| o != Ordering::Less)
}

fn builtin_eq(args: &[Value]) -> Result<Value, EvalError> {
    require_min_arity("=", args, 2)?;
    Ok(Value::Bool(args.windows(2).all(|p| mal_eq(&p[0], &p[1]))))
}

pub fn register(env: &Rc<Environment>) {
    env.set(Rc::from("<"), Value::native("<", builtin_lt));
    env.set(Rc::from("<="), Value::native("<=", builtin_le));
    env.set(Rc::from(">"), Value::native(">", builtin_gt));
    env.set(Rc::from(">="), Value::native(">=", builtin_ge));
    env.set(Rc::from("="), Value::native("=", builtin_eq));
}
