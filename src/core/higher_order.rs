//! Higher-order built-ins (§4.8): `apply map`. Both call back into `eval::apply`
//! to invoke an arbitrary callable value with already-evaluated arguments.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::apply as call;
use crate::value::Value;

use super::util::{as_seq_items, require_min_arity};

/// `apply f arg1 … argN argseq` (§4.8): the trailing sequential argument is
/// flattened into the call's argument list.
fn builtin_apply(args: &[Value]) -> Result<Value, EvalError> {
    require_min_arity("apply", args, 2)?;
    let f = &args[0];
    let last = as_seq_items("apply", &args[args.len() - 1])?;
    let mut call_args = args[1..args.len() - 1].to_vec();
    call_args.extend(last.iter().cloned());
    call(f, &call_args)
}

/// `map f xs` (§4.8): returns a list of `(f x)` for each `x` in `xs`, in order.
fn builtin_map(args: &[Value]) -> Result<Value, EvalError> {
    require_min_arity("map", args, 2)?;
    let f = &args[0];
    let items = as_seq_items("map", &args[1])?;
    let out = items
        .iter()
        .map(|x| call(f, std::slice::from_ref(x)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::list(out))
}

pub fn register(env: &Rc<Environment>) {
    env.set(Rc::from("apply"), Value::native("apply", builtin_apply));
    env.set(Rc::from("map"), Value::native("map", builtin_map));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError as Err_;

    fn add_one(args: &[Value]) -> Result<Value, Err_> {
        match &args[0] {
            Value::Int(n) => Ok(Value::Int(n + 1)),
            other => Err(Err_::type_error("add-one", "int", other)),
        }
    }

    #[test]
    fn apply_flattens_trailing_seq() {
        fn add(args: &[Value]) -> Result<Value, Err_> {
            let sum: i64 = args
                .iter()
                .map(|v| match v {
                    Value::Int(n) => *n,
                    _ => 0,
                })
                .sum();
            Ok(Value::Int(sum))
        }
        let f = Value::native("add", add);
        let args = [f, Value::Int(1), Value::Int(2), Value::list(vec![Value::Int(3), Value::Int(4)])];
        assert_eq!(builtin_apply(&args).unwrap(), Value::Int(10));
    }

    #[test]
    fn map_applies_in_order() {
        let f = Value::native("add-one", add_one);
        let xs = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(
            builtin_map(&[f, xs]).unwrap(),
            Value::list(vec![Value::Int(2), Value::Int(3), Value::Int(4)])
        );
    }
}
