//! Metadata and string-to-value conversions (§4.8): `meta with-meta symbol keyword`.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

use super::util::{as_str, require_arity};

fn builtin_meta(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("meta", args, 1)?;
    Ok(args[0].meta())
}

/// `with-meta v m` (§3 invariant 6): a shallow copy with replaced meta; `v` itself
/// is unchanged.
fn builtin_with_meta(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("with-meta", args, 2)?;
    Ok(args[0].with_meta(args[1].clone()))
}

fn builtin_symbol(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("symbol", args, 1)?;
    Ok(Value::symbol(as_str("symbol", &args[0])?))
}

fn builtin_keyword(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("keyword", args, 1)?;
    match &args[0] {
        Value::Keyword(_) => Ok(args[0].clone()),
        other => Ok(Value::keyword(as_str("keyword", other)?)),
    }
}

pub fn register(env: &Rc<Environment>) {
    env.set(Rc::from("meta"), Value::native("meta", builtin_meta));
    env.set(Rc::from("with-meta"), Value::native("with-meta", builtin_with_meta));
    env.set(Rc::from("symbol"), Value::native("symbol", builtin_symbol));
    env.set(Rc::from("keyword"), Value::native("keyword", builtin_keyword));
}
