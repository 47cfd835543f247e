//! Small argument-extraction helpers shared by the builtin categories, so each
//! category module reads like the teacher's `builtins/*.rs` (inline match per
//! argument) without repeating the same type-error boilerplate everywhere.

use std::rc::Rc;

use crate::error::EvalError;
use crate::value::Value;

pub fn as_int(function: &str, v: &Value) -> Result<i64, EvalError> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(EvalError::type_error(function, "int", other)),
    }
}

pub fn as_str(function: &str, v: &Value) -> Result<Rc<str>, EvalError> {
    match v {
        Value::Str(s) => Ok(s.clone()),
        other => Err(EvalError::type_error(function, "string", other)),
    }
}

pub fn as_seq_items(function: &str, v: &Value) -> Result<Rc<Vec<Value>>, EvalError> {
    match v {
        Value::Seq(_, items, _) => Ok(items.clone()),
        other => Err(EvalError::type_error(function, "list or vector", other)),
    }
}

pub fn as_map(function: &str, v: &Value) -> Result<Rc<crate::value::MalMap>, EvalError> {
    match v {
        Value::Map(m, _) => Ok(m.clone()),
        other => Err(EvalError::type_error(function, "map", other)),
    }
}

pub fn as_atom(function: &str, v: &Value) -> Result<Rc<std::cell::RefCell<Value>>, EvalError> {
    match v {
        Value::Atom(cell, _) => Ok(cell.clone()),
        other => Err(EvalError::type_error(function, "atom", other)),
    }
}

pub fn require_arity(function: &str, args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() != expected {
        Err(EvalError::arity_error(function, expected.to_string(), args.len()))
    } else {
        Ok(())
    }
}

pub fn require_min_arity(function: &str, args: &[Value], min: usize) -> Result<(), EvalError> {
    if args.len() < min {
        Err(EvalError::arity_error(function, format!("at least {min}"), args.len()))
    } else {
        Ok(())
    }
}
