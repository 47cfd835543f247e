//! Atoms (§4.8, §3 invariant 3): `atom deref reset! swap!`. `atom?` lives in
//! `predicates.rs` alongside the other type predicates.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

use super::util::{as_atom, require_arity, require_min_arity};

fn builtin_atom(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("atom", args, 1)?;
    Ok(Value::atom(args[0].clone()))
}

fn builtin_deref(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("deref", args, 1)?;
    let cell = as_atom("deref", &args[0])?;
    Ok(cell.borrow().clone())
}

fn builtin_reset(args: &[Value]) -> Result<Value, EvalError> {
    require_arity("reset!", args, 2)?;
    let cell = as_atom("reset!", &args[0])?;
    *cell.borrow_mut() = args[1].clone();
    Ok(args[1].clone())
}

/// `swap! a f args…` (§4.8, §8 testable property): reads the current contents, then
/// writes `(f current args…)`, with no interleaving possible on a single thread.
fn builtin_swap(args: &[Value]) -> Result<Value, EvalError> {
    require_min_arity("swap!", args, 2)?;
    let cell = as_atom("swap!", &args[0])?;
    let f = args[1].clone();
    let current = cell.borrow().clone();
    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(current);
    call_args.extend(args[2..].iter().cloned());
    let new_val = crate::eval::apply(&f, &call_args)?;
    *cell.borrow_mut() = new_val.clone();
    Ok(new_val)
}

pub fn register(env: &Rc<Environment>) {
    env.set(Rc::from("atom"), Value::native("atom", builtin_atom));
    env.set(Rc::from("deref"), Value::native("deref", builtin_deref));
    env.set(Rc::from("reset!"), Value::native("reset!", builtin_reset));
    env.set(Rc::from("swap!"), Value::native("swap!", builtin_swap));
}
